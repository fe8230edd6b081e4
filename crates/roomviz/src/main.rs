// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Roomviz - try flooring, paint and furniture in a photo of your room.
//!
//! This is the binary entry point for the Roomviz client.

mod catalog;
mod client;
mod render;
mod visualize;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use roomviz_config::RoomvizConfig;
use roomviz_core::{RoomvizError, VisualizerBackend};

/// Roomviz - try flooring, paint and furniture in a photo of your room.
#[derive(Parser, Debug)]
#[command(name = "roomviz", version, about, long_about = None)]
struct Cli {
    /// Store id to address (overrides `store.store_id`).
    #[arg(long, global = true)]
    store_id: Option<String>,

    /// Read configuration from this file instead of the usual locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the session token, creating one if needed.
    Session,
    /// List product categories and subcategories.
    Categories,
    /// List catalog products.
    Products {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        /// Search keywords; replaces the category filter.
        #[arg(long)]
        keywords: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Print products as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Upload a room photo and print its URLs.
    Upload {
        path: PathBuf,
        /// Product category sent with the photo.
        #[arg(long)]
        category: Option<String>,
    },
    /// Upload a room photo and render it with the given products.
    Visualize {
        path: PathBuf,
        /// Product ids to try, in selection order.
        #[arg(long = "product", required = true, num_args = 1..)]
        products: Vec<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        /// Look products up by keyword search instead of category.
        #[arg(long)]
        keywords: Option<String>,
        /// Catalog pages to search for the requested products.
        #[arg(long, default_value_t = 5)]
        pages: u32,
        /// Print the final outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => roomviz_config::load_and_validate_path(path),
        None => roomviz_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            roomviz_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(&mut config, cli.store_id.as_deref());

    init_tracing(&config.app.log_level);

    if cli.plain || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &RoomvizConfig) -> Result<ExitCode, RoomvizError> {
    match command {
        Commands::Session => {
            let token = client::open_session(config);
            println!("{token}");
        }
        Commands::Categories => catalog::print_categories(),
        Commands::Products {
            category,
            subcategory,
            keywords,
            page,
            json,
        } => {
            let query = catalog::build_query(config, category, subcategory, keywords).with_page(page);
            catalog::run_products(config, query, json).await?;
        }
        Commands::Upload { path, category } => {
            let category = category.unwrap_or_else(|| config.catalog.default_category.clone());
            let backend = client::connect(config)?;
            let upload = roomviz_backend::load_photo(&path, &category, &config.upload).await?;
            let handle = backend.upload_image(upload).await?;
            println!("publicUrl: {}", handle.public_url);
            println!("gsUrl:     {}", handle.gs_url);
        }
        Commands::Visualize {
            path,
            products,
            category,
            subcategory,
            keywords,
            pages,
            json,
        } => {
            let query = catalog::build_query(config, category, subcategory, keywords);
            let request = visualize::VisualizeRequest {
                photo: path,
                product_ids: products,
                query,
                pages,
                json,
            };
            return visualize::run_visualize(config, request).await;
        }
        Commands::Config => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|e| RoomvizError::Internal(format!("failed to render config: {e}")))?;
            print!("{rendered}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Applies command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut RoomvizConfig, store_id: Option<&str>) {
    if let Some(id) = store_id.map(str::trim).filter(|id| !id.is_empty()) {
        config.store.store_id = Some(id.to_string());
    }
}

/// Initialize the tracing subscriber with an env filter.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("roomviz={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
