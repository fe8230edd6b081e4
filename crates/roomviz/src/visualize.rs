// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `roomviz visualize` command implementation.
//!
//! Uploads the room photo, resolves the requested products from the
//! catalog, selects them in order and renders every view change until each
//! composite is ready or failed, or the user interrupts.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use roomviz_config::RoomvizConfig;
use roomviz_core::{
    PhotoHandle, PhotoUpload, Product, ProductId, ProductQuery, RoomvizError, VisualizerBackend,
};
use roomviz_engine::{Catalog, EngineSettings, GenerationState, Visualizer};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{client, render};

pub struct VisualizeRequest {
    pub photo: PathBuf,
    pub product_ids: Vec<String>,
    pub query: ProductQuery,
    pub pages: u32,
    pub json: bool,
}

/// Final result of a visualize run, also printed with `--json`.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub photo: Option<PhotoHandle>,
    pub products: Vec<ProductOutcome>,
    pub interrupted: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProductOutcome {
    pub product_id: ProductId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Outcome {
    pub fn all_completed(&self) -> bool {
        !self.interrupted && self.products.iter().all(|p| p.status == "completed")
    }
}

pub async fn run_visualize(
    config: &RoomvizConfig,
    request: VisualizeRequest,
) -> Result<ExitCode, RoomvizError> {
    let settings = EngineSettings::from_config(config);
    if settings.store_id.is_none() {
        return Err(RoomvizError::Config(
            "generating composites needs a store id; pass --store-id or set store.store_id".into(),
        ));
    }

    let backend: Arc<dyn VisualizerBackend> = client::connect(config)?;
    let products = resolve_products(
        Arc::clone(&backend),
        config,
        request.query.clone(),
        &request.product_ids,
        request.pages,
    )
    .await?;

    let category = request
        .query
        .category
        .clone()
        .unwrap_or_else(|| config.catalog.default_category.clone());
    let upload = roomviz_backend::load_photo(&request.photo, &category, &config.upload).await?;

    let cancel = roomviz_engine::install_signal_handler();
    let outcome = drive(backend, settings, upload, products, cancel, !request.json).await?;

    if request.json {
        let rendered = serde_json::to_string_pretty(&outcome)
            .map_err(|e| RoomvizError::Internal(format!("failed to encode outcome: {e}")))?;
        println!("{rendered}");
    }

    Ok(if outcome.all_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Finds each requested product, paging through the catalog as needed.
async fn resolve_products(
    backend: Arc<dyn VisualizerBackend>,
    config: &RoomvizConfig,
    query: ProductQuery,
    ids: &[String],
    max_pages: u32,
) -> Result<Vec<Product>, RoomvizError> {
    let mut catalog = Catalog::new(backend, config.store.selector(), query);
    let mut products = Vec::with_capacity(ids.len());
    for id in ids {
        let product_id = ProductId::from(id.as_str());
        match catalog.find_or_load(&product_id, max_pages).await {
            Some(product) => products.push(product),
            None => {
                if let Some(error) = catalog.error() {
                    return Err(RoomvizError::Catalog(error.to_string()));
                }
                return Err(RoomvizError::Catalog(format!(
                    "product {id} not found in {} catalog page(s)",
                    catalog.next_page()
                )));
            }
        }
    }
    debug!(count = products.len(), "products resolved");
    Ok(products)
}

/// Runs one upload-and-select session to completion.
pub async fn drive(
    backend: Arc<dyn VisualizerBackend>,
    settings: EngineSettings,
    upload: PhotoUpload,
    products: Vec<Product>,
    cancel: CancellationToken,
    print_progress: bool,
) -> Result<Outcome, RoomvizError> {
    let viz = Visualizer::start(backend, settings, cancel);

    let printer = print_progress.then(|| {
        let mut rx = viz.subscribe();
        tokio::spawn(async move {
            println!("{}", render::view_line(&rx.borrow_and_update()));
            while rx.changed().await.is_ok() {
                let line = render::view_line(&rx.borrow_and_update());
                println!("{line}");
            }
        })
    });

    let photo = match viz.upload_photo(upload).await {
        Ok(photo) => photo,
        Err(e) => {
            if let Some(printer) = printer {
                printer.abort();
            }
            viz.shutdown().await;
            return Err(e);
        }
    };
    for product in &products {
        viz.select_product(product.clone());
    }

    viz.settled().await;
    let interrupted = viz.is_cancelled();
    if interrupted {
        info!("interrupted before every composite was ready");
    }

    let state = viz.snapshot();
    let outcomes: Vec<ProductOutcome> = products
        .iter()
        .map(|product| match state.entry(&product.product_id) {
            Some(entry) => {
                if print_progress {
                    println!("{}", render::outcome_line(entry));
                }
                product_outcome(&product.product_id, &entry.state)
            }
            None => ProductOutcome {
                product_id: product.product_id.clone(),
                status: "skipped",
                url: None,
                reason: Some("not requested".into()),
            },
        })
        .collect();

    viz.shutdown().await;
    if let Some(printer) = printer {
        printer.abort();
    }

    Ok(Outcome {
        photo: Some(photo),
        products: outcomes,
        interrupted,
    })
}

fn product_outcome(product_id: &ProductId, state: &GenerationState) -> ProductOutcome {
    let (status, url, reason) = match state {
        GenerationState::Completed { public_url } => ("completed", Some(public_url.clone()), None),
        GenerationState::Failed { reason } => ("failed", None, Some(reason.clone())),
        GenerationState::Requested => ("pending", None, None),
    };
    ProductOutcome {
        product_id: product_id.clone(),
        status,
        url,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use roomviz_test_utils::{MockBackend, product, product_gs_url};

    use super::*;

    fn settings(max_attempts: u32) -> EngineSettings {
        EngineSettings {
            store_id: Some("42".into()),
            poll_interval: Duration::from_secs(1),
            max_attempts,
            advisory_clear: Duration::from_secs(2),
        }
    }

    fn upload() -> PhotoUpload {
        PhotoUpload {
            file_name: "den.jpg".into(),
            mime_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8],
            product_category: "Flooring".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drive_reports_each_product() {
        let backend = Arc::new(MockBackend::new());
        backend.ready_after(&product_gs_url("a"), 1, "https://cdn.test/a.jpg").await;

        let outcome = drive(
            backend.clone(),
            settings(4),
            upload(),
            vec![product("a"), product("b")],
            CancellationToken::new(),
            false,
        )
        .await
        .unwrap();

        assert_eq!(outcome.photo.unwrap().gs_url, "gs://rooms/den.jpg");
        assert_eq!(outcome.products[0].status, "completed");
        assert_eq!(outcome.products[0].url.as_deref(), Some("https://cdn.test/a.jpg"));
        assert_eq!(outcome.products[1].status, "failed");
        assert!(!outcome.interrupted);
        assert_eq!(backend.triggers().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_run_is_not_successful() {
        let backend = Arc::new(MockBackend::new());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            trigger.cancel();
        });

        let outcome = drive(
            backend,
            settings(120),
            upload(),
            vec![product("a")],
            cancel,
            false,
        )
        .await
        .unwrap();

        assert!(outcome.interrupted);
        assert_eq!(outcome.products[0].status, "pending");
        assert!(!outcome.all_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn upload_failure_is_returned() {
        let backend = Arc::new(MockBackend::new());
        backend.push_upload(Err("500".into())).await;
        let result = drive(
            backend.clone(),
            settings(3),
            upload(),
            vec![product("a")],
            CancellationToken::new(),
            false,
        )
        .await;
        assert!(matches!(result, Err(RoomvizError::Upload(_))));
        assert!(backend.triggers().await.is_empty());
    }

    #[tokio::test]
    async fn missing_product_names_page_count() {
        let backend = Arc::new(MockBackend::new());
        backend.push_page(Ok(vec![product("a")])).await;
        let config = RoomvizConfig::default();
        let err = resolve_products(
            backend,
            &config,
            ProductQuery::search("oak"),
            &["a".to_string(), "zz".to_string()],
            3,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("product zz not found"), "{err}");
    }

    #[test]
    fn outcome_json_omits_empty_fields() {
        let outcome = product_outcome(
            &ProductId::from("p1"),
            &GenerationState::Completed {
                public_url: "u".into(),
            },
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"product_id": "p1", "status": "completed", "url": "u"})
        );
    }
}
