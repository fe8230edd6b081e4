// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `roomviz categories` and `roomviz products`.

use colored::Colorize;
use roomviz_config::RoomvizConfig;
use roomviz_core::{Category, Product, ProductQuery, RoomvizError};
use roomviz_engine::Catalog;

use crate::client;

pub fn print_categories() {
    for category in Category::all() {
        println!("{}", category.to_string().bold());
        for sub in category.subcategories() {
            println!("  {sub}");
        }
    }
}

/// Builds the catalog query from flags, falling back to `[catalog]` defaults.
///
/// Keywords win over any category filter.
pub fn build_query(
    config: &RoomvizConfig,
    category: Option<String>,
    subcategory: Option<String>,
    keywords: Option<String>,
) -> ProductQuery {
    if let Some(keywords) = keywords.filter(|k| !k.trim().is_empty()) {
        return ProductQuery::search(keywords);
    }
    match category {
        Some(category) => ProductQuery::category(category, subcategory),
        None => ProductQuery::category(
            config.catalog.default_category.clone(),
            subcategory.or_else(|| config.catalog.default_subcategory.clone()),
        ),
    }
}

pub async fn run_products(
    config: &RoomvizConfig,
    query: ProductQuery,
    json: bool,
) -> Result<(), RoomvizError> {
    let backend = client::connect(config)?;
    let start_page = query.page;
    let mut catalog = Catalog::new(backend, config.store.selector(), query.with_page(0));
    // Walk up to the requested page; only the last one is shown.
    for _ in 0..start_page {
        catalog.load_next_page().await;
        if let Some(error) = catalog.error() {
            return Err(RoomvizError::Catalog(error.to_string()));
        }
    }
    let skip = catalog.products().len();
    catalog.load_next_page().await;
    if let Some(error) = catalog.error() {
        return Err(RoomvizError::Catalog(error.to_string()));
    }
    let page = &catalog.products()[skip..];

    if json {
        let rendered = serde_json::to_string_pretty(page)
            .map_err(|e| RoomvizError::Internal(format!("failed to encode products: {e}")))?;
        println!("{rendered}");
    } else if page.is_empty() {
        println!("{}", "no products".dimmed());
    } else {
        for product in page {
            println!("{}", product_line(product));
        }
    }
    Ok(())
}

fn product_line(product: &Product) -> String {
    let size = if product.size.is_empty() {
        String::new()
    } else {
        format!(" ({})", product.size)
    };
    format!(
        "{:<12} {}{}",
        product.product_id.as_str().cyan(),
        product.display_name(),
        size
    )
}
