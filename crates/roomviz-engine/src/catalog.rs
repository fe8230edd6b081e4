// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paged product catalog.

use std::sync::Arc;

use roomviz_core::{Product, ProductId, ProductQuery, StoreSelector, VisualizerBackend};
use tracing::{debug, warn};

/// Products loaded so far for the active query.
///
/// Page 0 replaces the list, later pages append. A failed fetch leaves the
/// loaded products alone and records an inline error message instead.
pub struct Catalog {
    backend: Arc<dyn VisualizerBackend>,
    store: StoreSelector,
    query: ProductQuery,
    products: Vec<Product>,
    next_page: u32,
    exhausted: bool,
    error: Option<String>,
}

impl Catalog {
    /// Creates an empty catalog; nothing is fetched until the first load.
    pub fn new(backend: Arc<dyn VisualizerBackend>, store: StoreSelector, query: ProductQuery) -> Self {
        Self {
            backend,
            store,
            query,
            products: Vec::new(),
            next_page: 0,
            exhausted: false,
            error: None,
        }
    }

    /// Switches to `query`, dropping loaded products and restarting at page 0.
    pub fn set_query(&mut self, query: ProductQuery) {
        if query == self.query {
            return;
        }
        debug!(?query, "catalog query changed");
        self.query = query;
        self.products.clear();
        self.next_page = 0;
        self.exhausted = false;
        self.error = None;
    }

    /// The active filter. Its `page` field is ignored; see [`Catalog::next_page`].
    pub fn query(&self) -> &ProductQuery {
        &self.query
    }

    /// Fetches the next page, returning how many products it held.
    pub async fn load_next_page(&mut self) -> usize {
        let page = self.next_page;
        let request = self.query.with_page(page);
        self.error = None;

        match self.backend.list_products(&self.store, &request).await {
            Ok(batch) => {
                let count = batch.len();
                debug!(page, count, "catalog page loaded");
                if page == 0 {
                    self.products = batch;
                } else {
                    self.products.extend(batch);
                }
                self.exhausted = count == 0;
                self.next_page = page + 1;
                count
            }
            Err(e) => {
                warn!(page, error = %e, "catalog fetch failed");
                self.error = Some(format!("Failed to fetch products: {e}"));
                0
            }
        }
    }

    /// Products loaded so far, in page order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Searches the loaded products only.
    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.product_id == product_id)
    }

    /// Looks `product_id` up, loading up to `max_pages` more pages if needed.
    pub async fn find_or_load(&mut self, product_id: &ProductId, max_pages: u32) -> Option<Product> {
        for _ in 0..max_pages {
            if self.find(product_id).is_some() || self.exhausted || self.error.is_some() {
                break;
            }
            self.load_next_page().await;
        }
        self.find(product_id).cloned()
    }

    /// Inline error from the last fetch, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last page came back empty.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Page index the next load will request.
    pub fn next_page(&self) -> u32 {
        self.next_page
    }
}
