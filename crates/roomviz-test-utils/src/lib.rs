// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Roomviz integration tests.
//!
//! [`MockBackend`] stands in for the visualizer service with scripted
//! responses, and the fixture helpers build catalog products and photo
//! handles with predictable URLs.

pub mod mock_backend;

pub use mock_backend::{MockBackend, ScriptedLookup, TriggerCall};

use roomviz_core::{PhotoHandle, Product, ProductId};

/// A product whose image URLs are derived from `id`.
pub fn product(id: &str) -> Product {
    Product {
        product_id: ProductId::from(id),
        size: "12x24".to_string(),
        image_public_url: format!("https://cdn.test/products/{id}.jpg"),
        image_gs_url: product_gs_url(id),
        description: Some(format!("Product {id}")),
    }
}

/// The storage locator [`product`] assigns to `id`.
pub fn product_gs_url(id: &str) -> String {
    format!("gs://products/{id}.jpg")
}

pub fn photo_handle(name: &str) -> PhotoHandle {
    PhotoHandle {
        public_url: format!("https://cdn.test/rooms/{name}.jpg"),
        gs_url: format!("gs://rooms/{name}.jpg"),
    }
}
