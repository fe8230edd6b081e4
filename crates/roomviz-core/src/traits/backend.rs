// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait for the remote visualizer service.

use async_trait::async_trait;

use crate::error::RoomvizError;
use crate::types::{
    LookupOutcome, PhotoHandle, PhotoUpload, Product, ProductId, ProductQuery, StoreSelector,
};

/// The four REST operations the visualizer client consumes.
///
/// Implementations carry the session identity themselves (the HTTP client
/// sends it as a default header), so no method takes a session argument.
#[async_trait]
pub trait VisualizerBackend: Send + Sync {
    /// Uploads a room photo and returns its public URL and storage locator.
    async fn upload_image(&self, upload: PhotoUpload) -> Result<PhotoHandle, RoomvizError>;

    /// Fetches one page of the product catalog.
    async fn list_products(
        &self,
        store: &StoreSelector,
        query: &ProductQuery,
    ) -> Result<Vec<Product>, RoomvizError>;

    /// Asks the backend to start compositing the given products into the photo.
    ///
    /// Success only means the request was accepted, not that work finished.
    async fn trigger_generation(
        &self,
        store_id: &str,
        photo_gs_url: &str,
        product_ids: &[ProductId],
    ) -> Result<(), RoomvizError>;

    /// Checks whether the composite of `product_gs_url` into `photo_gs_url` exists.
    async fn generated_image_url(
        &self,
        photo_gs_url: &str,
        product_gs_url: &str,
    ) -> Result<LookupOutcome, RoomvizError>;
}
