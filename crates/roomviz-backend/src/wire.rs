// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies of the visualizer endpoints.
//!
//! Note the two spellings of the photo locator field: the trigger endpoint
//! takes `customerImageGsUrl`, the lookup endpoint `customerImageGSUrl`.

use roomviz_core::ProductId;
use serde::{Deserialize, Serialize};

pub const UPLOAD_IMAGE_PATH: &str = "uploadImage";
pub const PRODUCT_LIST_PATH: &str = "getProductList";
pub const TRIGGER_GENERATION_PATH: &str = "imageGenerationByProductId";
pub const GENERATED_IMAGE_PATH: &str = "getGeneratedImageUrl";

/// Header carrying the session token on every request.
pub const SESSION_HEADER: &str = "sessionId";

#[derive(Debug, Serialize)]
pub struct TriggerGenerationRequest<'a> {
    #[serde(rename = "customerImageGsUrl")]
    pub customer_image_gs_url: &'a str,
    #[serde(rename = "productIds")]
    pub product_ids: &'a [ProductId],
}

#[derive(Debug, Serialize)]
pub struct GeneratedImageRequest<'a> {
    #[serde(rename = "customerImageGSUrl")]
    pub customer_image_gs_url: &'a str,
    #[serde(rename = "productImageGSUrl")]
    pub product_image_gs_url: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImageResponse {
    #[serde(rename = "publicUrl")]
    pub public_url: String,
}
