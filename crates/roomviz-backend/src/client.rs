// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the visualizer backend.
//!
//! Provides [`HttpBackend`], which sends the session header on every request
//! and maps the four endpoints onto [`VisualizerBackend`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url, multipart};
use roomviz_config::model::BackendConfig;
use roomviz_core::{
    LookupOutcome, PhotoHandle, PhotoUpload, Product, ProductId, ProductQuery, RoomvizError,
    SessionToken, StoreSelector, VisualizerBackend,
};
use tracing::{debug, warn};

use crate::wire::{
    GENERATED_IMAGE_PATH, GeneratedImageRequest, GeneratedImageResponse, PRODUCT_LIST_PATH,
    SESSION_HEADER, TRIGGER_GENERATION_PATH, TriggerGenerationRequest, UPLOAD_IMAGE_PATH,
};

/// reqwest-backed [`VisualizerBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Builds a client bound to one session.
    pub fn new(config: &BackendConfig, session: &SessionToken) -> Result<Self, RoomvizError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            SESSION_HEADER,
            HeaderValue::from_str(session.as_str()).map_err(|e| {
                RoomvizError::Config(format!("invalid session header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| RoomvizError::transport("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, RoomvizError> {
        let raw = format!("{}/{path}", self.base_url);
        let url = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        url.map_err(|e| RoomvizError::Config(format!("invalid backend URL `{raw}`: {e}")))
    }
}

/// Reads the body of a failed response for the error message.
async fn failure(context: &str, response: reqwest::Response) -> RoomvizError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    RoomvizError::status(context, status, body.trim())
}

#[async_trait]
impl VisualizerBackend for HttpBackend {
    async fn upload_image(&self, upload: PhotoUpload) -> Result<PhotoHandle, RoomvizError> {
        let size = upload.bytes.len();
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| RoomvizError::Upload(format!("invalid mime type: {e}")))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("productCategory", upload.product_category)
            .text("page", "0");

        let response = self
            .client
            .post(self.endpoint(UPLOAD_IMAGE_PATH, &[])?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RoomvizError::transport("upload image", e))?;

        let status = response.status();
        debug!(status = %status, bytes = size, "upload response received");
        if !status.is_success() {
            return Err(failure("upload image", response).await);
        }

        response
            .json::<PhotoHandle>()
            .await
            .map_err(|e| RoomvizError::transport("decode upload response", e))
    }

    async fn list_products(
        &self,
        store: &StoreSelector,
        query: &ProductQuery,
    ) -> Result<Vec<Product>, RoomvizError> {
        let url = self.endpoint(PRODUCT_LIST_PATH, &query.query_pairs(store))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RoomvizError::transport("list products", e))?;

        let status = response.status();
        debug!(status = %status, page = query.page, "product list response received");
        if !status.is_success() {
            return Err(failure("list products", response).await);
        }

        response
            .json::<Vec<Product>>()
            .await
            .map_err(|e| RoomvizError::transport("decode product list", e))
    }

    async fn trigger_generation(
        &self,
        store_id: &str,
        photo_gs_url: &str,
        product_ids: &[ProductId],
    ) -> Result<(), RoomvizError> {
        let url = self.endpoint(TRIGGER_GENERATION_PATH, &[("storeId", store_id.to_string())])?;
        let body = TriggerGenerationRequest {
            customer_image_gs_url: photo_gs_url,
            product_ids,
        };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RoomvizError::transport("trigger generation", e))?;

        let status = response.status();
        debug!(status = %status, products = product_ids.len(), "trigger response received");
        if !status.is_success() {
            return Err(failure("trigger generation", response).await);
        }
        Ok(())
    }

    async fn generated_image_url(
        &self,
        photo_gs_url: &str,
        product_gs_url: &str,
    ) -> Result<LookupOutcome, RoomvizError> {
        let body = GeneratedImageRequest {
            customer_image_gs_url: photo_gs_url,
            product_image_gs_url: product_gs_url,
        };
        let response = self
            .client
            .post(self.endpoint(GENERATED_IMAGE_PATH, &[])?)
            .json(&body)
            .send()
            .await
            .map_err(|e| RoomvizError::transport("look up generated image", e))?;

        let status = response.status();
        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                warn!(status = %status, product = product_gs_url, "unexpected lookup status");
            }
            return Ok(LookupOutcome::NotReady {
                status: status.as_u16(),
            });
        }

        let payload = response
            .json::<GeneratedImageResponse>()
            .await
            .map_err(|e| RoomvizError::transport("decode generated image response", e))?;
        Ok(LookupOutcome::Ready {
            public_url: payload.public_url,
        })
    }
}
