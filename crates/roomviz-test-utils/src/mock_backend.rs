// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted visualizer backend for deterministic tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use roomviz_core::{
    LookupOutcome, PhotoHandle, PhotoUpload, Product, ProductId, ProductQuery, RoomvizError,
    StoreSelector, VisualizerBackend,
};

use crate::photo_handle;

/// One scripted answer to a generated-image lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedLookup {
    /// Composite available at the given public URL.
    Ready(String),
    /// Non-success status.
    NotReady(u16),
    /// Transport-level failure with the given message.
    Error(String),
}

/// A recorded generation trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerCall {
    pub store_id: String,
    pub photo_gs_url: String,
    pub product_ids: Vec<ProductId>,
}

/// A backend that answers from queues and records every call.
///
/// Lookups are scripted per product image locator and popped in order; once
/// a queue is empty the lookup answers "not ready" (404). Uploads answer
/// with a handle named after the upload unless a result was queued.
#[derive(Default)]
pub struct MockBackend {
    uploads: Mutex<Vec<PhotoUpload>>,
    upload_results: Mutex<VecDeque<Result<PhotoHandle, String>>>,
    upload_delays: Mutex<HashMap<String, Duration>>,
    pages: Mutex<VecDeque<Result<Vec<Product>, String>>>,
    list_calls: Mutex<Vec<(StoreSelector, ProductQuery)>>,
    triggers: Mutex<Vec<TriggerCall>>,
    trigger_failure: Mutex<Option<String>>,
    trigger_delay: Mutex<Option<Duration>>,
    lookup_scripts: Mutex<HashMap<String, VecDeque<ScriptedLookup>>>,
    lookups: Mutex<Vec<(String, String)>>,
    lookup_delays: Mutex<HashMap<String, Duration>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result of the next upload.
    pub async fn push_upload(&self, result: Result<PhotoHandle, String>) {
        self.upload_results.lock().await.push_back(result);
    }

    /// Queues the next catalog page.
    pub async fn push_page(&self, page: Result<Vec<Product>, String>) {
        self.pages.lock().await.push_back(page);
    }

    /// Makes every subsequent trigger fail with `reason`.
    pub async fn fail_triggers(&self, reason: &str) {
        *self.trigger_failure.lock().await = Some(reason.to_string());
    }

    /// Delays every trigger response by `delay`.
    pub async fn delay_triggers(&self, delay: Duration) {
        *self.trigger_delay.lock().await = Some(delay);
    }

    /// Delays the upload of `file_name` by `delay`.
    pub async fn delay_upload(&self, file_name: &str, delay: Duration) {
        self.upload_delays
            .lock()
            .await
            .insert(file_name.to_string(), delay);
    }

    /// Delays every lookup of `product_gs_url` by `delay`.
    pub async fn delay_lookups(&self, product_gs_url: &str, delay: Duration) {
        self.lookup_delays
            .lock()
            .await
            .insert(product_gs_url.to_string(), delay);
    }

    /// Appends scripted answers for lookups of `product_gs_url`.
    pub async fn script_lookups(&self, product_gs_url: &str, answers: Vec<ScriptedLookup>) {
        self.lookup_scripts
            .lock()
            .await
            .entry(product_gs_url.to_string())
            .or_default()
            .extend(answers);
    }

    /// Answers "not ready" `misses` times, then ready with `public_url`.
    pub async fn ready_after(&self, product_gs_url: &str, misses: usize, public_url: &str) {
        let mut answers = vec![ScriptedLookup::NotReady(404); misses];
        answers.push(ScriptedLookup::Ready(public_url.to_string()));
        self.script_lookups(product_gs_url, answers).await;
    }

    pub async fn uploads(&self) -> Vec<PhotoUpload> {
        self.uploads.lock().await.clone()
    }

    pub async fn list_calls(&self) -> Vec<(StoreSelector, ProductQuery)> {
        self.list_calls.lock().await.clone()
    }

    pub async fn triggers(&self) -> Vec<TriggerCall> {
        self.triggers.lock().await.clone()
    }

    /// Recorded `(photo_gs_url, product_gs_url)` lookups, in call order.
    pub async fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().await.clone()
    }

    pub async fn lookup_count(&self, product_gs_url: &str) -> usize {
        self.lookups
            .lock()
            .await
            .iter()
            .filter(|(_, product)| product == product_gs_url)
            .count()
    }
}

fn scripted_error(message: String) -> RoomvizError {
    RoomvizError::Backend {
        message,
        status: None,
        source: None,
    }
}

#[async_trait]
impl VisualizerBackend for MockBackend {
    async fn upload_image(&self, upload: PhotoUpload) -> Result<PhotoHandle, RoomvizError> {
        let stem = upload
            .file_name
            .rsplit_once('.')
            .map_or(upload.file_name.as_str(), |(stem, _)| stem)
            .to_string();
        let delay = self.upload_delays.lock().await.get(&upload.file_name).copied();
        self.uploads.lock().await.push(upload);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.upload_results.lock().await.pop_front() {
            Some(Ok(handle)) => Ok(handle),
            Some(Err(reason)) => Err(RoomvizError::Upload(reason)),
            None => Ok(photo_handle(&stem)),
        }
    }

    async fn list_products(
        &self,
        store: &StoreSelector,
        query: &ProductQuery,
    ) -> Result<Vec<Product>, RoomvizError> {
        self.list_calls
            .lock()
            .await
            .push((store.clone(), query.clone()));
        match self.pages.lock().await.pop_front() {
            Some(Ok(products)) => Ok(products),
            Some(Err(reason)) => Err(scripted_error(reason)),
            None => Ok(Vec::new()),
        }
    }

    async fn trigger_generation(
        &self,
        store_id: &str,
        photo_gs_url: &str,
        product_ids: &[ProductId],
    ) -> Result<(), RoomvizError> {
        self.triggers.lock().await.push(TriggerCall {
            store_id: store_id.to_string(),
            photo_gs_url: photo_gs_url.to_string(),
            product_ids: product_ids.to_vec(),
        });
        let delay = *self.trigger_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.trigger_failure.lock().await.clone() {
            Some(reason) => Err(scripted_error(reason)),
            None => Ok(()),
        }
    }

    async fn generated_image_url(
        &self,
        photo_gs_url: &str,
        product_gs_url: &str,
    ) -> Result<LookupOutcome, RoomvizError> {
        self.lookups
            .lock()
            .await
            .push((photo_gs_url.to_string(), product_gs_url.to_string()));
        let delay = self.lookup_delays.lock().await.get(product_gs_url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let next = self
            .lookup_scripts
            .lock()
            .await
            .get_mut(product_gs_url)
            .and_then(VecDeque::pop_front);
        match next {
            Some(ScriptedLookup::Ready(public_url)) => Ok(LookupOutcome::Ready { public_url }),
            Some(ScriptedLookup::NotReady(status)) => Ok(LookupOutcome::NotReady { status }),
            Some(ScriptedLookup::Error(reason)) => Err(scripted_error(reason)),
            None => Ok(LookupOutcome::NotReady { status: 404 }),
        }
    }
}
