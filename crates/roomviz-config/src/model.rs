// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Roomviz client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use std::time::Duration;

use roomviz_core::StoreSelector;
use serde::{Deserialize, Serialize};

/// Top-level Roomviz configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoomvizConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Visualizer backend endpoint.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Store (tenant) selection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Session cookie persistence.
    #[serde(default)]
    pub session: SessionConfig,

    /// Completion polling.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Room photo preparation before upload.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Catalog browsing defaults.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Visualizer backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://visualizer-backend-358835362025.northamerica-northeast2.run.app".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Store (tenant) selection. `store_id` wins over the store/company pair.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store identifier; required for generation requests.
    #[serde(default)]
    pub store_id: Option<String>,

    #[serde(default = "default_store")]
    pub store: String,

    #[serde(default = "default_company")]
    pub company: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_id: None,
            store: default_store(),
            company: default_company(),
        }
    }
}

impl StoreConfig {
    pub fn selector(&self) -> StoreSelector {
        match self.store_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => StoreSelector::Id(id.to_string()),
            _ => StoreSelector::Named {
                store: self.store.clone(),
                company: self.company.clone(),
            },
        }
    }
}

fn default_store() -> String {
    "Waltham".to_string()
}

fn default_company() -> String {
    "Lowes".to_string()
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Path of the cookie jar file.
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,

    /// Cookie name inside the jar.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Days a freshly created token stays valid.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_path: default_cookie_path(),
            cookie_name: default_cookie_name(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_cookie_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("roomviz").join("cookies.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("roomviz-cookies.json"))
        .to_string_lossy()
        .into_owned()
}

fn default_cookie_name() -> String {
    "sessionId".to_string()
}

fn default_retention_days() -> u32 {
    7
}

/// Completion polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Milliseconds between poll cycles.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Poll attempts per product before it is marked failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Milliseconds a transient advisory message stays visible.
    #[serde(default = "default_advisory_clear_ms")]
    pub advisory_clear_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
            advisory_clear_ms: default_advisory_clear_ms(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn advisory_clear(&self) -> Duration {
        Duration::from_millis(self.advisory_clear_ms)
    }
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_max_attempts() -> u32 {
    120
}

fn default_advisory_clear_ms() -> u64 {
    2000
}

/// Room photo preparation before upload.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Files above this size are re-encoded.
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,

    /// Longest allowed side in pixels.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// JPEG quality used when re-encoding (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size_bytes(),
            max_dimension: default_max_dimension(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_max_size_bytes() -> u64 {
    1_572_864
}

fn default_max_dimension() -> u32 {
    1920
}

fn default_jpeg_quality() -> u8 {
    85
}

/// Catalog browsing defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default = "default_category")]
    pub default_category: String,

    #[serde(default = "default_subcategory")]
    pub default_subcategory: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            default_subcategory: default_subcategory(),
        }
    }
}

fn default_category() -> String {
    "Flooring".to_string()
}

fn default_subcategory() -> Option<String> {
    Some("Wood".to_string())
}
