// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::RoomvizConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &RoomvizConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "app.log_level `{}` must be one of {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let base_url = config.backend.base_url.trim();
    if base_url.is_empty() {
        fail("backend.base_url must not be empty".to_string());
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "backend.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.backend.timeout_secs == 0 {
        fail("backend.timeout_secs must be at least 1".to_string());
    }

    if config.store.store_id.is_none()
        && (config.store.store.trim().is_empty() || config.store.company.trim().is_empty())
    {
        fail("store.store and store.company must be set when store.store_id is absent".to_string());
    }

    if config.session.cookie_path.trim().is_empty() {
        fail("session.cookie_path must not be empty".to_string());
    }

    if config.session.cookie_name.trim().is_empty() {
        fail("session.cookie_name must not be empty".to_string());
    }

    if config.session.retention_days == 0 {
        fail("session.retention_days must be at least 1".to_string());
    }

    if config.polling.interval_ms == 0 {
        fail("polling.interval_ms must be at least 1".to_string());
    }

    if config.polling.max_attempts == 0 {
        fail("polling.max_attempts must be at least 1".to_string());
    }

    if config.upload.max_dimension == 0 {
        fail("upload.max_dimension must be at least 1".to_string());
    }

    if !(1..=100).contains(&config.upload.jpeg_quality) {
        fail(format!(
            "upload.jpeg_quality must be between 1 and 100, got {}",
            config.upload.jpeg_quality
        ));
    }

    if config.catalog.default_category.trim().is_empty() {
        fail("catalog.default_category must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&RoomvizConfig::default()).is_ok());
    }

    #[test]
    fn non_http_base_url_fails() {
        let mut config = RoomvizConfig::default();
        config.backend.base_url = "ftp://example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("backend.base_url")));
    }

    #[test]
    fn zero_polling_values_fail() {
        let mut config = RoomvizConfig::default();
        config.polling.interval_ms = 0;
        config.polling.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = RoomvizConfig::default();
        config.app.log_level = "loud".into();
        config.session.retention_days = 0;
        config.upload.jpeg_quality = 0;
        let errors = validate_config(&config).unwrap_err();
        let msgs = messages(&errors);
        assert!(msgs.iter().any(|m| m.contains("app.log_level")));
        assert!(msgs.iter().any(|m| m.contains("retention_days")));
        assert!(msgs.iter().any(|m| m.contains("jpeg_quality")));
    }

    #[test]
    fn named_store_needs_company() {
        let mut config = RoomvizConfig::default();
        config.store.company = " ".into();
        assert!(validate_config(&config).is_err());

        config.store.store_id = Some("s-1".into());
        assert!(validate_config(&config).is_ok());
    }
}
