// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./roomviz.toml` > `~/.config/roomviz/roomviz.toml` > `/etc/roomviz/roomviz.toml`
//! with environment variable overrides via `ROOMVIZ_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RoomvizConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/roomviz/roomviz.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "roomviz.toml";

/// Top-level sections, used to map `ROOMVIZ_<SECTION>_<KEY>` onto `section.key`.
const SECTIONS: &[&str] = &[
    "app", "backend", "store", "session", "polling", "upload", "catalog",
];

/// User config file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("roomviz").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/roomviz/roomviz.toml`
/// 3. `~/.config/roomviz/roomviz.toml`
/// 4. `./roomviz.toml`
/// 5. `ROOMVIZ_*` environment variables
pub fn load_config() -> Result<RoomvizConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over compiled defaults (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<RoomvizConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RoomvizConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RoomvizConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RoomvizConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RoomvizConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `ROOMVIZ_POLLING_MAX_ATTEMPTS` to `polling.max_attempts`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that themselves contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("ROOMVIZ_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
