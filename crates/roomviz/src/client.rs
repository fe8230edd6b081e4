// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session and backend construction shared by the subcommands.

use std::sync::Arc;

use roomviz_backend::HttpBackend;
use roomviz_config::RoomvizConfig;
use roomviz_core::{RoomvizError, SessionToken};
use roomviz_session::{FileSessionStore, SessionProvider};
use tracing::debug;

/// Returns the persisted session token, creating one on first use.
pub fn open_session(config: &RoomvizConfig) -> SessionToken {
    let store = Arc::new(FileSessionStore::new(&config.session.cookie_path));
    SessionProvider::from_config(store, &config.session).get_or_create()
}

/// Builds the HTTP backend bound to the current session.
pub fn connect(config: &RoomvizConfig) -> Result<Arc<HttpBackend>, RoomvizError> {
    let session = open_session(config);
    let backend = HttpBackend::new(&config.backend, &session)?;
    debug!(base_url = backend.base_url(), "backend client ready");
    Ok(Arc::new(backend))
}
