// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence seam for the session cookie.

use serde::{Deserialize, Serialize};

use crate::error::RoomvizError;
use crate::types::SessionToken;

/// A persisted session token with its absolute expiry (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: SessionToken,
    pub expires_at: i64,
}

impl StoredSession {
    pub fn is_expired(&self, now_unix: i64) -> bool {
        now_unix >= self.expires_at
    }
}

/// Where the session cookie lives between runs.
pub trait SessionStore: Send + Sync {
    /// Reads the cookie named `name`. `Ok(None)` when nothing is stored.
    fn load(&self, name: &str) -> Result<Option<StoredSession>, RoomvizError>;

    /// Persists the cookie named `name`, replacing any previous value.
    fn save(&self, name: &str, session: &StoredSession) -> Result<(), RoomvizError>;
}
