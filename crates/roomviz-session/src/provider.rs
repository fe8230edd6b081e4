// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session identity provider.
//!
//! Returns the persisted token while it is within its retention window and
//! mints (and persists) a new one otherwise. Storage problems never fail the
//! call: an unreadable jar counts as "no token yet" and a failed write only
//! costs persistence.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use roomviz_config::model::SessionConfig;
use roomviz_core::{SessionStore, SessionToken, StoredSession};
use tracing::{debug, info, warn};

use crate::token;

pub struct SessionProvider {
    store: Arc<dyn SessionStore>,
    cookie_name: String,
    retention: Duration,
}

impl SessionProvider {
    pub fn new(store: Arc<dyn SessionStore>, cookie_name: impl Into<String>, retention_days: u32) -> Self {
        Self {
            store,
            cookie_name: cookie_name.into(),
            retention: Duration::days(i64::from(retention_days)),
        }
    }

    pub fn from_config(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self::new(store, config.cookie_name.clone(), config.retention_days)
    }

    pub fn get_or_create(&self) -> SessionToken {
        self.get_or_create_at(Utc::now())
    }

    /// Clock-injected variant of [`get_or_create`](Self::get_or_create).
    pub fn get_or_create_at(&self, now: DateTime<Utc>) -> SessionToken {
        let existing = match self.store.load(&self.cookie_name) {
            Ok(existing) => existing,
            Err(e) => {
                warn!(error = %e, "session cookie unreadable, starting a new session");
                None
            }
        };

        if let Some(session) = existing {
            if !session.is_expired(now.timestamp()) && !session.token.as_str().is_empty() {
                debug!(session_id = %session.token, "reusing session");
                return session.token;
            }
            debug!(session_id = %session.token, "session cookie expired");
        }

        let token = token::generate(now);
        let stored = StoredSession {
            token: token.clone(),
            expires_at: (now + self.retention).timestamp(),
        };
        if let Err(e) = self.store.save(&self.cookie_name, &stored) {
            warn!(error = %e, "failed to persist session cookie");
        }
        info!(session_id = %token, "created new session");
        token
    }
}

#[cfg(test)]
mod tests {
    use roomviz_core::RoomvizError;

    use super::*;
    use crate::store::MemorySessionStore;

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load(&self, _: &str) -> Result<Option<StoredSession>, RoomvizError> {
            Err(RoomvizError::Internal("disk gone".into()))
        }

        fn save(&self, _: &str, _: &StoredSession) -> Result<(), RoomvizError> {
            Err(RoomvizError::Internal("disk gone".into()))
        }
    }

    fn provider(store: Arc<dyn SessionStore>) -> SessionProvider {
        SessionProvider::new(store, "sessionId", 7)
    }

    #[test]
    fn same_token_within_retention_window() {
        let provider = provider(Arc::new(MemorySessionStore::new()));
        let start = Utc::now();
        let first = provider.get_or_create_at(start);
        let later = provider.get_or_create_at(start + Duration::days(6));
        assert_eq!(first, later);
        assert!(!first.as_str().is_empty());
    }

    #[test]
    fn expired_cookie_yields_new_token() {
        let store = Arc::new(MemorySessionStore::new());
        let provider = provider(store.clone());
        let start = Utc::now();
        let first = provider.get_or_create_at(start);
        let after = provider.get_or_create_at(start + Duration::days(7));
        assert_ne!(first, after);

        let saved = store.load("sessionId").unwrap().unwrap();
        assert_eq!(saved.token, after);
        assert_eq!(
            saved.expires_at,
            (start + Duration::days(14)).timestamp()
        );
    }

    #[test]
    fn token_is_not_refreshed_on_reuse() {
        let store = Arc::new(MemorySessionStore::new());
        let provider = provider(store.clone());
        let start = Utc::now();
        provider.get_or_create_at(start);
        let expiry = store.load("sessionId").unwrap().unwrap().expires_at;
        provider.get_or_create_at(start + Duration::days(3));
        assert_eq!(store.load("sessionId").unwrap().unwrap().expires_at, expiry);
    }

    #[tracing_test::traced_test]
    #[test]
    fn broken_storage_still_yields_a_token() {
        let provider = provider(Arc::new(BrokenStore));
        let token = provider.get_or_create();
        assert!(!token.as_str().is_empty());
        assert!(logs_contain("session cookie unreadable"));
        assert!(logs_contain("failed to persist session cookie"));
    }
}
