// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cookie jar implementations of [`SessionStore`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use roomviz_core::{RoomvizError, SessionStore, StoredSession};
use tracing::{debug, warn};

/// JSON cookie jar on disk: `{ "<cookie name>": { "token": …, "expires_at": … } }`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw jar contents; `None` when the file does not exist yet.
    fn read_raw(&self) -> Result<Option<String>, RoomvizError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(session_error("failed to read cookie jar", e)),
        }
    }

    fn read_jar(&self) -> Result<BTreeMap<String, StoredSession>, RoomvizError> {
        match self.read_raw()? {
            Some(content) => {
                serde_json::from_str(&content).map_err(|e| session_error("corrupt cookie jar", e))
            }
            None => Ok(BTreeMap::new()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, name: &str) -> Result<Option<StoredSession>, RoomvizError> {
        Ok(self.read_jar()?.remove(name))
    }

    fn save(&self, name: &str, session: &StoredSession) -> Result<(), RoomvizError> {
        // A corrupt jar is replaced; an unreadable one fails the write.
        let mut jar: BTreeMap<String, StoredSession> = match self.read_raw()? {
            Some(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "replacing corrupt cookie jar");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        jar.insert(name.to_string(), session.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| session_error("failed to create cookie directory", e))?;
        }
        let json = serde_json::to_string_pretty(&jar)
            .map_err(|e| session_error("failed to encode cookie jar", e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| session_error("failed to write cookie jar", e))?;
        debug!(path = %self.path.display(), cookie = name, "cookie saved");
        Ok(())
    }
}

/// In-process cookie jar, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    jar: Mutex<BTreeMap<String, StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, name: &str) -> Result<Option<StoredSession>, RoomvizError> {
        let jar = self
            .jar
            .lock()
            .map_err(|_| RoomvizError::Internal("session jar lock poisoned".into()))?;
        Ok(jar.get(name).cloned())
    }

    fn save(&self, name: &str, session: &StoredSession) -> Result<(), RoomvizError> {
        let mut jar = self
            .jar
            .lock()
            .map_err(|_| RoomvizError::Internal("session jar lock poisoned".into()))?;
        jar.insert(name.to_string(), session.clone());
        Ok(())
    }
}

fn session_error(context: &str, err: impl std::error::Error + Send + Sync + 'static) -> RoomvizError {
    RoomvizError::Session {
        message: format!("{context}: {err}"),
        source: Some(Box::new(err)),
    }
}
