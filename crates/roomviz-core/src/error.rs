// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Roomviz visualizer client.

use thiserror::Error;

/// The primary error type used across all Roomviz crates.
#[derive(Debug, Error)]
pub enum RoomvizError {
    /// Configuration errors (invalid values, unusable paths, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Session cookie jar could not be read or written.
    #[error("session error: {message}")]
    Session {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Visualizer backend errors (transport failure, non-2xx status, bad payload).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        /// HTTP status when the backend answered at all.
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Room photo upload was rejected or could not be sent.
    #[error("upload failed: {0}")]
    Upload(String),

    /// Product catalog could not be fetched.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Room photo could not be read or prepared for upload.
    #[error("photo error: {message}")]
    Photo {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RoomvizError {
    /// Builds a [`RoomvizError::Backend`] for a transport-level failure.
    pub fn transport(context: &str, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        RoomvizError::Backend {
            message: format!("{context}: {err}"),
            status: None,
            source: Some(Box::new(err)),
        }
    }

    /// Builds a [`RoomvizError::Backend`] for a non-success HTTP status.
    pub fn status(context: &str, status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("{context}: backend returned {status}")
        } else {
            format!("{context}: backend returned {status}: {body}")
        };
        RoomvizError::Backend {
            message,
            status: Some(status),
            source: None,
        }
    }

    /// HTTP status carried by a backend error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RoomvizError::Backend { status, .. } => *status,
            _ => None,
        }
    }
}
