// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Roomviz visualizer client.
//!
//! Holds the error type, the closed domain types exchanged with the
//! visualizer backend, the category taxonomy, and the traits the engine
//! depends on instead of concrete HTTP or filesystem code.

pub mod error;
pub mod taxonomy;
pub mod traits;
pub mod types;

pub use error::RoomvizError;
pub use taxonomy::Category;
pub use traits::{SessionStore, StoredSession, VisualizerBackend};
pub use types::{
    LookupOutcome, PhotoHandle, PhotoUpload, Product, ProductId, ProductQuery, SessionToken,
    StoreSelector,
};
