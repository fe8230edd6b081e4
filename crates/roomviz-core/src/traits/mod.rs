// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the engine and its collaborators.

pub mod backend;
pub mod session_store;

pub use backend::VisualizerBackend;
pub use session_store::{SessionStore, StoredSession};
