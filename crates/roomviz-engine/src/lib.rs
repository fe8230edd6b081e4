// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation tracking for the Roomviz visualizer.
//!
//! - [`state`]: the application-state store and its typed actions
//! - [`visualizer`]: the runtime that executes effects and publishes views
//! - [`poller`]: completion polling for pending composites
//! - [`reconciler`]: derivation of what to display
//! - [`catalog`]: paged product listing

pub mod catalog;
mod poller;
pub mod reconciler;
pub mod shutdown;
pub mod state;
pub mod visualizer;

pub use catalog::Catalog;
pub use reconciler::{DisplayImage, ViewState};
pub use shutdown::install_signal_handler;
pub use state::{Action, AppState, Effect, GenerationEntry, GenerationState, PendingLookup};
pub use visualizer::{EngineSettings, Visualizer};
