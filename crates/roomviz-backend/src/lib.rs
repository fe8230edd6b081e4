// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of the visualizer backend plus photo preparation.

pub mod client;
pub mod photo;
pub mod wire;

pub use client::HttpBackend;
pub use photo::{load_photo, prepare_photo};
