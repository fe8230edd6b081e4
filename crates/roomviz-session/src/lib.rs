// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session identity for the Roomviz client.
//!
//! The token plays the role of the browser's `sessionId` cookie: created on
//! first use, kept for a fixed retention window, and sent with every
//! backend request.

pub mod provider;
pub mod store;
pub mod token;

pub use provider::SessionProvider;
pub use store::{FileSessionStore, MemorySessionStore};
