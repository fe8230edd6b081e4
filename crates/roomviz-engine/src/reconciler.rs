// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derives what to display from the application state. Holds no state of its own.

use roomviz_core::ProductId;

use crate::state::{AppState, GenerationState};

/// The base image layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayImage {
    /// No photo yet; the user is asked to provide one.
    UploadPrompt,
    /// A photo upload is in flight.
    Uploading,
    /// The uploaded room photo.
    Photo(String),
    /// The selected product composited into the room.
    Composite(String),
}

impl DisplayImage {
    /// URL of the image to show, if there is one.
    pub fn url(&self) -> Option<&str> {
        match self {
            DisplayImage::Photo(url) | DisplayImage::Composite(url) => Some(url),
            DisplayImage::UploadPrompt | DisplayImage::Uploading => None,
        }
    }
}

/// Everything a renderer needs to draw the visualizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Image drawn underneath everything else.
    pub base: DisplayImage,
    /// The selected product's composite is still being generated.
    pub generating_overlay: bool,
    /// Transient message for the user, cleared by a timer.
    pub advisory: Option<String>,
    /// Product the user focused last.
    pub selected: Option<ProductId>,
    /// Composites still being generated.
    pub pending: usize,
    /// Composites ready to show.
    pub completed: usize,
    /// Products that could not be generated.
    pub failed: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            base: DisplayImage::UploadPrompt,
            generating_overlay: false,
            advisory: None,
            selected: None,
            pending: 0,
            completed: 0,
            failed: 0,
        }
    }
}

/// Computes the view for `state`.
pub fn derive(state: &AppState) -> ViewState {
    let selected_entry = state
        .selected()
        .and_then(|p| state.entry(&p.product_id));

    let base = match (state.photo(), selected_entry.map(|e| &e.state)) {
        (Some(_), Some(GenerationState::Completed { public_url })) => {
            DisplayImage::Composite(public_url.clone())
        }
        (Some(photo), _) => DisplayImage::Photo(photo.public_url.clone()),
        (None, _) if state.upload_in_flight() => DisplayImage::Uploading,
        (None, _) => DisplayImage::UploadPrompt,
    };

    let mut view = ViewState {
        base,
        generating_overlay: matches!(
            selected_entry.map(|e| &e.state),
            Some(GenerationState::Requested)
        ),
        advisory: state.advisory().map(str::to_owned),
        selected: state.selected().map(|p| p.product_id.clone()),
        ..ViewState::default()
    };
    for entry in state.entries() {
        match entry.state {
            GenerationState::Requested => view.pending += 1,
            GenerationState::Completed { .. } => view.completed += 1,
            GenerationState::Failed { .. } => view.failed += 1,
        }
    }
    view
}
