// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of view states.

use colored::Colorize;
use roomviz_engine::{DisplayImage, GenerationEntry, GenerationState, ViewState};

/// One status line for `view`.
pub fn view_line(view: &ViewState) -> String {
    let base = match &view.base {
        DisplayImage::UploadPrompt => "no photo".dimmed().to_string(),
        DisplayImage::Uploading => "uploading photo...".yellow().to_string(),
        DisplayImage::Photo(url) => format!("{} {url}", "photo".blue()),
        DisplayImage::Composite(url) => format!("{} {url}", "composite".green().bold()),
    };

    let mut line = base;
    if let Some(selected) = &view.selected {
        line.push_str(&format!("  [{}]", selected.as_str().cyan()));
    }
    if view.generating_overlay {
        line.push_str(&format!("  {}", "generating".yellow()));
    }
    line.push_str(&format!(
        "  ({} pending, {} done, {} failed)",
        view.pending, view.completed, view.failed
    ));
    if let Some(advisory) = &view.advisory {
        line.push_str(&format!("  {}", advisory.italic()));
    }
    line
}

/// Final line for one product.
pub fn outcome_line(entry: &GenerationEntry) -> String {
    let id = entry.product.product_id.as_str();
    match &entry.state {
        GenerationState::Completed { public_url } => {
            format!("{} {id}: {public_url}", "✓".green())
        }
        GenerationState::Failed { reason } => format!("{} {id}: {}", "✗".red(), reason.red()),
        GenerationState::Requested => format!("{} {id}: still generating", "…".yellow()),
    }
}
