//! Rendering
//!
//!     The typesetting engine is an external collaborator: `latex + display mode -> svg`.
//!     This module defines that boundary ([engine]), ships an engine backed by an external
//!     command ([command]) and coordinates batches of equations ([coordinator]).
//!
//!     Before anything reaches the engine, `\label{..}` commands and `%` comments are
//!     stripped; the engine does not understand them. See [prepare_for_engine].

pub mod command;
pub mod coordinator;
pub mod engine;

pub use command::CommandEngine;
pub use coordinator::{render_document, BatchToken, RenderCoordinator, RenderEvent};
pub use engine::{RenderRequest, RenderResponse, TypesetEngine};

use crate::eqsvg::parsing::labels::strip_labels;

/// Remove labels and comments from an equation body.
pub fn prepare_for_engine(latex: &str) -> String {
    let without_labels = strip_labels(latex);
    let lines: Vec<&str> = without_labels
        .lines()
        .map(strip_comment)
        .filter(|line| !line.trim().is_empty())
        .collect();
    lines.join("\n")
}

/// Cut a line at its first unescaped `%`.
fn strip_comment(line: &str) -> &str {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            '%' if !escaped => return &line[..index],
            _ => escaped = false,
        }
    }
    line
}
