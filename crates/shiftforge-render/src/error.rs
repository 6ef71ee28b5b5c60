//! Error types for rendering.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A clock string is not `HH:MM` or `HH:MM-HH:MM`.
    #[error("Invalid clock '{input}': {reason}")]
    InvalidClock { input: String, reason: String },

    /// The assignment does not match the roster, horizon or catalog.
    #[error("Assignment is {actual:?} but the grid needs {expected:?} (employees, days, templates)")]
    DimensionMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    pub(crate) fn clock(input: &str, reason: impl Into<String>) -> Self {
        RenderError::InvalidClock {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
