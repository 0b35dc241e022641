//! Core error types for pact-core.
//!
//! Uses `thiserror` for structured, matchable error variants.

use thiserror::Error;

/// Errors produced while moving syntax trees in and out of their JSON
/// interchange form.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The input could not be decoded as a syntax tree.
    #[error("invalid syntax tree: {0}")]
    InvalidTree(#[from] serde_json::Error),

    /// A named top-level function was requested but does not exist.
    #[error("function not found: '{name}'")]
    FunctionNotFound { name: String },
}
