//! Structural IR errors.
//!
//! Uses `thiserror` for structured, matchable variants. Every variant names
//! the offending entity; these correspond to the "malformed IR" failure
//! class -- they are raised before any polyhedral work starts.

use thiserror::Error;

/// Errors produced by structural validation of the IR.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required name is empty or missing.
    #[error("missing name for {context}")]
    MissingName { context: String },

    /// A name is declared twice within one scope.
    #[error("duplicate name '{name}' in {context}")]
    DuplicateName { name: String, context: String },

    /// A constraint or schedule references a name that is neither an
    /// iterator nor a declared parameter.
    #[error("unknown name '{name}' referenced in {context}")]
    UnknownName { name: String, context: String },

    /// A tensor access supplies the wrong number of indices.
    #[error("rank mismatch for tensor '{tensor}' in {context}: expected {expected} indices, got {got}")]
    RankMismatch {
        tensor: String,
        expected: usize,
        got: usize,
        context: String,
    },

    /// A shape extent is neither an integer literal nor a parameter.
    #[error("shape extent of tensor '{tensor}' must be an integer literal or a parameter")]
    NonLiteralExtent { tensor: String },
}
