//! Analysis error types.

use thiserror::Error;

use polyc_core::CoreError;
use polyc_isl::IslError;

/// Reasons an expression or constraint cannot be rendered as affine text.
///
/// These are recoverable inside access extraction (the offending access is
/// dropped from the relations) and fatal when they occur in a domain
/// constraint.
#[derive(Debug, Error)]
pub enum AffineError {
    /// Data-dependent term: a tensor load inside an index or predicate.
    #[error("load of tensor '{tensor}' is not affine")]
    NonAffine { tensor: String },

    /// A construct the affine fragment does not cover.
    #[error("unsupported construct in affine context: {detail}")]
    Unsupported { detail: String },
}

/// Errors produced by the analysis passes.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Isl(#[from] IslError),

    /// A non-affine or unsupported construct in a position where the
    /// pipeline cannot recover (e.g. a domain constraint).
    #[error("in {context}: {source}")]
    Unsupported {
        context: String,
        source: AffineError,
    },
}

impl AnalysisError {
    pub(crate) fn unsupported(context: impl Into<String>, source: AffineError) -> Self {
        AnalysisError::Unsupported {
            context: context.into(),
            source,
        }
    }
}
