//! Error reporting for the isl wrapper.

use thiserror::Error;

/// Classification of an underlying isl failure, mirroring `enum isl_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IslErrorKind {
    Abort,
    Alloc,
    Internal,
    Invalid,
    Quota,
    Unsupported,
    Unknown,
}

impl IslErrorKind {
    pub(crate) fn from_raw(raw: std::ffi::c_int) -> Self {
        use crate::ffi;
        match raw {
            ffi::ISL_ERROR_ABORT => IslErrorKind::Abort,
            ffi::ISL_ERROR_ALLOC => IslErrorKind::Alloc,
            ffi::ISL_ERROR_INTERNAL => IslErrorKind::Internal,
            ffi::ISL_ERROR_INVALID => IslErrorKind::Invalid,
            ffi::ISL_ERROR_QUOTA => IslErrorKind::Quota,
            ffi::ISL_ERROR_UNSUPPORTED => IslErrorKind::Unsupported,
            _ => IslErrorKind::Unknown,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            IslErrorKind::Abort => "abort",
            IslErrorKind::Alloc => "allocation failure",
            IslErrorKind::Internal => "internal error",
            IslErrorKind::Invalid => "invalid input",
            IslErrorKind::Quota => "quota exceeded",
            IslErrorKind::Unsupported => "unsupported operation",
            IslErrorKind::Unknown => "unknown error",
        }
    }
}

impl std::fmt::Display for IslErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed isl operation. Parse failures carry the offending set/map
/// literal so callers can report exactly what was rejected.
#[derive(Debug, Error)]
pub enum IslError {
    #[error("isl {operation} failed on `{literal}`: {kind}")]
    Literal {
        operation: &'static str,
        literal: String,
        kind: IslErrorKind,
    },

    #[error("isl {operation} failed: {kind}")]
    Operation {
        operation: &'static str,
        kind: IslErrorKind,
    },
}

impl IslError {
    pub(crate) fn new(operation: &'static str, kind: IslErrorKind) -> Self {
        IslError::Operation { operation, kind }
    }

    pub(crate) fn with_literal(
        operation: &'static str,
        kind: IslErrorKind,
        literal: &str,
    ) -> Self {
        IslError::Literal {
            operation,
            literal: literal.to_string(),
            kind,
        }
    }

    /// The failing literal, if this error came from parsing one.
    pub fn literal(&self) -> Option<&str> {
        match self {
            IslError::Literal { literal, .. } => Some(literal),
            IslError::Operation { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_literal() {
        let err =
            IslError::with_literal("union_set_read_from_str", IslErrorKind::Invalid, "{ bad");
        let msg = err.to_string();
        assert!(msg.contains("union_set_read_from_str"));
        assert!(msg.contains("{ bad"));
        assert_eq!(err.literal(), Some("{ bad"));
    }
}
