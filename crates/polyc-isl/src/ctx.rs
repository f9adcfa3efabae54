//! The isl context.

use std::ffi::{c_int, CString};

use crate::error::{IslError, IslErrorKind};
use crate::ffi;

/// An isl context.
///
/// Every polyhedral object in this crate borrows the context it was created
/// from, so nothing can outlive it. A context must not be shared across
/// threads; the raw handle keeps this type `!Send` and `!Sync`.
#[derive(Debug)]
pub struct Context {
    pub(crate) raw: *mut ffi::isl_ctx,
}

impl Context {
    /// Allocates a fresh context. isl is switched to continue-on-error mode
    /// so that failures surface as `IslError` values instead of aborting the
    /// process.
    pub fn new() -> Context {
        // SAFETY: isl_ctx_alloc has no preconditions; a NULL return is an
        // unrecoverable allocation failure.
        let raw = unsafe { ffi::isl_ctx_alloc() };
        assert!(!raw.is_null(), "isl_ctx_alloc returned NULL");
        unsafe {
            ffi::isl_options_set_on_error(raw, ffi::ISL_ON_ERROR_CONTINUE);
        }
        Context { raw }
    }

    /// Reads and clears the last recorded isl error kind.
    pub(crate) fn take_error_kind(&self) -> IslErrorKind {
        let raw = unsafe { ffi::isl_ctx_last_error(self.raw) };
        unsafe { ffi::isl_ctx_reset_error(self.raw) };
        if raw == ffi::ISL_ERROR_NONE {
            IslErrorKind::Unknown
        } else {
            IslErrorKind::from_raw(raw)
        }
    }

    /// Checks a pointer produced by an isl call, converting NULL into a
    /// structured error naming the operation.
    pub(crate) fn check<T>(&self, ptr: *mut T, operation: &'static str) -> Result<*mut T, IslError> {
        if ptr.is_null() {
            Err(IslError::new(operation, self.take_error_kind()))
        } else {
            Ok(ptr)
        }
    }

    /// Like [`Context::check`], attaching the textual literal that was being
    /// parsed.
    pub(crate) fn check_parse<T>(
        &self,
        ptr: *mut T,
        operation: &'static str,
        literal: &str,
    ) -> Result<*mut T, IslError> {
        if ptr.is_null() {
            Err(IslError::with_literal(
                operation,
                self.take_error_kind(),
                literal,
            ))
        } else {
            Ok(ptr)
        }
    }

    /// Checks an `isl_bool` return value (-1 error, 0 false, 1 true).
    pub(crate) fn check_bool(&self, b: c_int, operation: &'static str) -> Result<bool, IslError> {
        match b {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(IslError::new(operation, self.take_error_kind())),
        }
    }

    /// Checks an `isl_size` return value (negative on error).
    pub(crate) fn check_size(&self, n: c_int, operation: &'static str) -> Result<usize, IslError> {
        if n < 0 {
            Err(IslError::new(operation, self.take_error_kind()))
        } else {
            Ok(n as usize)
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe { ffi::isl_ctx_free(self.raw) };
    }
}

/// Converts a Rust string into a C string for isl parsing entry points.
pub(crate) fn to_cstring(text: &str, operation: &'static str) -> Result<CString, IslError> {
    CString::new(text)
        .map_err(|_| IslError::with_literal(operation, IslErrorKind::Invalid, text))
}

/// Copies and frees a `char *` owned by the caller (isl's `*_to_str`
/// results are allocated with malloc).
pub(crate) unsafe fn take_isl_string(ptr: *mut std::ffi::c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let s = std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned();
    ffi::free(ptr.cast());
    s
}

/// Copies a borrowed `const char *` without taking ownership.
pub(crate) unsafe fn borrow_isl_string(ptr: *const std::ffi::c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_allocates_and_drops() {
        let ctx = Context::new();
        assert!(!ctx.raw.is_null());
    }

    #[test]
    fn nul_in_literal_is_rejected() {
        let err = to_cstring("{ S[i] \0 }", "test").unwrap_err();
        assert!(err.literal().is_some());
    }
}
