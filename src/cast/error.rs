//! Error types for cast and packing operations.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors that can occur while converting a stored representation back to
/// a native type.
///
/// Every variant means "the key exists but its value does not fit the
/// requested type"; the facade reports them as [`crate::Error::BadValue`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    #[error("Type mismatch: expected {expected}, got {found}")]
    Mismatch { expected: ValueKind, found: ValueKind },

    #[error("Width mismatch: expected {expected} bytes, got {found}")]
    Width { expected: usize, found: usize },

    #[error("Stored {0} value is NaN")]
    NanSentinel(ValueKind),

    #[error("Invalid bool value: {0}")]
    InvalidBool(u8),

    #[error("Invalid UTF-8 in text value")]
    InvalidUtf8,

    #[error("Malformed {domain} value")]
    Malformed { domain: &'static str },

    #[error("Unsupported read type: {0}")]
    Unsupported(ValueKind),
}
