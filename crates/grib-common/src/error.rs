//! Error types for decoded field data.

use thiserror::Error;

/// Result type alias using FieldError.
pub type FieldResult<T> = Result<T, FieldError>;

/// A decoded field that cannot be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Field has zero-sized grid ({width}x{height})")]
    EmptyGrid { width: usize, height: usize },

    #[error("Field has no values")]
    NoValues,

    #[error("Value count mismatch: grid {width}x{height} expects {expected}, got {actual}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}
