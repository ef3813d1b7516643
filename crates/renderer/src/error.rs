//! Error types for gradients and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid gradient definitions and gradient configuration files.
#[derive(Debug, Error)]
pub enum GradientError {
    #[error("Gradient '{name}' needs at least two stops, got {count}")]
    TooFewStops { name: String, count: usize },

    #[error("Gradient '{name}' must start at 0 and end at 1 (got {first} and {last})")]
    BadEndpoints { name: String, first: f32, last: f32 },

    #[error("Gradient '{name}': stop {index} is not after the previous stop")]
    NotIncreasing { name: String, index: usize },

    #[error("Gradient '{name}': invalid color '{color}'")]
    InvalidColor { name: String, color: String },

    #[error("Unknown gradient: {0}")]
    UnknownGradient(String),

    #[error("Cannot read gradient config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid gradient config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while producing pixel buffers or encoding them.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
