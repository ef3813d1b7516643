//! Errors surfaced by the view state.

use std::path::PathBuf;

use grib_reader::ReadError;
use renderer::{GradientError, RenderError};
use thiserror::Error;

pub type ViewerResult<T> = Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Gradient error: {0}")]
    Gradient(#[from] GradientError),

    #[error("No file loaded")]
    NoSource,

    #[error("No field selected")]
    NoField,

    #[error("Cannot read viewer config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid viewer config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
