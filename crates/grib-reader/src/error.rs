//! Errors raised while indexing or decoding GRIB files.

use std::path::PathBuf;

use grib_common::FieldError;
use thiserror::Error;

pub type ReadResult<T> = Result<T, ReadError>;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Cannot open file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Message index {index} out of range ({count} messages available)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Invalid GRIB message at byte offset {offset}: {reason}")]
    InvalidMessage { offset: u64, reason: String },

    #[error("Failed to decode message {index}: {reason}")]
    Decode { index: usize, reason: String },

    #[error("GRIB edition {edition} is not supported (message {index})")]
    UnsupportedEdition { index: usize, edition: u8 },

    #[error("Message {index} decoded to an unusable field: {source}")]
    Field {
        index: usize,
        #[source]
        source: FieldError,
    },
}
