//! Common types shared across the grib-viewer crates.

pub mod error;
pub mod field;
pub mod range;

pub use error::{FieldError, FieldResult};
pub use field::{Field, FieldMetadata};
pub use range::ValueRange;
