//! The capability the viewer needs from anything that holds fields.

use grib_common::{Field, FieldMetadata};

use crate::error::ReadResult;

/// Random access to the fields of a message collection.
///
/// `metadata` is cheap and never decodes values; `field` performs the full
/// decode of one message.
pub trait FieldSource {
    /// Number of fields available.
    fn count(&self) -> usize;

    /// Descriptive metadata of field `index`.
    fn metadata(&self, index: usize) -> ReadResult<&FieldMetadata>;

    /// Decode field `index`.
    fn field(&mut self, index: usize) -> ReadResult<Field>;

    /// Metadata of every field, in source order.
    fn all_metadata(&self) -> Vec<&FieldMetadata> {
        (0..self.count())
            .filter_map(|index| self.metadata(index).ok())
            .collect()
    }
}

impl<S: FieldSource + ?Sized> FieldSource for Box<S> {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn metadata(&self, index: usize) -> ReadResult<&FieldMetadata> {
        (**self).metadata(index)
    }

    fn field(&mut self, index: usize) -> ReadResult<Field> {
        (**self).field(index)
    }
}
