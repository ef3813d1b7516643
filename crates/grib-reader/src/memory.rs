//! A `FieldSource` over fields that are already decoded.

use grib_common::{Field, FieldMetadata};

use crate::error::{ReadError, ReadResult};
use crate::source::FieldSource;

/// Holds decoded fields in memory and hands out clones on request.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    fields: Vec<Field>,
}

impl InMemorySource {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }
}

impl From<Vec<Field>> for InMemorySource {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}

impl FieldSource for InMemorySource {
    fn count(&self) -> usize {
        self.fields.len()
    }

    fn metadata(&self, index: usize) -> ReadResult<&FieldMetadata> {
        self.fields
            .get(index)
            .map(Field::metadata)
            .ok_or(ReadError::IndexOutOfRange {
                index,
                count: self.fields.len(),
            })
    }

    fn field(&mut self, index: usize) -> ReadResult<Field> {
        self.fields.get(index).cloned().ok_or(ReadError::IndexOutOfRange {
            index,
            count: self.fields.len(),
        })
    }
}
