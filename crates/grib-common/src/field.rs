//! Decoded field data and the lightweight metadata kept per message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};
use crate::range::ValueRange;

/// Placeholder shown for metadata the decoder did not provide.
pub const MISSING: &str = "-";

/// Descriptive metadata for one message. Cheap to clone, carries no values.
///
/// Codes the message does not define are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Long parameter name (e.g. "Temperature")
    pub name: Option<String>,
    /// Short parameter name (e.g. "TMP")
    pub short_name: Option<String>,
    pub units: Option<String>,
    /// Human-readable level type (e.g. "isobaric", "surface")
    pub type_of_level: Option<String>,
    /// Code of the first fixed surface
    pub level_type: Option<u8>,
    /// Value of the first fixed surface, in the surface's own units
    pub level: Option<f64>,
    pub discipline: Option<u8>,
    pub parameter_category: Option<u8>,
    pub parameter_number: Option<u8>,
    /// Originating centre
    pub centre: Option<u16>,
    pub reference_time: Option<DateTime<Utc>>,
    /// GRIB edition of the enclosing message
    pub edition: u8,
    pub width: usize,
    pub height: usize,
    /// True when the first row of values is the southernmost one
    pub rows_south_to_north: bool,
}

impl FieldMetadata {
    pub fn short_name_or_missing(&self) -> &str {
        self.short_name.as_deref().unwrap_or(MISSING)
    }

    pub fn name_or_missing(&self) -> &str {
        self.name.as_deref().unwrap_or(MISSING)
    }

    pub fn units_or_missing(&self) -> &str {
        self.units.as_deref().unwrap_or(MISSING)
    }

    pub fn type_of_level_or_missing(&self) -> &str {
        self.type_of_level.as_deref().unwrap_or(MISSING)
    }

    /// Level value formatted without a trailing `.0` for whole numbers.
    pub fn level_display(&self) -> String {
        match self.level {
            Some(level) if level.fract() == 0.0 && level.abs() < 1e15 => format!("{}", level as i64),
            Some(level) => format!("{}", level),
            None => MISSING.to_string(),
        }
    }

    pub fn num_points(&self) -> usize {
        self.width * self.height
    }
}

/// One decoded message: grid dimensions, row-major values and metadata.
#[derive(Debug, Clone)]
pub struct Field {
    metadata: FieldMetadata,
    values: Vec<f32>,
    range: ValueRange,
}

impl Field {
    /// Build a field, validating that the values fill the grid.
    ///
    /// Missing points are carried as NaN and excluded from the min/max. A
    /// grid with every point missing is valid; its range is `[0, 0]`.
    pub fn new(metadata: FieldMetadata, values: Vec<f32>) -> FieldResult<Self> {
        let (width, height) = (metadata.width, metadata.height);
        if width == 0 || height == 0 {
            return Err(FieldError::EmptyGrid { width, height });
        }
        if values.is_empty() {
            return Err(FieldError::NoValues);
        }
        if values.len() != width * height {
            return Err(FieldError::SizeMismatch {
                width,
                height,
                expected: width * height,
                actual: values.len(),
            });
        }
        let range = ValueRange::from_values(&values).unwrap_or(ValueRange::new(0.0, 0.0));

        Ok(Self {
            metadata,
            values,
            range,
        })
    }

    pub fn metadata(&self) -> &FieldMetadata {
        &self.metadata
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.metadata.width
    }

    pub fn height(&self) -> usize {
        self.metadata.height
    }

    /// Min/max over the finite values.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn min(&self) -> f32 {
        self.range.min
    }

    pub fn max(&self) -> f32 {
        self.range.max
    }

    /// Value at grid column `x`, row `y` in storage order.
    pub fn value_at(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.values.get(y * self.width() + x).copied()
    }

    /// Number of missing (non-finite) points.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }
}
