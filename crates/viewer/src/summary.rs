//! Human-readable description of the selected field.

use std::fmt;

use grib_common::field::MISSING;
use grib_common::{Field, FieldMetadata, ValueRange};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    /// Source message index
    pub index: usize,
    pub metadata: FieldMetadata,
    /// Range of the finite values
    pub range: ValueRange,
    pub missing_points: usize,
}

impl FieldSummary {
    pub fn new(index: usize, field: &Field) -> Self {
        Self {
            index,
            metadata: field.metadata().clone(),
            range: field.range(),
            missing_points: field.missing_count(),
        }
    }

    /// One entry per display line.
    pub fn lines(&self) -> Vec<String> {
        let m = &self.metadata;
        let mut lines = vec![
            format!(
                "Field: {} ({}) on {}",
                m.name_or_missing(),
                m.short_name_or_missing(),
                m.type_of_level_or_missing()
            ),
            format!(
                "    parameterNumber = {}, category = {}, discipline = {}",
                code(m.parameter_number),
                code(m.parameter_category),
                code(m.discipline)
            ),
            format!("Level: {} (typeOfFirstFixedSurface: {})", m.level_display(), code(m.level_type)),
            format!("Units: {}", m.units_or_missing()),
            format!("Dimensions: {} x {}", m.width, m.height),
            format!("Value range: {:.6} to {:.6}", self.range.min, self.range.max),
        ];
        if self.missing_points > 0 {
            lines.push(format!("Missing points: {}", self.missing_points));
        }
        if let Some(time) = m.reference_time {
            lines.push(format!("Reference time: {}", time));
        }
        lines
    }
}

impl fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

fn code(value: Option<u8>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}
