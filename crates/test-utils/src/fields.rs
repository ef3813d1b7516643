//! Ready-made fields for tests that do not go through a GRIB file.

use grib_common::{Field, FieldMetadata};

/// Metadata for a 2 m temperature field of the given size.
pub fn temperature_metadata(width: usize, height: usize) -> FieldMetadata {
    FieldMetadata {
        name: Some("Temperature".to_string()),
        short_name: Some("TMP".to_string()),
        units: Some("K".to_string()),
        type_of_level: Some("heightAboveGround".to_string()),
        level_type: Some(103),
        level: Some(2.0),
        discipline: Some(0),
        parameter_category: Some(0),
        parameter_number: Some(0),
        centre: Some(7),
        edition: 2,
        width,
        height,
        ..FieldMetadata::default()
    }
}

/// Metadata with only a short name, units and grid size set.
pub fn named_metadata(short_name: &str, units: &str, width: usize, height: usize) -> FieldMetadata {
    FieldMetadata {
        short_name: Some(short_name.to_string()),
        units: Some(units.to_string()),
        edition: 2,
        width,
        height,
        ..FieldMetadata::default()
    }
}

/// Field from raw values; panics if the values do not fill the grid.
pub fn field_from_values(width: usize, height: usize, values: Vec<f32>) -> Field {
    Field::new(temperature_metadata(width, height), values).expect("test field values must fill the grid")
}
