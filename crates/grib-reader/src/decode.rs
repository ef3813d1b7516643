//! Bridge between raw message bytes and the `grib` crate.

use std::io::Cursor;

use grib_common::FieldMetadata;

use crate::sections;
use crate::tables::Grib2Tables;

/// Fixed-surface type meaning "no surface"
const SURFACE_MISSING: u8 = 255;

/// Describe every submessage of one GRIB2 message without decoding values.
pub(crate) fn decode_metadata(data: &[u8], tables: &Grib2Tables) -> Result<Vec<FieldMetadata>, String> {
    let grib2 = grib::from_reader(Cursor::new(data)).map_err(|e| e.to_string())?;

    let centre = sections::centre(data);
    let reference_time = sections::reference_time(data);
    let rows_south_to_north = sections::rows_south_to_north(data);

    let mut submessages = Vec::new();
    for (_index, submsg) in grib2.iter() {
        let discipline = submsg.indicator().discipline;
        let prod_def = submsg.prod_def();
        let category = prod_def.parameter_category();
        let number = prod_def.parameter_number();

        let (width, height) = match submsg.grid_shape() {
            Ok(shape) => shape,
            Err(e) => sections::grid_size(data).ok_or_else(|| e.to_string())?,
        };

        let mut metadata = FieldMetadata {
            discipline: Some(discipline),
            parameter_category: category,
            parameter_number: number,
            centre,
            reference_time,
            edition: 2,
            width,
            height,
            rows_south_to_north,
            ..FieldMetadata::default()
        };

        if let (Some(c), Some(n)) = (category, number) {
            match tables.parameter(discipline, c, n) {
                Some(info) => {
                    metadata.short_name = Some(info.short_name.clone());
                    metadata.name = Some(info.name.clone());
                    metadata.units = Some(info.units.clone());
                }
                None => metadata.short_name = Some(tables.get_parameter_name(discipline, c, n)),
            }
        }

        if let Some((first, _second)) = prod_def.fixed_surfaces() {
            if first.surface_type != SURFACE_MISSING {
                metadata.level_type = Some(first.surface_type);
                metadata.type_of_level = Some(tables.get_level_name(first.surface_type));
                let raw = f64::from(first.scaled_value) * 10f64.powi(-i32::from(first.scale_factor));
                metadata.level = Some(tables.scale_level(first.surface_type, raw));
            }
        }

        submessages.push(metadata);
    }

    if submessages.is_empty() {
        return Err("message contains no submessages".to_string());
    }
    Ok(submessages)
}

/// Decode the first `num_points` values of one submessage. Bitmapped points come back as NaN.
///
/// The bitmap is padded to a whole byte, so the decoder can yield a few trailing values past the grid.
pub(crate) fn decode_values(data: &[u8], submessage: usize, num_points: usize) -> Result<Vec<f32>, String> {
    let grib2 = grib::from_reader(Cursor::new(data)).map_err(|e| e.to_string())?;

    let (_index, submsg) = grib2
        .iter()
        .nth(submessage)
        .ok_or_else(|| format!("submessage {} not found", submessage))?;

    let decoder = grib::Grib2SubmessageDecoder::from(submsg).map_err(|e| e.to_string())?;
    let values = decoder.dispatch().map_err(|e| e.to_string())?;
    Ok(values.take(num_points).collect())
}
