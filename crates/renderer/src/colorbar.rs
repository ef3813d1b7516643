//! Legend strip for the active gradient and its tick labels.

use grib_common::ValueRange;
use tracing::debug;

use crate::colormap::{ColorMapper, ViewSettings};
use crate::error::{RenderError, RenderResult};
use crate::gradient::Rgb;
use crate::raster::Raster;

pub const DEFAULT_WIDTH: usize = 500;
pub const DEFAULT_HEIGHT: usize = 20;

/// Render the horizontal legend strip.
///
/// Column `x` shows normalized position `x / (width - 1)` through the same
/// response curve, quantization and gradient as the field raster, so the
/// strip depends on neither the field nor the range policy.
pub fn render_colorbar(settings: &ViewSettings, width: usize, height: usize) -> RenderResult<Raster> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }

    let mapper = ColorMapper::new(settings, ValueRange::new(0.0, 1.0));
    let denom = (width.max(2) - 1) as f32;
    let strip: Vec<Rgb> = (0..width)
        .map(|x| mapper.map_normalized(x as f32 / denom))
        .collect();

    let raster = Raster::from_rows(width, height, |_, row| row.copy_from_slice(&strip));
    debug!(width, height, gradient = settings.gradient.name(), "Rendered colorbar");
    Ok(raster)
}

/// A labelled position along the colorbar.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorbarTick {
    /// Pixel column in a strip of the requested width
    pub x: usize,
    /// Data value at that column
    pub value: f32,
    pub label: String,
}

/// `count` evenly spaced ticks over `range`, endpoints included.
///
/// A single tick sits at the middle of the strip.
pub fn colorbar_ticks(range: ValueRange, count: usize, width: usize) -> Vec<ColorbarTick> {
    if count == 0 || width == 0 {
        return Vec::new();
    }
    let last_x = (width - 1) as f32;

    if count == 1 {
        let value = range.denormalize(0.5);
        return vec![ColorbarTick {
            x: (last_x * 0.5).round() as usize,
            value,
            label: format_tick(value, range.span()),
        }];
    }

    let step = range.span() / (count - 1) as f32;
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            let value = range.denormalize(t);
            ColorbarTick {
                x: (t * last_x).round() as usize,
                value,
                label: format_tick(value, step),
            }
        })
        .collect()
}

/// Format `value` with enough decimals to tell ticks `step` apart.
pub fn format_tick(value: f32, step: f32) -> String {
    let step = step.abs();
    let decimals = if step > 0.0 && step.is_finite() {
        (1 - step.log10().floor() as i32).clamp(0, 6) as usize
    } else {
        2
    };
    let label = format!("{:.*}", decimals, value);
    // Avoid "-0" labels
    if label.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        label.trim_start_matches('-').to_string()
    } else {
        label
    }
}
