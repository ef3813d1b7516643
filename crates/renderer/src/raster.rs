//! False-color rasters of decoded fields.

use grib_common::Field;
use rayon::prelude::*;
use tracing::debug;

use crate::colormap::{ColorMapper, ViewSettings};
use crate::error::{RenderError, RenderResult};
use crate::gradient::Rgb;

/// Row-major pixel buffer of display (sRGB) colors, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// Raster filled with one color.
    pub fn filled(width: usize, height: usize, color: Rgb) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![color; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks_exact(self.width)
    }

    /// 3 bytes per pixel, for RGB texture upload.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_u8()).collect()
    }

    /// 4 bytes per pixel with opaque alpha.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&p.to_u8());
            out.push(255);
        }
        out
    }

    pub(crate) fn from_rows(width: usize, height: usize, fill: impl Fn(usize, &mut [Rgb]) + Sync) -> Self {
        let mut pixels = vec![Rgb::BLACK; width * height];
        pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
        Self { width, height, pixels }
    }
}

/// Render `field` into a `width` x `height` raster.
///
/// Each output pixel takes the nearest source cell
/// (`src = dst * field_size / out_size`). Rows are filled in parallel.
/// Fields stored south to north are flipped so north is at the top.
pub fn render_field(field: &Field, settings: &ViewSettings, width: usize, height: usize) -> RenderResult<Raster> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }

    let (fw, fh) = (field.width(), field.height());
    let values = field.values();
    let flip = field.metadata().rows_south_to_north;
    let mapper = ColorMapper::new(settings, field.range());

    // Column lookup is the same for every row
    let columns: Vec<usize> = (0..width).map(|x| x * fw / width).collect();

    let raster = Raster::from_rows(width, height, |y, row| {
        let src_y = y * fh / height;
        let src_y = if flip { fh - 1 - src_y } else { src_y };
        let src_row = &values[src_y * fw..(src_y + 1) * fw];
        for (pixel, &src_x) in row.iter_mut().zip(&columns) {
            *pixel = mapper.map_value(src_row[src_x]);
        }
    });

    debug!(
        width,
        height,
        field_width = fw,
        field_height = fh,
        range_min = mapper.range().min,
        range_max = mapper.range().max,
        "Rendered field raster"
    );
    Ok(raster)
}

/// Render at the field's native resolution.
pub fn render_field_native(field: &Field, settings: &ViewSettings) -> RenderResult<Raster> {
    render_field(field, settings, field.width(), field.height())
}
