//! Minimal PNG encoder for rasters and colorbars.
//!
//! Rasters with at most 256 distinct colors (quantized views, colorbars)
//! are written as indexed PNGs; everything else as 8-bit RGB.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::raster::Raster;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const COLOR_TYPE_RGB: u8 = 2;
const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Encode a raster, choosing indexed color when the palette fits.
pub fn encode_raster(raster: &Raster) -> RenderResult<Vec<u8>> {
    let rgb = raster.to_rgb8();
    let (width, height) = (raster.width(), raster.height());

    match extract_palette(&rgb) {
        Some((palette, indices)) => {
            debug!(width, height, colors = palette.len(), "Encoding indexed PNG");
            encode_indexed(&palette, &indices, width, height)
        }
        None => encode_rgb(&rgb, width, height),
    }
}

/// Encode a raster and write it to `path`.
pub fn write_raster_png(raster: &Raster, path: impl AsRef<Path>) -> RenderResult<()> {
    let bytes = encode_raster(raster)?;
    fs::write(path.as_ref(), bytes)?;
    Ok(())
}

/// Encode packed RGB8 pixels.
pub fn encode_rgb(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    encode_truecolor(pixels, width, height, 3, COLOR_TYPE_RGB)
}

/// Encode packed RGBA8 pixels.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    encode_truecolor(pixels, width, height, 4, COLOR_TYPE_RGBA)
}

fn encode_truecolor(
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    color_type: u8,
) -> RenderResult<Vec<u8>> {
    check_dimensions(width, height)?;
    let expected = width * height * channels;
    if pixels.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: pixels.len(),
        });
    }

    let mut png = Vec::with_capacity(expected / 2 + 64);
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, color_type));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width * channels)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode palette indices with their RGB palette.
pub fn encode_indexed(
    palette: &[[u8; 3]],
    indices: &[u8],
    width: usize,
    height: usize,
) -> RenderResult<Vec<u8>> {
    check_dimensions(width, height)?;
    if indices.len() != width * height {
        return Err(RenderError::BufferSize {
            expected: width * height,
            actual: indices.len(),
        });
    }

    let plte: Vec<u8> = palette.iter().flatten().copied().collect();

    let mut png = Vec::with_capacity(indices.len() / 2 + plte.len() + 64);
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, COLOR_TYPE_INDEXED));
    write_chunk(&mut png, b"PLTE", &plte);
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Distinct colors in first-seen order and the per-pixel index into them.
///
/// `None` once more than 256 colors are found.
pub fn extract_palette(rgb: &[u8]) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let mut palette: Vec<[u8; 3]> = Vec::new();
    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let mut indices = Vec::with_capacity(rgb.len() / 3);

    for px in rgb.chunks_exact(3) {
        let color = [px[0], px[1], px[2]];
        let index = match lookup.get(&color) {
            Some(&i) => i,
            None => {
                if palette.len() == 256 {
                    return None;
                }
                let i = palette.len() as u8;
                palette.push(color);
                lookup.insert(color, i);
                i
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

fn check_dimensions(width: usize, height: usize) -> RenderResult<()> {
    if width == 0 || height == 0 || width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn ihdr(width: usize, height: usize, color_type: u8) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&(width as u32).to_be_bytes());
    data[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    data[8] = 8; // bit depth
    data[9] = color_type;
    // compression, filter and interlace are all 0
    data
}

fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix every scanline with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], stride: usize) -> RenderResult<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(data.len() + data.len() / stride.max(1));
    for row in data.chunks_exact(stride) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    Ok(encoder.finish()?)
}
