//! False-color rendering of decoded fields.
//!
//! Provides:
//! - Gradients blended in linear RGB and emitted as sRGB
//! - View settings (range policy, sqrt response, quantization, zoom)
//! - Parallel nearest-neighbor rasterization and colorbar strips
//! - A small PNG encoder for exporting rasters

pub mod colorbar;
pub mod colormap;
pub mod error;
pub mod gradient;
pub mod png;
pub mod presets;
pub mod raster;
pub mod style;

pub use colorbar::{colorbar_ticks, render_colorbar, ColorbarTick};
pub use colormap::{ColorMapper, RangePolicy, SettingsChange, ViewSettings};
pub use error::{GradientError, RenderError, RenderResult};
pub use gradient::{Gradient, GradientStop, Rgb};
pub use presets::{default_gradient, GradientLibrary, DEFAULT_GRADIENT};
pub use raster::{render_field, render_field_native, Raster};
pub use style::GradientConfig;
