//! Value to color mapping and the display settings that drive it.
//!
//! A value goes through four steps: normalization against the effective
//! range, an optional square-root response, optional quantization into
//! discrete buckets, and finally the gradient lookup with gamma encoding.

use grib_common::ValueRange;
use serde::{Deserialize, Serialize};

use crate::gradient::{Gradient, Rgb};
use crate::presets::default_gradient;

pub const MIN_ZOOM: u32 = 1;
pub const MAX_ZOOM: u32 = 10;

/// How the normalization range is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RangePolicy {
    /// The field's own min/max
    #[default]
    Field,
    /// A caller-chosen interval
    Fixed { min: f32, max: f32 },
    /// `[-m, m]` where `m` is the largest magnitude of the field range
    SymmetricAroundZero,
}

impl RangePolicy {
    pub fn effective_range(&self, field_range: ValueRange) -> ValueRange {
        match *self {
            RangePolicy::Field => field_range,
            RangePolicy::Fixed { min, max } => ValueRange::new(min, max),
            RangePolicy::SymmetricAroundZero => field_range.symmetric_around_zero(),
        }
    }
}

/// Everything that controls how a field is displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSettings {
    /// Display zoom factor; see [`ViewSettings::zoom`]
    pub zoom: u32,
    pub gradient: Gradient,
    pub range: RangePolicy,
    pub sqrt_scale: bool,
    /// Number of discrete color buckets; `None` or `Some(0)` is continuous
    pub quantization: Option<u32>,
    /// Color for missing (non-finite) points
    pub no_data_color: Rgb,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            gradient: default_gradient(),
            range: RangePolicy::Field,
            sqrt_scale: false,
            quantization: None,
            no_data_color: Rgb::BLACK,
        }
    }
}

impl ViewSettings {
    pub fn with_zoom(mut self, zoom: u32) -> Self {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self
    }

    pub fn with_gradient(mut self, gradient: Gradient) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn with_range(mut self, range: RangePolicy) -> Self {
        self.range = range;
        self
    }

    pub fn with_sqrt_scale(mut self, sqrt_scale: bool) -> Self {
        self.sqrt_scale = sqrt_scale;
        self
    }

    pub fn with_quantization(mut self, buckets: Option<u32>) -> Self {
        self.quantization = buckets;
        self
    }

    pub fn with_no_data_color(mut self, color: Rgb) -> Self {
        self.no_data_color = color;
        self
    }

    /// Zoom factor clamped to `MIN_ZOOM..=MAX_ZOOM`.
    pub fn zoom(&self) -> u32 {
        self.zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Active bucket count, if quantization is on.
    pub fn buckets(&self) -> Option<u32> {
        self.quantization.filter(|&n| n > 0)
    }

    /// Which outputs must be regenerated when moving from `self` to `next`.
    pub fn diff(&self, next: &ViewSettings) -> SettingsChange {
        let colorbar = self.gradient != next.gradient
            || self.sqrt_scale != next.sqrt_scale
            || self.buckets() != next.buckets();
        let raster = colorbar || self.range != next.range || self.no_data_color != next.no_data_color;

        SettingsChange {
            raster,
            colorbar,
            display_size: self.zoom() != next.zoom(),
        }
    }
}

/// Dependent outputs invalidated by a settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsChange {
    pub raster: bool,
    pub colorbar: bool,
    /// Only the on-screen size changed; pixels are still valid
    pub display_size: bool,
}

impl SettingsChange {
    pub fn is_empty(&self) -> bool {
        !self.raster && !self.colorbar && !self.display_size
    }
}

/// Map normalized `t` into `buckets` discrete levels.
///
/// `floor(t * n) / (n - 1)`, clamped to 1. A single bucket maps everything
/// to 0.
pub fn quantize(t: f32, buckets: u32) -> f32 {
    match buckets {
        0 => t,
        1 => 0.0,
        n => ((t * n as f32).floor() / (n - 1) as f32).min(1.0),
    }
}

/// Settings resolved against one field's value range.
#[derive(Debug, Clone, Copy)]
pub struct ColorMapper<'a> {
    gradient: &'a Gradient,
    range: ValueRange,
    sqrt_scale: bool,
    buckets: Option<u32>,
    no_data: Rgb,
}

impl<'a> ColorMapper<'a> {
    pub fn new(settings: &'a ViewSettings, field_range: ValueRange) -> Self {
        Self {
            gradient: &settings.gradient,
            range: settings.range.effective_range(field_range),
            sqrt_scale: settings.sqrt_scale,
            buckets: settings.buckets(),
            no_data: settings.no_data_color,
        }
    }

    /// Range values are normalized against.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Display color of a raw data value.
    pub fn map_value(&self, value: f32) -> Rgb {
        if !value.is_finite() {
            return self.no_data;
        }
        self.map_normalized(self.range.normalize(value))
    }

    /// Display color at normalized position `t` in [0, 1].
    pub fn map_normalized(&self, t: f32) -> Rgb {
        let mut t = t.clamp(0.0, 1.0);
        if self.sqrt_scale {
            t = t.sqrt();
        }
        if let Some(n) = self.buckets {
            t = quantize(t, n);
        }
        self.gradient.color_at(t)
    }
}
