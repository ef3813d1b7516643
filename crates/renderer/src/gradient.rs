//! Color gradients in linear RGB with sRGB output.
//!
//! Control points are stored and blended in linear light. Every color a
//! gradient hands out is gamma-encoded to sRGB, endpoints included.

use serde::{Deserialize, Serialize};

use crate::error::GradientError;

/// RGB color with float components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Color from 8-bit components, without any transfer function.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Clamp to [0, 1] and quantize each component to 8 bits.
    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Per-component gamma encoding (linear to sRGB).
    pub fn to_srgb(self) -> Self {
        Self::new(linear_to_srgb(self.r), linear_to_srgb(self.g), linear_to_srgb(self.b))
    }

    /// Per-component gamma decoding (sRGB to linear).
    pub fn to_linear(self) -> Self {
        Self::new(srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b))
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }
}

/// sRGB transfer function (encode).
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Inverse sRGB transfer function (decode).
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Control point of a gradient; `color` is linear RGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f32,
    pub color: Rgb,
}

impl GradientStop {
    pub fn new(position: f32, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// A validated color gradient.
///
/// At least two stops, positions strictly increasing from exactly 0 to
/// exactly 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    name: String,
    stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn new(name: impl Into<String>, stops: Vec<GradientStop>) -> Result<Self, GradientError> {
        let name = name.into();

        if stops.len() < 2 {
            return Err(GradientError::TooFewStops {
                name,
                count: stops.len(),
            });
        }

        let first = stops[0].position;
        let last = stops[stops.len() - 1].position;
        if first != 0.0 || last != 1.0 {
            return Err(GradientError::BadEndpoints { name, first, last });
        }

        if let Some(index) = stops
            .windows(2)
            .position(|w| !(w[1].position > w[0].position))
        {
            return Err(GradientError::NotIncreasing {
                name,
                index: index + 1,
            });
        }

        Ok(Self { name, stops })
    }

    /// Evenly spaced gradient from linear colors.
    pub fn evenly_spaced(name: impl Into<String>, colors: &[Rgb]) -> Result<Self, GradientError> {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| GradientStop::new(i as f32 / last, color))
            .collect();
        Self::new(name, stops)
    }

    /// Black to white.
    pub fn grayscale() -> Self {
        Self {
            name: "gray".to_string(),
            stops: vec![
                GradientStop::new(0.0, Rgb::BLACK),
                GradientStop::new(1.0, Rgb::WHITE),
            ],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Linear-light color at `t`, clamped to the endpoint colors.
    pub fn linear_color_at(&self, t: f32) -> Rgb {
        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];

        // Also catches NaN
        if !(t > first.position) {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if t <= hi.position {
                let local = (t - lo.position) / (hi.position - lo.position);
                return lo.color.lerp(hi.color, local);
            }
        }
        last.color
    }

    /// Display (sRGB) color at `t` in [0, 1].
    pub fn color_at(&self, t: f32) -> Rgb {
        self.linear_color_at(t).to_srgb()
    }

    /// Same gradient with the stop order mirrored.
    pub fn reversed(&self) -> Self {
        let stops = self
            .stops
            .iter()
            .rev()
            .map(|s| GradientStop::new(1.0 - s.position, s.color))
            .collect();
        Self {
            name: format!("{}_r", self.name),
            stops,
        }
    }
}
