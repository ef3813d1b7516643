//! Gradient configuration loaded from JSON.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "gradients": {
//!     "heat": {
//!       "description": "Black body",
//!       "color_space": "srgb",
//!       "stops": [
//!         { "position": 0.0, "color": "#000000" },
//!         { "position": 1.0, "color": "#FFFF00" }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GradientError;
use crate::gradient::{Gradient, GradientStop, Rgb};

/// Root gradient configuration - can contain multiple named gradients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientConfig {
    #[serde(default = "default_version")]
    pub version: String,

    /// Named gradient definitions
    pub gradients: BTreeMap<String, GradientDefinition>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// How the hex colors of a definition should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Colors are display sRGB and are linearized on load
    #[default]
    Srgb,
    /// Colors are already linear
    Linear,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientDefinition {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color_space: ColorSpace,
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f32,
    /// "#RRGGBB"
    pub color: String,
}

impl GradientConfig {
    /// Parse gradient configuration from JSON string.
    pub fn from_json(json: &str) -> Result<Self, GradientError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load gradient configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GradientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GradientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, GradientError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, name: &str) -> Option<&GradientDefinition> {
        self.gradients.get(name)
    }

    /// Build every gradient, failing on the first invalid definition.
    pub fn build_all(&self) -> Result<Vec<Gradient>, GradientError> {
        self.gradients
            .iter()
            .map(|(name, definition)| definition.build(name))
            .collect()
    }
}

impl GradientDefinition {
    /// Validate the definition and convert it into a gradient.
    pub fn build(&self, name: &str) -> Result<Gradient, GradientError> {
        let stops = self
            .stops
            .iter()
            .map(|stop| {
                let (r, g, b) = hex_to_rgb(&stop.color).ok_or_else(|| GradientError::InvalidColor {
                    name: name.to_string(),
                    color: stop.color.clone(),
                })?;
                let color = Rgb::from_u8(r, g, b);
                let color = match self.color_space {
                    ColorSpace::Srgb => color.to_linear(),
                    ColorSpace::Linear => color,
                };
                Ok(GradientStop::new(stop.position, color))
            })
            .collect::<Result<Vec<_>, GradientError>>()?;

        Gradient::new(name, stops)
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Format 8-bit components as "#RRGGBB".
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}
