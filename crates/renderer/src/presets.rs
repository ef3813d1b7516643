//! Built-in gradients and the library that serves them by name.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::GradientError;
use crate::gradient::{Gradient, Rgb};
use crate::style::{hex_to_rgb, GradientConfig};

/// Name of the gradient used when nothing else is selected
pub const DEFAULT_GRADIENT: &str = "viridis";

/// Preset gradients as evenly spaced sRGB colors.
const PRESETS: &[(&str, &[&str])] = &[
    ("gray", &["#000000", "#ffffff"]),
    (
        "viridis",
        &[
            "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779",
            "#6ece58", "#b5de2b", "#fde725",
        ],
    ),
    (
        "plasma",
        &[
            "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953",
            "#fb9f3a", "#fdca26", "#f0f921",
        ],
    ),
    (
        "inferno",
        &[
            "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60", "#cf4446", "#ed6925",
            "#fb9b06", "#f7d13d", "#fcffa4",
        ],
    ),
    (
        "magma",
        &[
            "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f", "#cd4071", "#f1605d",
            "#fd9668", "#feca8d", "#fcfdbf",
        ],
    ),
    (
        "coolwarm",
        &["#3b4cc0", "#6f92f3", "#aac7fd", "#dddddd", "#f7b89c", "#e7745b", "#b40426"],
    ),
    (
        "rdbu",
        &[
            "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0",
            "#92c5de", "#4393c3", "#2166ac", "#053061",
        ],
    ),
    (
        "ylgnbu",
        &[
            "#ffffd9", "#edf8b1", "#c7e9b4", "#7fcdbb", "#41b6c4", "#1d91c0", "#225ea8",
            "#253494", "#081d58",
        ],
    ),
    (
        "jet",
        &[
            "#00007f", "#0000ff", "#007fff", "#00ffff", "#7fff7f", "#ffff00", "#ff7f00",
            "#ff0000", "#7f0000",
        ],
    ),
];

/// Gradient from evenly spaced sRGB hex colors, linearized.
pub fn gradient_from_srgb_hex(name: &str, colors: &[&str]) -> Result<Gradient, GradientError> {
    let linear = colors
        .iter()
        .map(|hex| {
            hex_to_rgb(hex)
                .map(|(r, g, b)| Rgb::from_u8(r, g, b).to_linear())
                .ok_or_else(|| GradientError::InvalidColor {
                    name: name.to_string(),
                    color: hex.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Gradient::evenly_spaced(name, &linear)
}

/// Named gradients: the presets plus any loaded from configuration.
#[derive(Debug, Clone)]
pub struct GradientLibrary {
    gradients: BTreeMap<String, Gradient>,
}

impl GradientLibrary {
    /// Library holding only the built-in presets.
    pub fn builtin() -> Self {
        let gradients = PRESETS
            .iter()
            .filter_map(|(name, colors)| gradient_from_srgb_hex(name, colors).ok())
            .map(|g| (g.name().to_string(), g))
            .collect();
        Self { gradients }
    }

    /// Built-in presets plus the gradients of `config`; config entries
    /// replace presets of the same name.
    pub fn with_config(config: &GradientConfig) -> Result<Self, GradientError> {
        let mut library = Self::builtin();
        library.extend_from_config(config)?;
        Ok(library)
    }

    pub fn extend_from_config(&mut self, config: &GradientConfig) -> Result<(), GradientError> {
        let gradients = config.build_all()?;
        debug!(count = gradients.len(), "Loaded configured gradients");
        for gradient in gradients {
            self.insert(gradient);
        }
        Ok(())
    }

    pub fn insert(&mut self, gradient: Gradient) {
        self.gradients.insert(gradient.name().to_string(), gradient);
    }

    pub fn get(&self, name: &str) -> Option<&Gradient> {
        self.gradients.get(name)
    }

    /// Look up a gradient, failing with `UnknownGradient`.
    pub fn require(&self, name: &str) -> Result<&Gradient, GradientError> {
        self.get(name)
            .ok_or_else(|| GradientError::UnknownGradient(name.to_string()))
    }

    /// Sorted gradient names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.gradients.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }
}

impl Default for GradientLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The default gradient.
pub fn default_gradient() -> Gradient {
    PRESETS
        .iter()
        .find(|(name, _)| *name == DEFAULT_GRADIENT)
        .and_then(|(name, colors)| gradient_from_srgb_hex(name, colors).ok())
        .unwrap_or_else(Gradient::grayscale)
}
