//! Viewer configuration loaded from JSON.
//!
//! Every field is optional in the file; missing ones take the defaults.
//!
//! ```json
//! {
//!   "colorbar_width": 500,
//!   "colorbar_height": 20,
//!   "default_gradient": "viridis",
//!   "quantization_hint": 10,
//!   "tick_count": 5,
//!   "gradient_config": "gradients.json"
//! }
//! ```

use std::path::{Path, PathBuf};

use renderer::{colorbar, GradientConfig, GradientLibrary, ViewSettings, DEFAULT_GRADIENT};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ViewerError, ViewerResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub colorbar_width: usize,
    pub colorbar_height: usize,

    /// Gradient selected when a session starts
    pub default_gradient: String,

    /// Bucket count offered when discrete colors are switched on
    pub quantization_hint: u32,

    /// Number of colorbar tick labels
    pub tick_count: usize,

    /// Extra gradients to load on top of the presets
    pub gradient_config: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            colorbar_width: colorbar::DEFAULT_WIDTH,
            colorbar_height: colorbar::DEFAULT_HEIGHT,
            default_gradient: DEFAULT_GRADIENT.to_string(),
            quantization_hint: 10,
            tick_count: 5,
            gradient_config: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> ViewerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ViewerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> ViewerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Preset gradients plus those of `gradient_config`, if set.
    pub fn gradient_library(&self) -> ViewerResult<GradientLibrary> {
        let Some(path) = &self.gradient_config else {
            return Ok(GradientLibrary::builtin());
        };

        let config = GradientConfig::from_file(path)?;
        let library = GradientLibrary::with_config(&config)?;
        info!(
            path = %path.display(),
            gradients = library.len(),
            "Loaded gradient config"
        );
        Ok(library)
    }

    /// Settings a new session starts with.
    pub fn initial_settings(&self, library: &GradientLibrary) -> ViewerResult<ViewSettings> {
        let gradient = library.require(&self.default_gradient)?.clone();
        Ok(ViewSettings::default().with_gradient(gradient))
    }
}
