//! The viewer session.

use std::path::Path;
use std::sync::Arc;

use grib_common::Field;
use grib_reader::{sorted_order, FieldSource, Grib2Tables, GribFile, SortKey, SortOrder};
use renderer::{
    colorbar_ticks, png, render_colorbar, render_field_native, ColorbarTick, GradientLibrary,
    Raster, SettingsChange, ViewSettings,
};
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::summary::FieldSummary;

/// One row of the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLabel {
    /// Source message index
    pub index: usize,
    /// `[n] shortName | typeOfLevel | level units`, `n` counting from 1
    pub text: String,
}

/// Everything the viewer holds between frames.
///
/// The field raster is kept at the field's native resolution; zoom only
/// scales the size it is displayed at. Failed operations leave the state
/// as it was, log a warning and keep the message for [`last_error`].
///
/// [`last_error`]: ViewState::last_error
pub struct ViewState {
    config: ViewerConfig,
    gradients: GradientLibrary,
    tables: Arc<Grib2Tables>,

    source: Option<Box<dyn FieldSource>>,
    source_name: Option<String>,
    display_order: Vec<usize>,

    current: Option<usize>,
    field: Option<Field>,

    settings: ViewSettings,
    raster: Option<Raster>,
    colorbar: Option<Raster>,
    raster_dirty: bool,
    colorbar_dirty: bool,
    size_dirty: bool,

    last_error: Option<String>,
}

impl ViewState {
    pub fn new(config: ViewerConfig) -> ViewerResult<Self> {
        let gradients = config.gradient_library()?;
        let settings = config.initial_settings(&gradients)?;
        Ok(Self {
            config,
            gradients,
            tables: Arc::new(Grib2Tables::with_defaults()),
            source: None,
            source_name: None,
            display_order: Vec::new(),
            current: None,
            field: None,
            settings,
            raster: None,
            colorbar: None,
            raster_dirty: false,
            colorbar_dirty: true,
            size_dirty: false,
            last_error: None,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn gradients(&self) -> &GradientLibrary {
        &self.gradients
    }

    // =========================================================================
    // Source and selection
    // =========================================================================

    /// Open a GRIB file and select its first message.
    ///
    /// A first message that cannot be decoded does not fail the open; its
    /// error is kept in [`last_error`](Self::last_error).
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> ViewerResult<()> {
        let path = path.as_ref();
        let opened = GribFile::open_with_tables(path, Arc::clone(&self.tables)).map_err(ViewerError::from);
        let file = self.record(opened)?;

        self.install_source(Box::new(file), path.display().to_string());
        if self.message_count() > 0 {
            if let Err(err) = self.select_message(0) {
                // Already in last_error; the file stays open
                debug!(error = %err, "First message not selectable after open");
            }
        }
        Ok(())
    }

    /// Replace the current source without selecting a message.
    pub fn load_source(&mut self, source: Box<dyn FieldSource>, name: impl Into<String>) {
        self.install_source(source, name.into());
    }

    fn install_source(&mut self, source: Box<dyn FieldSource>, name: String) {
        info!(source = %name, messages = source.count(), "Loaded field source");
        self.display_order = (0..source.count()).collect();
        self.source = Some(source);
        self.source_name = Some(name);
        self.current = None;
        self.field = None;
        self.raster = None;
        self.raster_dirty = false;
        self.size_dirty = true;
        self.last_error = None;
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn message_count(&self) -> usize {
        self.source.as_ref().map_or(0, |s| s.count())
    }

    /// Decode message `index` and make it the displayed field.
    pub fn select_message(&mut self, index: usize) -> ViewerResult<()> {
        let decoded = match self.source.as_mut() {
            Some(source) => source.field(index).map_err(ViewerError::from),
            None => Err(ViewerError::NoSource),
        };
        let field = self.record(decoded)?;

        debug!(
            index,
            width = field.width(),
            height = field.height(),
            min = field.min(),
            max = field.max(),
            "Selected field"
        );
        self.current = Some(index);
        self.field = Some(field);
        self.raster_dirty = true;
        self.size_dirty = true;
        Ok(())
    }

    pub fn current_message(&self) -> Option<usize> {
        self.current
    }

    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    pub fn field_summary(&self) -> Option<FieldSummary> {
        let index = self.current?;
        self.field.as_ref().map(|field| FieldSummary::new(index, field))
    }

    // =========================================================================
    // Message list
    // =========================================================================

    /// Reorder the message list by `keys`. Source indices do not change.
    pub fn sort_messages(&mut self, keys: &[(SortKey, SortOrder)]) -> &[usize] {
        if let Some(source) = self.source.as_ref() {
            let metadata = source.all_metadata();
            self.display_order = sorted_order(&metadata, keys);
            debug!(keys = keys.len(), messages = metadata.len(), "Sorted message list");
        }
        &self.display_order
    }

    /// Source indices in display order.
    pub fn display_order(&self) -> &[usize] {
        &self.display_order
    }

    /// Message list rows in display order.
    pub fn message_labels(&self) -> Vec<MessageLabel> {
        let Some(source) = self.source.as_ref() else {
            return Vec::new();
        };
        self.display_order
            .iter()
            .filter_map(|&index| {
                let m = source.metadata(index).ok()?;
                Some(MessageLabel {
                    index,
                    text: format!(
                        "[{}] {} | {} | {} {}",
                        index + 1,
                        m.short_name_or_missing(),
                        m.type_of_level_or_missing(),
                        m.level_display(),
                        m.units_or_missing()
                    ),
                })
            })
            .collect()
    }

    // =========================================================================
    // Settings and textures
    // =========================================================================

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Apply new settings and mark what they invalidate.
    pub fn set_settings(&mut self, settings: ViewSettings) -> SettingsChange {
        let change = self.settings.diff(&settings);
        self.raster_dirty |= change.raster && self.field.is_some();
        self.colorbar_dirty |= change.colorbar;
        self.size_dirty |= change.display_size;
        self.settings = settings;
        change
    }

    /// Switch to the named gradient from the library.
    pub fn set_gradient(&mut self, name: &str) -> ViewerResult<SettingsChange> {
        let found = self.gradients.require(name).cloned().map_err(ViewerError::from);
        let gradient = self.record(found)?;
        let settings = self.settings.clone().with_gradient(gradient);
        Ok(self.set_settings(settings))
    }

    /// Turn discrete colors on with the configured bucket count, or off.
    pub fn set_discrete_colors(&mut self, enabled: bool) -> SettingsChange {
        let buckets = enabled.then_some(self.config.quantization_hint);
        let settings = self.settings.clone().with_quantization(buckets);
        self.set_settings(settings)
    }

    /// Regenerate stale textures. The result says which ones were redrawn
    /// and whether the display size changed.
    pub fn refresh(&mut self) -> ViewerResult<SettingsChange> {
        let mut redrawn = SettingsChange::default();

        if self.colorbar_dirty {
            let rendered = render_colorbar(
                &self.settings,
                self.config.colorbar_width,
                self.config.colorbar_height,
            )
            .map_err(ViewerError::from);
            self.colorbar = Some(self.record(rendered)?);
            self.colorbar_dirty = false;
            redrawn.colorbar = true;
        }

        if self.raster_dirty {
            if let Some(field) = self.field.as_ref() {
                let rendered = render_field_native(field, &self.settings).map_err(ViewerError::from);
                self.raster = Some(self.record(rendered)?);
                redrawn.raster = true;
            }
            self.raster_dirty = false;
        }

        redrawn.display_size = std::mem::take(&mut self.size_dirty);
        if !redrawn.is_empty() {
            debug!(
                raster = redrawn.raster,
                colorbar = redrawn.colorbar,
                display_size = redrawn.display_size,
                "Refreshed textures"
            );
        }
        Ok(redrawn)
    }

    /// Whether [`refresh`](Self::refresh) has work to do.
    pub fn needs_refresh(&self) -> bool {
        self.raster_dirty || self.colorbar_dirty || self.size_dirty
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    pub fn colorbar(&self) -> Option<&Raster> {
        self.colorbar.as_ref()
    }

    /// On-screen size of the field: grid dimensions times zoom.
    pub fn display_size(&self) -> Option<(usize, usize)> {
        let field = self.field.as_ref()?;
        let zoom = self.settings.zoom() as usize;
        Some((field.width() * zoom, field.height() * zoom))
    }

    /// Tick labels for the colorbar of the selected field.
    pub fn colorbar_ticks(&self, count: usize) -> Vec<ColorbarTick> {
        match self.field.as_ref() {
            Some(field) => {
                let range = self.settings.range.effective_range(field.range());
                colorbar_ticks(range, count, self.config.colorbar_width)
            }
            None => Vec::new(),
        }
    }

    /// Ticks using the configured tick count.
    pub fn default_colorbar_ticks(&self) -> Vec<ColorbarTick> {
        self.colorbar_ticks(self.config.tick_count)
    }

    /// Write the current field raster to `path` as PNG.
    pub fn export_png(&mut self, path: impl AsRef<Path>) -> ViewerResult<()> {
        let path = path.as_ref();
        let written = match self.raster.as_ref() {
            Some(raster) => png::write_raster_png(raster, path).map_err(ViewerError::from),
            None => Err(ViewerError::NoField),
        };
        self.record(written)?;
        info!(path = %path.display(), "Exported raster");
        Ok(())
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn record<T>(&mut self, result: ViewerResult<T>) -> ViewerResult<T> {
        if let Err(err) = &result {
            warn!(error = %err, "Viewer operation failed");
            self.last_error = Some(err.to_string());
        }
        result
    }
}
