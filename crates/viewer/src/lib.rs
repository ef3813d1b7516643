//! Viewer session state: the open file, the selected field and the
//! textures derived from it.
//!
//! [`ViewState`] owns everything a front end needs between frames. Display
//! settings are diffed on every change so [`ViewState::refresh`] only
//! regenerates the textures that are actually stale.

pub mod config;
pub mod error;
pub mod state;
pub mod summary;

pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
pub use state::{MessageLabel, ViewState};
pub use summary::FieldSummary;
