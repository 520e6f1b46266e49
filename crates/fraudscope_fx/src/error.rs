//! Error types for the effects layer.

use std::path::PathBuf;

use fraudscope_ui::UiError;
use thiserror::Error;

/// Errors raised while installing or running page effects.
///
/// Runtime failures of a single effect or subscriber are logged and
/// counted by their dispatcher. Only configuration problems reach the
/// caller of [`crate::ReportEffects::install`].
#[derive(Error, Debug)]
pub enum FxError {
    /// Threshold is not in `(0, 1]`.
    #[error("visibility threshold {0} is outside (0, 1]")]
    InvalidThreshold(f32),

    /// Page model error (bad selector, bad margin, stale element).
    #[error(transparent)]
    Ui(#[from] UiError),

    /// The configuration file is not valid TOML for [`crate::FxConfig`].
    #[error("failed to parse effects config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read effects config {path}: {source}")]
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is out of range.
    #[error("invalid effects config: {0}")]
    InvalidConfig(String),

    /// An effect or subscriber failed at runtime.
    #[error("effect '{effect}' failed: {reason}")]
    EffectFailed {
        /// Name of the failing effect.
        effect: &'static str,
        /// What went wrong.
        reason: String,
    },
}

/// Result type for effect operations.
pub type FxResult<T> = Result<T, FxError>;
