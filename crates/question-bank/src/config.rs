//! Tool settings loaded via OrthoConfig.

use std::ffi::OsString;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::dedup::{DEFAULT_HISTORY_WINDOW, DEFAULT_MIN_DIFF};
use crate::error::ConfigError;

/// Banks directory used when none is configured.
pub const DEFAULT_BANKS_DIR: &str = "public/banks";

/// Settings shared by every tool, layered from files and `QUIZ_BANK_*`
/// environment variables. Command-line flags override them.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QUIZ_BANK")]
pub struct BankSettings {
    /// Directory holding the bank files and `index.json`.
    pub banks_dir: Option<PathBuf>,
    /// Jaccard threshold for the near-duplicate filter.
    pub min_diff: Option<f64>,
    /// Number of recent prompts the near-duplicate filter compares against.
    pub history_window: Option<usize>,
}

impl BankSettings {
    /// Loads settings for the named binary without reading its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadError`] when a settings layer is malformed.
    pub fn load(binary: &str) -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from(binary)]).map_err(|err| ConfigError::LoadError {
            message: err.to_string(),
        })
    }

    /// Returns the banks directory, falling back to [`DEFAULT_BANKS_DIR`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonUtf8Path`] for a non-UTF-8 path.
    pub fn banks_dir(&self) -> Result<Utf8PathBuf, ConfigError> {
        self.banks_dir.clone().map_or_else(
            || Ok(Utf8PathBuf::from(DEFAULT_BANKS_DIR)),
            |path| {
                Utf8PathBuf::try_from(path).map_err(|err| ConfigError::NonUtf8Path {
                    path: err.into_path_buf().to_string_lossy().into_owned(),
                })
            },
        )
    }

    /// Returns the similarity threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] outside 0 to 1.
    pub fn min_diff(&self) -> Result<f64, ConfigError> {
        checked_threshold(self.min_diff.unwrap_or(DEFAULT_MIN_DIFF))
    }

    /// Returns the comparison window.
    #[must_use]
    pub fn history_window(&self) -> usize {
        self.history_window.unwrap_or(DEFAULT_HISTORY_WINDOW)
    }
}

/// Accepts thresholds between 0 and 1 inclusive.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidThreshold`] otherwise.
pub fn checked_threshold(value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidThreshold {
            value: value.to_string(),
        })
    }
}
