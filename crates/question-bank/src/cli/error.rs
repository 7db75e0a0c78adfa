//! Error types for the command-line tools.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::error::{BankError, ConfigError, GenerationError, PlanError};

/// Errors surfaced by the tools, mapped onto process exit codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// A file named on the command line does not exist.
    #[error("file not found: '{path}'")]
    MissingFile {
        /// Path that was looked up.
        path: Utf8PathBuf,
    },
    /// A bank has no subject and its file name does not name one.
    #[error(
        "'{path}' has no subject and its name does not follow '<subject>.ak<grade>.json'"
    )]
    UnknownSubject {
        /// Offending bank file.
        path: Utf8PathBuf,
    },
    /// A bank has no grade and none was given.
    #[error("unknown grade for '{path}'; pass --grade")]
    UnknownGrade {
        /// Offending bank file.
        path: Utf8PathBuf,
    },
    /// Verification found critical problems.
    #[error("verification failed with {critical} critical problem(s)")]
    VerificationFailed {
        /// Number of critical problems.
        critical: usize,
    },
    /// A bank or manifest could not be read or written.
    #[error("bank error: {source}")]
    BankError {
        /// Underlying storage error.
        #[from]
        #[source]
        source: BankError,
    },
    /// Item generation failed.
    #[error("generation error: {source}")]
    GenerationError {
        /// Underlying generator error.
        #[from]
        #[source]
        source: GenerationError,
    },
    /// The `--plan` value is malformed.
    #[error("plan error: {source}")]
    PlanError {
        /// Underlying plan error.
        #[from]
        #[source]
        source: PlanError,
    },
    /// Settings could not be loaded.
    #[error("settings error: {source}")]
    ConfigError {
        /// Underlying settings error.
        #[from]
        #[source]
        source: ConfigError,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// Unknown subjects and grades exit with 2; everything else with 1.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::UnknownSubject { .. } | Self::UnknownGrade { .. } => 2,
            _ => 1,
        }
    }
}
