//! Error types for the question-bank crate.
//!
//! This module defines semantic error enums for bank storage, item generation,
//! generation plans and settings, following the project's error handling conventions
//! with `thiserror`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when reading, parsing or writing bank documents.
///
/// These errors cover file I/O, JSON parsing and atomic write failures for
/// bank files and the index manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// The bank file could not be read.
    #[error("failed to read bank file at '{path}': {message}")]
    ReadError {
        /// Path to the bank file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The bank JSON is malformed or missing required fields.
    #[error("invalid bank JSON in '{path}': {message}")]
    ParseError {
        /// Path to the bank file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// The bank file could not be written.
    #[error("failed to write bank file at '{path}': {message}")]
    WriteError {
        /// Path to the bank file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The document could not be serialised to JSON.
    #[error("failed to serialise bank document: {message}")]
    SerializeError {
        /// Description of the serialisation error.
        message: String,
    },

    /// The bank file does not exist.
    #[error("bank file not found: '{path}'")]
    NotFound {
        /// Path that was looked up.
        path: Utf8PathBuf,
    },

    /// A path was not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },
}

/// Errors that can occur while generating items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The correct-answer index does not point into the option list.
    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange {
        /// Supplied correct index.
        index: usize,
        /// Number of options.
        len: usize,
    },

    /// A template table that should never be empty was empty.
    #[error("template pool '{pool}' is empty")]
    EmptyPool {
        /// Name of the empty pool.
        pool: &'static str,
    },

    /// Every number after the prefix has already been handed out.
    #[error("no ids left after the highest '{prefix}' number")]
    IdsExhausted {
        /// Prefix of the exhausted sequence.
        prefix: String,
    },
}

/// Errors raised while parsing a `--plan` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A plan part is not of the form `task=count`.
    #[error("invalid plan part '{part}': expected task=count")]
    InvalidPart {
        /// The offending part.
        part: String,
    },

    /// The plan names a task that the subject does not have.
    #[error("unknown task '{task}' in plan")]
    UnknownTask {
        /// The unknown task key.
        task: String,
    },

    /// The count is not a non-negative integer.
    #[error("invalid count '{value}' for task '{task}': {message}")]
    InvalidCount {
        /// Task key the count belongs to.
        task: String,
        /// Raw count value.
        value: String,
        /// Parser error message.
        message: String,
    },
}

/// Errors raised while loading layered settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The settings layers could not be merged.
    #[error("failed to load settings: {message}")]
    LoadError {
        /// Description of the loader error.
        message: String,
    },

    /// A configured path is not valid UTF-8.
    #[error("configured path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// The near-duplicate threshold is outside 0 to 1.
    #[error("min_diff must be between 0 and 1, got {value}")]
    InvalidThreshold {
        /// Rendered threshold.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_error_read_formats_correctly() {
        let err = BankError::ReadError {
            path: Utf8PathBuf::from("/tmp/svenska.ak3.json"),
            message: "file not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read bank file at '/tmp/svenska.ak3.json': file not found"
        );
    }

    #[test]
    fn bank_error_parse_formats_correctly() {
        let err = BankError::ParseError {
            path: Utf8PathBuf::from("bank.json"),
            message: "unexpected token".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid bank JSON in 'bank.json': unexpected token"
        );
    }

    #[test]
    fn bank_error_not_found_formats_correctly() {
        let err = BankError::NotFound {
            path: Utf8PathBuf::from("public/banks/engelska.ak4.json"),
        };
        assert_eq!(
            err.to_string(),
            "bank file not found: 'public/banks/engelska.ak4.json'"
        );
    }

    #[test]
    fn generation_error_correct_index_formats_correctly() {
        let err = GenerationError::CorrectIndexOutOfRange { index: 4, len: 4 };
        assert_eq!(
            err.to_string(),
            "correct index 4 is out of range for 4 options"
        );
    }

    #[test]
    fn plan_error_unknown_task_formats_correctly() {
        let err = PlanError::UnknownTask {
            task: "kemi".to_owned(),
        };
        assert_eq!(err.to_string(), "unknown task 'kemi' in plan");
    }

    #[test]
    fn plan_error_invalid_count_formats_correctly() {
        let err = PlanError::InvalidCount {
            task: "addition".to_owned(),
            value: "many".to_owned(),
            message: "invalid digit found in string".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid count 'many' for task 'addition': invalid digit found in string"
        );
    }
}
