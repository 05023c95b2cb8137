//! Error types for the payroll reconciliation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all fatal conditions. Recoverable per-row issues are not errors;
//! they are collected as [`crate::models::AuditWarning`] values and
//! attached to the audit result.

use thiserror::Error;

use crate::models::DatasetSide;

/// The main error type for the reconciliation engine.
///
/// All fatal conditions surface through this type. Fatal errors abort the
/// run with enough context to show which file failed and why; they never
/// carry a partial result.
///
/// # Example
///
/// ```
/// use payroll_auditor::error::EngineError;
///
/// let error = EngineError::UnsupportedFormat {
///     format: "parquet".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unsupported file format: parquet");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The declared format tag is not one of the recognized set.
    #[error("Unsupported file format: {format}")]
    UnsupportedFormat {
        /// The unrecognized format tag.
        format: String,
    },

    /// Malformed input prevented extracting any usable rows from a file.
    #[error("Failed to parse {file}{}: {message}", location_suffix(.line))]
    Parse {
        /// Which of the two uploaded files failed.
        file: DatasetSide,
        /// The offending 1-based row or line number, when known.
        line: Option<usize>,
        /// A human-readable description of what was wrong.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was outside its allowed range.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The configuration field that was invalid.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },
}

fn location_suffix(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (row {n})"),
        None => String::new(),
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
