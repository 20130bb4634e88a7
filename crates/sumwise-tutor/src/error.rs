//! Error types for the Sumwise tutor.
//!
//! This module defines the error hierarchy for tutor operations:
//! configuration loading, progress persistence, and problem solving.
//! Learner mistakes (wrong answers, invalid digit input) are not errors;
//! they are ordinary verdicts and silent no-ops respectively.

use std::path::PathBuf;

/// A specialized `Result` type for tutor operations.
pub type Result<T> = std::result::Result<T, TutorError>;

/// Errors that can occur while running the tutor.
///
/// Variants include actionable suggestions where possible to help hosts
/// resolve issues.
#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your sumwise.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the host.
        suggestion: String,
    },

    // ========================================================================
    // Progress Store Errors
    // ========================================================================
    /// The progress file contains malformed JSON.
    #[error("Corrupted progress file '{path}': {message}\n\nSuggestion: Remove the file to reset the saved session counter")]
    StoreCorrupted {
        /// Path to the corrupted progress file.
        path: PathBuf,
        /// Description of the corruption.
        message: String,
    },

    /// Failed to write the progress file.
    #[error("Failed to write progress file '{path}': {message}\n\nSuggestion: Check write permissions and available disk space")]
    StoreWriteError {
        /// Path where the progress file was to be written.
        path: PathBuf,
        /// Description of the write failure.
        message: String,
    },

    // ========================================================================
    // General Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A problem's operands could not be solved.
    #[error(transparent)]
    Solve(#[from] sumwise_solver::SolveError),

    /// A lesson round was started with no questions.
    #[error("Lesson round has no questions\n\nSuggestion: Set exampleCount and practiceQuestions to at least 1 in your sumwise.json")]
    EmptyLesson,
}

impl TutorError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `StoreCorrupted` error.
    #[must_use]
    pub fn store_corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StoreCorrupted {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `StoreWriteError`.
    #[must_use]
    pub fn store_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StoreWriteError {
            path: path.into(),
            message: message.into(),
        }
    }
}
