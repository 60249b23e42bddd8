//! Error types for the Sentira library.
//!
//! This module provides error handling for all Sentira operations. All errors
//! are represented by the [`SentiraError`] enum, which provides detailed
//! information about what went wrong and which pipeline stage it came from.
//!
//! # Examples
//!
//! ```
//! use sentira::error::{Result, SentiraError};
//!
//! fn example_operation() -> Result<()> {
//!     // Return an error
//!     Err(SentiraError::not_fitted("vectorizer used before fit"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Sentira operations.
///
/// This enum represents all possible errors that can occur in the Sentira
/// library. It uses the `thiserror` crate for automatic `Error` trait
/// implementation and provides convenient constructor methods for creating
/// specific error types.
#[derive(Error, Debug)]
pub enum SentiraError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A component was used before it was fit or trained.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// A feature vector's width disagrees with the training-time width.
    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Training data cannot produce a usable model.
    #[error("Degenerate training data: {0}")]
    DegenerateTraining(String),

    /// Corpus-related errors (unreadable, empty, malformed records)
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Analysis-related errors (tokenization)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Explanation-related errors
    #[error("Explain error: {0}")]
    Explain(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SentiraError.
pub type Result<T> = std::result::Result<T, SentiraError>;

impl SentiraError {
    /// Create a new not-fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        SentiraError::NotFitted(msg.into())
    }

    /// Create a new dimension-mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        SentiraError::DimensionMismatch { expected, actual }
    }

    /// Create a new degenerate-training error.
    pub fn degenerate_training<S: Into<String>>(msg: S) -> Self {
        SentiraError::DegenerateTraining(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        SentiraError::Corpus(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SentiraError::Analysis(msg.into())
    }

    /// Create a new explain error.
    pub fn explain<S: Into<String>>(msg: S) -> Self {
        SentiraError::Explain(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SentiraError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SentiraError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
