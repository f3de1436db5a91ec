//! Error types for the textdirectory library.
//!
//! Every fallible operation returns [`Result`], whose error side is the
//! [`TextDirectoryError`] enum. Library callers can match on the variants;
//! the command line front end prints their `Display` form as a short
//! diagnostic.
//!
//! # Examples
//!
//! ```
//! use textdirectory::error::{Result, TextDirectoryError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TextDirectoryError::invalid_argument("n must be a number"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// The main error type for textdirectory operations.
#[derive(Error, Debug)]
pub enum TextDirectoryError {
    /// I/O errors while reading documents or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization errors, e.g. for configuration files.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A directory that must exist does not.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The directory holds no file matching the requested filetype.
    #[error("No matching files found in {}", .0.display())]
    EmptyCorpus(PathBuf),

    /// Stage or unstage of a transformation that is not registered/staged.
    #[error("Unknown transformation: {0}")]
    UnknownTransformation(String),

    /// A filter name that does not exist.
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// Similarity threshold outside of [0, 1].
    #[error("Invalid threshold {0}: expected a value between 0.0 and 1.0")]
    InvalidThreshold(f64),

    /// A language model or stopword resource could not be found.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// A checkpoint index beyond the recorded history.
    #[error("Checkpoint {index} out of range ({len} checkpoints recorded)")]
    CheckpointOutOfRange { index: usize, len: usize },

    /// Sampling without replacement asked for more documents than available.
    #[error("Cannot sample {requested} documents from an aggregation of {available}")]
    SampleTooLarge { requested: usize, available: usize },

    /// Malformed arguments to a filter or transformation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unsupported text encoding name.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`TextDirectoryError`].
pub type Result<T> = std::result::Result<T, TextDirectoryError>;

/// A pattern compiled on first use.
pub(crate) type LazyRegex = LazyLock<std::result::Result<Regex, regex::Error>>;

/// The compiled pattern, or its compile error.
pub(crate) fn compiled(pattern: &'static LazyRegex) -> Result<&'static Regex> {
    LazyLock::force(pattern)
        .as_ref()
        .map_err(|e| anyhow::Error::from(e.clone()).into())
}

impl TextDirectoryError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TextDirectoryError::InvalidArgument(msg.into())
    }

    /// Create a new model not found error.
    pub fn model_not_found<S: Into<String>>(msg: S) -> Self {
        TextDirectoryError::ModelNotFound(msg.into())
    }

    /// Create a new unknown transformation error.
    pub fn unknown_transformation<S: Into<String>>(name: S) -> Self {
        TextDirectoryError::UnknownTransformation(name.into())
    }

    /// Create a new unknown filter error.
    pub fn unknown_filter<S: Into<String>>(name: S) -> Self {
        TextDirectoryError::UnknownFilter(name.into())
    }

    /// Create a new encoding error.
    pub fn encoding<S: Into<String>>(msg: S) -> Self {
        TextDirectoryError::Encoding(msg.into())
    }
}
