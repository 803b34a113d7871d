//! Error types for the textblob library.

use std::io;
use thiserror::Error;

/// Result type alias for textblob operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or rendering content.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON input (snapshot files, raw records).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The content source failed to answer a request.
    #[error("Content source error: {0}")]
    Source(String),

    /// A required page property is absent or has the wrong shape.
    #[error("Missing page property: {0}")]
    MissingProperty(String),

    /// A date property could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error while writing rendered output (HTML, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Missing or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
