//! Error types for proposal deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during proposal deck generation.
///
/// The extraction and planning stages never surface errors (they degrade to
/// deterministic fallbacks); these variants belong to the rendering stage
/// and the caller-facing format boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The requested output format is not recognized.
    #[error("Unsupported or unrecognized output format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive error while assembling the presentation package.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML generation error while writing a package part.
    #[error("XML error: {0}")]
    XmlError(String),
}
