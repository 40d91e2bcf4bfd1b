//! Error types for lyrics deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or reading a lyrics deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read input or write output.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The lyrics text had nothing to put on a slide.
    #[error("Lyrics text is required")]
    EmptyLyrics,

    /// A styling profile name was not recognized.
    #[error("Unknown style profile: {0}")]
    UnknownProfile(String),

    /// A script category name was not recognized.
    #[error("Unknown script category: {0}")]
    UnknownCategory(String),

    /// Failed to read back the structure of a PPTX file.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML reading or writing error.
    #[error("XML error: {0}")]
    XmlError(String),
}
