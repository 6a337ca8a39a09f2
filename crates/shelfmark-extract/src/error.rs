//! Error types for text and metadata extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the extraction layer.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Source file does not exist or is not a file
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// File extension is not one we can extract text from
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A required external tool (pdftotext) is not installed
    #[error("required tool not found: {0}")]
    MissingTool(String),

    /// The extraction subprocess exited with an error
    #[error("text extraction failed for {path}: {message}")]
    ExtractionFailed {
        /// Source file
        path: PathBuf,
        /// Stderr or exit description from the tool
        message: String,
    },

    /// Extracted output was empty
    #[error("no text extracted from {0}")]
    EmptyText(PathBuf),

    /// An extraction rule pattern failed to compile
    #[error("invalid pattern {pattern:?} for field {field:?}: {source}")]
    InvalidPattern {
        /// The offending regex source
        pattern: String,
        /// Field the rule extracts
        field: String,
        /// Compile error from the regex crate
        source: regex::Error,
    },

    /// TOML parsing error in a rule file
    #[error("extraction rule parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
