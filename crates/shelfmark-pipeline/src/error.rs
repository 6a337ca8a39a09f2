//! Pipeline error taxonomy.
//!
//! Every variant is caught at the orchestrator boundary, recorded as a
//! failed processing step with its display text, and surfaced in the batch
//! summary. Individual failures never abort a batch.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while processing one document.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Text extraction failed (missing file, missing tool, empty output)
    #[error("extraction failure: {0}")]
    Extraction(#[from] shelfmark_extract::ExtractError),

    /// Classification rules failed to load
    #[error(transparent)]
    Classify(#[from] shelfmark_classify::ClassifyError),

    /// No rule set scored the document above its minimum threshold
    #[error("could not classify document: {0}")]
    ClassificationUnknown(String),

    /// A field the filename template requires was not extracted
    #[error("required metadata field missing: {0}")]
    MetadataMissing(String),

    /// Code encode/decode error, including registry exhaustion
    #[error(transparent)]
    Code(#[from] shelfmark_domain::CodeError),

    /// Code already belongs to another document
    #[error("code collision: {0}")]
    CodeCollision(String),

    /// Filename exceeds the filesystem limit even after truncation
    #[error("filename too long: {length} chars (max {max})")]
    FilenameTooLong {
        /// Length of the shortest name the formatter could build
        length: usize,
        /// Filesystem limit
        max: usize,
    },

    /// Target filename already exists and is not this document
    #[error("rename conflict: {0} already exists")]
    RenameConflict(PathBuf),

    /// Registry read/write failure
    #[error("store failure: {0}")]
    Store(#[from] shelfmark_store::StoreError),

    /// I/O error during rename
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
