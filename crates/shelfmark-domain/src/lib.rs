//! Shelfmark Domain Layer
//!
//! This crate contains the core domain model for shelfmark. It is kept
//! intentionally small and defines the fundamental concepts that all other
//! layers depend upon.
//!
//! ## Key Concepts
//!
//! - **DocumentType**: the enumerated classification tags (caselaw, statute, ...)
//! - **Classification**: winning type + normalized confidence + matched indicators
//! - **MetadataField**: one extracted (key, value) pair with provenance
//! - **Code**: a fixed-length base-25 identifier (A-Z without W) with a total
//!   bijection to integer indices
//!
//! ## Architecture
//!
//! - Only `thiserror` for error types; no infrastructure dependencies
//! - Pure types and pure functions only
//! - Regex matching, SQLite, and filesystem work live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classification;
pub mod code;
pub mod document;
pub mod metadata;

// Re-exports for convenience
pub use classification::Classification;
pub use code::{code_to_index, index_to_code, is_valid_code, CodeError};
pub use document::{ConfidenceLevel, DocumentType, ExtractionSource, ProcessingStatus};
pub use metadata::{DocumentMetadata, MetadataField};
