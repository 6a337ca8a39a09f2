//! Shelfmark Extraction Layer
//!
//! Two concerns live here:
//!
//! - **Text extraction**: turning a document file into plain text. PDFs go
//!   through the `pdftotext` binary (Poppler) as a bounded subprocess with a
//!   fast and a layout-preserving strategy; plain text files are read
//!   directly. Extraction failure is a per-document error, never a crash.
//! - **Metadata extraction**: pulling structured fields (case name, year,
//!   court, citation) out of the text with prioritized, TOML-defined regex
//!   rules and per-capture cleanup chains, with provenance on every field.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod caselaw;
pub mod config;
pub mod error;
pub mod extractor;
pub mod text;

pub use caselaw::CaselawExtractor;
pub use error::ExtractError;
pub use extractor::MetadataExtractor;
pub use text::{ExtractedText, Strategy, TextExtractor};
