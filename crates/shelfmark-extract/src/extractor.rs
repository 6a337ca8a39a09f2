//! Per-type metadata extraction dispatch.

use std::path::Path;

use shelfmark_domain::{DocumentMetadata, DocumentType};

use crate::caselaw::CaselawExtractor;
use crate::error::ExtractError;

/// Routes text to the extractor for its classified document type.
///
/// Only caselaw has a dedicated extractor today; other types get an empty
/// metadata map and the pipeline falls back to filename-derived values.
pub struct MetadataExtractor {
    caselaw: CaselawExtractor,
}

impl MetadataExtractor {
    /// Build with the embedded default rules.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            caselaw: CaselawExtractor::from_embedded()?,
        })
    }

    /// Build with caselaw rules loaded from a file.
    pub fn with_caselaw_rules(path: &Path) -> Result<Self, ExtractError> {
        Ok(Self {
            caselaw: CaselawExtractor::from_file(path)?,
        })
    }

    /// Extract metadata for a document of the given type.
    pub fn extract(&self, document_type: DocumentType, text: &str) -> DocumentMetadata {
        match document_type {
            DocumentType::Caselaw => self.caselaw.extract_metadata(text),
            other => {
                tracing::debug!(
                    document_type = other.as_str(),
                    "no dedicated extractor for document type"
                );
                DocumentMetadata::new(other)
            }
        }
    }
}
