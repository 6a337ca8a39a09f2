//! Extracted metadata with provenance tracking.

use std::collections::BTreeMap;

use crate::document::{ConfidenceLevel, DocumentType, ExtractionSource};

/// One extracted (key, value) pair with provenance.
///
/// Tracks not just the value but where it came from and how confident the
/// extractor was. Immutable once created; the registry persists it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    /// Field name (e.g., "court", "year", "case_name", "citation")
    pub key: String,

    /// Extracted value
    pub value: String,

    /// Where this value was extracted from
    pub source: ExtractionSource,

    /// Confidence in this extraction
    pub confidence: ConfidenceLevel,

    /// Name of the extractor/rule that produced this value
    pub extractor: String,
}

impl MetadataField {
    /// Create a field extracted from document text.
    pub fn from_document(
        key: impl Into<String>,
        value: impl Into<String>,
        confidence: ConfidenceLevel,
        extractor: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            source: ExtractionSource::Document,
            confidence,
            extractor: extractor.into(),
        }
    }

    /// Create a fallback field for a value no rule could extract.
    pub fn fallback(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            source: ExtractionSource::Fallback,
            confidence: ConfidenceLevel::Low,
            extractor: "fallback".to_string(),
        }
    }
}

/// Complete extracted metadata for one document.
///
/// Different document types carry different fields; a field no rule matched
/// is absent from the map, which callers must treat differently from an
/// empty value. Keys are kept sorted for deterministic iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Extracted fields keyed by field name
    pub fields: BTreeMap<String, MetadataField>,

    /// The document type these fields were extracted for
    pub document_type: DocumentType,
}

impl DocumentMetadata {
    /// Create an empty metadata map for a document type.
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            fields: BTreeMap::new(),
            document_type,
        }
    }

    /// Insert a field, keyed by its own `key`.
    pub fn insert(&mut self, field: MetadataField) {
        self.fields.insert(field.key.clone(), field);
    }

    /// Get a field's value, or `None` if it was not extracted.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|f| f.value.as_str())
    }

    /// Get a field's confidence level, if the field was extracted.
    pub fn confidence(&self, key: &str) -> Option<ConfidenceLevel> {
        self.fields.get(key).map(|f| f.confidence)
    }

    /// True when no rule extracted anything.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_distinct_from_empty() {
        let mut meta = DocumentMetadata::new(DocumentType::Caselaw);
        meta.insert(MetadataField::from_document(
            "citation",
            "",
            ConfidenceLevel::Low,
            "test",
        ));

        assert_eq!(meta.value("citation"), Some(""));
        assert_eq!(meta.value("court"), None);
    }

    #[test]
    fn test_insert_keys_by_field_key() {
        let mut meta = DocumentMetadata::new(DocumentType::Caselaw);
        meta.insert(MetadataField::from_document(
            "year",
            "2014",
            ConfidenceLevel::High,
            "decided-date",
        ));

        assert_eq!(meta.value("year"), Some("2014"));
        assert_eq!(meta.confidence("year"), Some(ConfidenceLevel::High));
    }

    #[test]
    fn test_fallback_provenance() {
        let field = MetadataField::fallback("court", "Unknown_Court");
        assert_eq!(field.source, ExtractionSource::Fallback);
        assert_eq!(field.confidence, ConfidenceLevel::Low);
    }
}
