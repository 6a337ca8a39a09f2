//! Document type, status, and provenance enumerations.

use std::fmt;
use std::str::FromStr;

/// Document type classification tag.
///
/// Defined by configuration, not user data: each enabled rule set maps to
/// exactly one of these variants. `Unknown` is the result of a classification
/// that scored below the low-confidence threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// Legal case (court decision)
    Caselaw,
    /// Statute or code section
    Statute,
    /// Journal article
    Article,
    /// Legal brief
    Brief,
    /// Book or treatise
    Book,
    /// Could not be classified with any confidence
    Unknown,
}

impl DocumentType {
    /// Stable string tag used in rule files, filenames, and the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Caselaw => "caselaw",
            DocumentType::Statute => "statute",
            DocumentType::Article => "article",
            DocumentType::Brief => "brief",
            DocumentType::Book => "book",
            DocumentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "caselaw" => Ok(DocumentType::Caselaw),
            "statute" => Ok(DocumentType::Statute),
            "article" => Ok(DocumentType::Article),
            "brief" => Ok(DocumentType::Brief),
            "book" => Ok(DocumentType::Book),
            "unknown" => Ok(DocumentType::Unknown),
            _ => Err(format!("Unknown document type: {}", s)),
        }
    }
}

/// Processing status for documents and pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// Not yet processed
    Pending,
    /// Currently being processed
    InProgress,
    /// Completed successfully
    Success,
    /// Terminal failure
    Failed,
    /// Deliberately skipped (already processed, unsupported format)
    Skipped,
}

impl ProcessingStatus {
    /// Stable string tag stored in the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::InProgress => "in_progress",
            ProcessingStatus::Success => "success",
            ProcessingStatus::Failed => "failed",
            ProcessingStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProcessingStatus::Pending),
            "in_progress" => Ok(ProcessingStatus::InProgress),
            "success" => Ok(ProcessingStatus::Success),
            "failed" => Ok(ProcessingStatus::Failed),
            "skipped" => Ok(ProcessingStatus::Skipped),
            _ => Err(format!("Unknown processing status: {}", s)),
        }
    }
}

/// Confidence level attached to extracted metadata and classifications.
///
/// Ordered so that `Low < Medium < High`, which lets callers express minimum
/// confidence requirements with plain comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceLevel {
    /// Weak signal; value may need review
    Low,
    /// Reasonable signal
    Medium,
    /// Strong, usually dispositive signal
    High,
}

impl ConfidenceLevel {
    /// Stable string tag stored in the registry and rule files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::Medium => "MEDIUM",
            ConfidenceLevel::Low => "LOW",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HIGH" => Ok(ConfidenceLevel::High),
            "MEDIUM" => Ok(ConfidenceLevel::Medium),
            "LOW" => Ok(ConfidenceLevel::Low),
            _ => Err(format!("Unknown confidence level: {}", s)),
        }
    }
}

/// Where an extracted metadata value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Extracted from document text
    Document,
    /// Extracted from the filename
    Filename,
    /// Default/fallback value
    Fallback,
}

impl ExtractionSource {
    /// Stable string tag stored in the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionSource::Document => "document",
            ExtractionSource::Filename => "filename",
            ExtractionSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(ExtractionSource::Document),
            "filename" => Ok(ExtractionSource::Filename),
            "fallback" => Ok(ExtractionSource::Fallback),
            _ => Err(format!("Unknown extraction source: {}", s)),
        }
    }
}
