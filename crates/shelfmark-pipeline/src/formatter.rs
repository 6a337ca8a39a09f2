//! Standardized filename formatting.
//!
//! Caselaw template: `c.{court}__{year}__{case_name}__{citation}----{CODE}.ext`
//!
//! Field transforms:
//!
//! - court, citation: periods removed, spaces to underscores
//! - case_name: `&` to `and`, periods/commas removed, spaces to hyphens
//! - OS-illegal characters stripped everywhere
//!
//! Optional fields fall back (`Unknown_Court`, `XXXX`, `Unpub`); `case_name`
//! is required. Names over the filesystem limit are shortened by truncating
//! case_name first, then citation, never the code or extension.

use shelfmark_domain::code::SEPARATOR;
use shelfmark_domain::DocumentMetadata;

use crate::error::PipelineError;

/// Maximum filename length on the common filesystems.
const MAX_FILENAME_LENGTH: usize = 255;

/// Shortest truncated length for case_name and citation.
const MIN_FIELD_LENGTH: usize = 8;

const COURT_FALLBACK: &str = "Unknown_Court";
const YEAR_FALLBACK: &str = "XXXX";
const CITATION_FALLBACK: &str = "Unpub";

/// Formats document metadata into a standardized, filesystem-safe filename.
#[derive(Debug, Clone)]
pub struct FilenameFormatter {
    max_length: usize,
}

impl FilenameFormatter {
    /// Formatter with the standard 255-char limit.
    pub fn new() -> Self {
        Self {
            max_length: MAX_FILENAME_LENGTH,
        }
    }

    /// Formatter with a custom length limit (tests).
    #[cfg(test)]
    fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Build the full filename for a document.
    ///
    /// `extension` is the original extension without the leading dot; an
    /// empty string means the original file had none.
    pub fn format_filename(
        &self,
        metadata: &DocumentMetadata,
        code: &str,
        extension: &str,
    ) -> Result<String, PipelineError> {
        let case_name = metadata
            .value("case_name")
            .filter(|v| !v.is_empty())
            .map(format_case_name)
            .ok_or_else(|| PipelineError::MetadataMissing("case_name".to_string()))?;

        let court = metadata
            .value("court")
            .filter(|v| !v.is_empty())
            .map(format_court)
            .unwrap_or_else(|| COURT_FALLBACK.to_string());
        let year = metadata
            .value("year")
            .filter(|v| !v.is_empty())
            .map(|v| sanitize(v))
            .unwrap_or_else(|| YEAR_FALLBACK.to_string());
        let citation = metadata
            .value("citation")
            .filter(|v| !v.is_empty())
            .map(format_citation)
            .unwrap_or_else(|| CITATION_FALLBACK.to_string());

        self.assemble(&court, &year, &case_name, &citation, code, extension)
    }

    fn assemble(
        &self,
        court: &str,
        year: &str,
        case_name: &str,
        citation: &str,
        code: &str,
        extension: &str,
    ) -> Result<String, PipelineError> {
        let suffix = if extension.is_empty() {
            format!("{SEPARATOR}{code}")
        } else {
            format!("{SEPARATOR}{code}.{extension}")
        };

        // Everything except case_name and citation is untouchable.
        let fixed = "c.".len() + court.len() + year.len() + "__".len() * 3 + suffix.len();
        let available = self.max_length.saturating_sub(fixed);

        let (case_name, citation) = shorten(case_name, citation, available);
        let filename = format!("c.{court}__{year}__{case_name}__{citation}{suffix}");

        if filename.chars().count() > self.max_length {
            return Err(PipelineError::FilenameTooLong {
                length: filename.chars().count(),
                max: self.max_length,
            });
        }
        Ok(filename)
    }
}

impl Default for FilenameFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim case_name first, then citation, until both fit in `available`.
fn shorten(case_name: &str, citation: &str, available: usize) -> (String, String) {
    let mut case_name = case_name.to_string();
    let mut citation = citation.to_string();

    let over = |case: &str, cit: &str| (case.len() + cit.len()).saturating_sub(available);

    let excess = over(&case_name, &citation);
    if excess > 0 {
        let keep = case_name.len().saturating_sub(excess).max(MIN_FIELD_LENGTH);
        case_name.truncate(keep);
        let case_name = case_name.trim_end_matches('-');

        let excess = over(case_name, &citation);
        if excess > 0 {
            let keep = citation.len().saturating_sub(excess).max(MIN_FIELD_LENGTH);
            citation.truncate(keep);
        }
        return (case_name.to_string(), citation.trim_end_matches('_').to_string());
    }
    (case_name, citation)
}

/// "Ga. Ct. App." -> "Ga_Ct_App"
fn format_court(court: &str) -> String {
    sanitize(&court.replace('.', "").replace(' ', "_"))
}

/// "Indian Trail, LLC v. State Bank & Trust Co." -> "Indian-Trail-LLC-v-State-Bank-and-Trust-Co"
fn format_case_name(case_name: &str) -> String {
    let replaced = case_name
        .replace('&', "and")
        .replace(['.', ','], "")
        .replace(' ', "-");
    let kept: String = replaced
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    collapse(&kept, '-')
}

/// "328 Ga. App. 524" -> "328_GaApp_524"
fn format_citation(citation: &str) -> String {
    let replaced = citation.replace('.', "").replace(' ', "_");
    let kept: String = replaced
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    collapse(&kept, '_')
}

/// Remove OS-illegal filename characters and control characters.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') && *c >= ' ')
        .collect::<String>()
        .trim_matches([' ', '.'])
        .to_string()
}

/// Collapse runs of `sep` and trim it from both ends.
fn collapse(value: &str, sep: char) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_sep = false;
    for c in value.chars() {
        if c == sep {
            if !last_was_sep && !out.is_empty() {
                out.push(c);
            }
            last_was_sep = true;
        } else {
            out.push(c);
            last_was_sep = false;
        }
    }
    out.trim_end_matches(sep).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_domain::{ConfidenceLevel, DocumentType, MetadataField};

    fn metadata(fields: &[(&str, &str)]) -> DocumentMetadata {
        let mut meta = DocumentMetadata::new(DocumentType::Caselaw);
        for (key, value) in fields {
            meta.insert(MetadataField::from_document(
                *key,
                *value,
                ConfidenceLevel::High,
                "test",
            ));
        }
        meta
    }

    #[test]
    fn test_full_caselaw_filename() {
        let meta = metadata(&[
            ("court", "Ga. Ct. App."),
            ("year", "2014"),
            ("case_name", "Indian Trail, LLC v. State Bank & Trust Co."),
            ("citation", "328 Ga. App. 524"),
        ]);

        let name = FilenameFormatter::new()
            .format_filename(&meta, "ABCDE", "pdf")
            .unwrap();
        assert_eq!(
            name,
            "c.Ga_Ct_App__2014__Indian-Trail-LLC-v-State-Bank-and-Trust-Co__328_GaApp_524----ABCDE.pdf"
        );
    }

    #[test]
    fn test_missing_case_name_is_an_error() {
        let meta = metadata(&[("court", "Ga. Ct. App."), ("year", "2014")]);
        let err = FilenameFormatter::new()
            .format_filename(&meta, "ABCDE", "pdf")
            .unwrap_err();
        assert!(matches!(err, PipelineError::MetadataMissing(f) if f == "case_name"));
    }

    #[test]
    fn test_optional_fields_fall_back() {
        let meta = metadata(&[("case_name", "Smith v. Jones")]);
        let name = FilenameFormatter::new()
            .format_filename(&meta, "ABCDE", "pdf")
            .unwrap();
        assert_eq!(name, "c.Unknown_Court__XXXX__Smith-v-Jones__Unpub----ABCDE.pdf");
    }

    #[test]
    fn test_federal_district_formatting() {
        let meta = metadata(&[
            ("court", "ND Ill."),
            ("year", "2010"),
            ("case_name", "Abbott Labs. v. Sandoz, Inc"),
            ("citation", "743 F. Supp. 2d 762"),
        ]);
        let name = FilenameFormatter::new()
            .format_filename(&meta, "AAAAB", "pdf")
            .unwrap();
        assert_eq!(
            name,
            "c.ND_Ill__2010__Abbott-Labs-v-Sandoz-Inc__743_FSupp2d_762----AAAAB.pdf"
        );
    }

    #[test]
    fn test_truncation_trims_case_name_first_never_code_or_extension() {
        let long_name = "Very Long Party Name ".repeat(20) + "v. Another Long Name";
        let meta = metadata(&[
            ("court", "Ga. Ct. App."),
            ("year", "2014"),
            ("case_name", &long_name),
            ("citation", "328 Ga. App. 524"),
        ]);

        let name = FilenameFormatter::new()
            .format_filename(&meta, "ABCDE", "pdf")
            .unwrap();
        assert!(name.len() <= 255);
        assert!(name.ends_with("----ABCDE.pdf"));
        // Citation survives untouched; only the case name was shortened.
        assert!(name.contains("__328_GaApp_524----"));
    }

    #[test]
    fn test_truncation_falls_through_to_citation() {
        let meta = metadata(&[
            ("court", "Ga. Ct. App."),
            ("year", "2014"),
            ("case_name", "A Rather Long Case Name v. Some Defendant"),
            ("citation", "328 Ga. App. 524"),
        ]);

        let name = FilenameFormatter::with_max_length(50)
            .format_filename(&meta, "ABCDE", "pdf")
            .unwrap();
        assert!(name.len() <= 50);
        assert!(name.ends_with("----ABCDE.pdf"));
        // Both variable fields gave ground, the code and extension did not.
        assert!(!name.contains("328_GaApp_524"));
    }

    #[test]
    fn test_impossible_budget_is_an_error() {
        let meta = metadata(&[
            ("court", "Ga. Ct. App."),
            ("year", "2014"),
            ("case_name", "Smith v. Jones Corporation"),
            ("citation", "328 Ga. App. 524"),
        ]);

        let err = FilenameFormatter::with_max_length(20)
            .format_filename(&meta, "ABCDE", "pdf")
            .unwrap_err();
        assert!(matches!(err, PipelineError::FilenameTooLong { .. }));
    }

    #[test]
    fn test_illegal_characters_are_stripped() {
        let meta = metadata(&[
            ("court", "Ga./Ct.: App."),
            ("year", "2014"),
            ("case_name", "Smith v. Jones"),
            ("citation", "328 Ga. App. 524"),
        ]);

        let name = FilenameFormatter::new()
            .format_filename(&meta, "ABCDE", "pdf")
            .unwrap();
        assert!(!name.contains('/'));
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_no_extension() {
        let meta = metadata(&[("case_name", "Smith v. Jones")]);
        let name = FilenameFormatter::new()
            .format_filename(&meta, "ABCDE", "")
            .unwrap();
        assert!(name.ends_with("----ABCDE"));
    }
}
