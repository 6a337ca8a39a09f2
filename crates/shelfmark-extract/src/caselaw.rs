//! Caselaw metadata extraction.
//!
//! Pulls case name, decision year, court, and reporter citation out of
//! opinion text using the prioritized rule machinery in [`crate::config`].
//! Default rules ship embedded; callers can load replacements from a TOML
//! file to cover jurisdictions the defaults miss.

use std::collections::BTreeMap;
use std::path::Path;

use shelfmark_domain::{DocumentMetadata, DocumentType, MetadataField};

use crate::config::{compile_fields, CompiledRule, CourtKind, ExtractionRulesConfig};
use crate::error::ExtractError;

/// Default rule file compiled into the binary.
const EMBEDDED_RULES: &str = include_str!("rules/caselaw.toml");

/// Years outside this window are treated as noise (page numbers, statute
/// section numbers) rather than decision dates.
const MIN_YEAR: u32 = 1700;
const MAX_YEAR: u32 = 2100;

/// Extracts structured metadata from caselaw text.
pub struct CaselawExtractor {
    fields: BTreeMap<String, Vec<CompiledRule>>,
}

impl CaselawExtractor {
    /// Build an extractor from the embedded default rules.
    pub fn from_embedded() -> Result<Self, ExtractError> {
        let config = ExtractionRulesConfig::from_toml(EMBEDDED_RULES)?;
        Self::from_config(&config)
    }

    /// Build an extractor from an already-parsed rule config.
    pub fn from_config(config: &ExtractionRulesConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            fields: compile_fields(config)?,
        })
    }

    /// Build an extractor from a rule file on disk.
    pub fn from_file(path: &Path) -> Result<Self, ExtractError> {
        let text = std::fs::read_to_string(path)?;
        let config = ExtractionRulesConfig::from_toml(&text)?;
        Self::from_config(&config)
    }

    /// Extract all caselaw fields from document text.
    ///
    /// A field no rule matched is absent from the result, never present
    /// with an empty value.
    pub fn extract_metadata(&self, text: &str) -> DocumentMetadata {
        let mut metadata = DocumentMetadata::new(DocumentType::Caselaw);

        if let Some(field) = self.extract_case_name(text) {
            metadata.insert(field);
        }
        if let Some(field) = self.extract_year(text) {
            metadata.insert(field);
        }
        if let Some(field) = self.extract_court(text) {
            metadata.insert(field);
        }
        if let Some(field) = self.extract_citation(text) {
            metadata.insert(field);
        }

        tracing::debug!(fields = metadata.fields.len(), "extracted caselaw metadata");
        metadata
    }

    fn rules(&self, field: &str) -> &[CompiledRule] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Case caption: "Plaintiff v. Defendant", both parties required.
    fn extract_case_name(&self, text: &str) -> Option<MetadataField> {
        for rule in self.rules("case_name") {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let plaintiff = rule.capture_value(&caps, "plaintiff");
            let defendant = rule.capture_value(&caps, "defendant");
            if let (Some(plaintiff), Some(defendant)) = (plaintiff, defendant) {
                return Some(MetadataField::from_document(
                    "case_name",
                    format!("{plaintiff} v. {defendant}"),
                    rule.confidence,
                    format!("caselaw: {}", rule.description),
                ));
            }
        }
        None
    }

    /// Decision year, preferring labeled dates over bare parentheticals.
    fn extract_year(&self, text: &str) -> Option<MetadataField> {
        for rule in self.rules("date") {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let Some(year) = rule.capture_value(&caps, "year") else {
                continue;
            };
            if !is_plausible_year(&year) {
                continue;
            }
            return Some(MetadataField::from_document(
                "year",
                year,
                rule.confidence,
                format!("caselaw: {}", rule.description),
            ));
        }
        None
    }

    /// Court, formatted to a reporting abbreviation where the rule kind
    /// allows it ("Ga. Ct. App.", "ND Ill.", "Seventh Cir.").
    fn extract_court(&self, text: &str) -> Option<MetadataField> {
        for rule in self.rules("court") {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let Some(court) = build_court_name(rule, &caps) else {
                continue;
            };
            return Some(MetadataField::from_document(
                "court",
                court,
                rule.confidence,
                format!("caselaw: {}", rule.description),
            ));
        }
        None
    }

    /// Primary reporter citation, assembled as "volume reporter page".
    fn extract_citation(&self, text: &str) -> Option<MetadataField> {
        for rule in self.rules("citation") {
            let Some(reporter) = rule.reporter.as_deref() else {
                continue;
            };
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let volume = rule.capture_value(&caps, "volume");
            let page = rule.capture_value(&caps, "page");
            if let (Some(volume), Some(page)) = (volume, page) {
                return Some(MetadataField::from_document(
                    "citation",
                    format!("{volume} {reporter} {page}"),
                    rule.confidence,
                    format!("caselaw: {}", rule.description),
                ));
            }
        }
        None
    }
}

fn is_plausible_year(year: &str) -> bool {
    year.parse::<u32>()
        .map(|y| (MIN_YEAR..=MAX_YEAR).contains(&y))
        .unwrap_or(false)
}

fn build_court_name(rule: &CompiledRule, caps: &regex::Captures<'_>) -> Option<String> {
    match rule.court_kind {
        Some(CourtKind::StateAppeals) => {
            let state = rule.capture_value(caps, "state")?;
            Some(format!("{} Ct. App.", state_abbreviation(&state)))
        }
        Some(CourtKind::StateSupreme) => {
            let state = rule.capture_value(caps, "state")?;
            Some(format!("{} Sup. Ct.", state_abbreviation(&state)))
        }
        Some(CourtKind::FederalCircuit) => {
            let circuit = rule.capture_value(caps, "circuit")?;
            Some(format!("{circuit} Cir."))
        }
        Some(CourtKind::FederalDistrict) => {
            let district = rule.capture_value(caps, "district")?;
            let state = rule.capture_value(caps, "state")?;
            Some(format!(
                "{} {}",
                district_abbreviation(&district),
                state_abbreviation(&state)
            ))
        }
        // No formatting kind: the whole match is the court name.
        None => Some(caps.get(0)?.as_str().trim().to_string()),
    }
}

/// Bluebook-style state abbreviation; unknown states pass through unchanged.
fn state_abbreviation(state: &str) -> String {
    match state.to_ascii_lowercase().as_str() {
        "georgia" => "Ga.",
        "illinois" => "Ill.",
        "california" => "Cal.",
        "new york" => "N.Y.",
        "texas" => "Tex.",
        "florida" => "Fla.",
        "ohio" => "Ohio",
        "pennsylvania" => "Pa.",
        "michigan" => "Mich.",
        "virginia" => "Va.",
        "washington" => "Wash.",
        "massachusetts" => "Mass.",
        "north carolina" => "N.C.",
        _ => return state.to_string(),
    }
    .to_string()
}

/// "Northern" -> "ND" and so on; unknown designations pass through.
fn district_abbreviation(district: &str) -> String {
    match district.to_ascii_lowercase().as_str() {
        "northern" => "ND",
        "southern" => "SD",
        "eastern" => "ED",
        "western" => "WD",
        "middle" => "MD",
        "central" => "CD",
        _ => return district.to_string(),
    }
    .to_string()
}
