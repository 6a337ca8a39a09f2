//! Extraction rule configuration.
//!
//! Each document type declares, per target field, an ordered list of rules.
//! Rules are tried in ascending priority and the first match wins, so a
//! generic fallback pattern can never pre-empt a more specific one declared
//! at a lower priority number.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use shelfmark_domain::ConfidenceLevel;

use crate::error::ExtractError;

/// How a matched court rule is turned into a reporting abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtKind {
    /// "Court of Appeals of Georgia" -> "Ga. Ct. App."
    StateAppeals,
    /// "Supreme Court of Georgia" -> "Ga. Sup. Ct."
    StateSupreme,
    /// "United States Court of Appeals for the Seventh Circuit" -> "Seventh Cir."
    FederalCircuit,
    /// "United States District Court for the Northern District of Illinois" -> "ND Ill."
    FederalDistrict,
}

/// One named capture inside an extraction rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSpec {
    /// Regex group number for this capture.
    ///
    /// Validated against the pattern's *total* group count, never against
    /// the last participating group of a particular match: optional outer
    /// groups shift which groups participate, not how many exist.
    pub group: usize,

    /// Sub-patterns applied in sequence (case-insensitive) to trim the
    /// captured text, e.g. stripping procedural party designations.
    #[serde(default)]
    pub cleanup_patterns: Vec<String>,
}

/// One prioritized extraction rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRule {
    /// Regular expression with capture groups
    pub pattern: String,

    /// Ascending try order within the field (lower = tried first)
    pub priority: u32,

    /// Confidence assigned to a value this rule extracts
    #[serde(default = "default_confidence")]
    pub confidence: String,

    /// Human-readable description, recorded as provenance
    pub description: String,

    /// Named captures used by the field builder
    #[serde(default)]
    pub captures: BTreeMap<String, CaptureSpec>,

    /// Reporter name for citation rules ("Ga. App.", "F. Supp. 2d", ...)
    #[serde(default)]
    pub reporter: Option<String>,

    /// Formatting kind for court rules
    #[serde(default)]
    pub court_kind: Option<CourtKind>,
}

fn default_confidence() -> String {
    "MEDIUM".to_string()
}

impl ExtractionRule {
    /// Parse the declared confidence string, defaulting to MEDIUM.
    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence
            .parse()
            .unwrap_or(ConfidenceLevel::Medium)
    }
}

/// Full extraction rule file for one document type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRulesConfig {
    /// Document type tag these rules extract for
    pub document_type: String,

    /// Field name -> prioritized rules
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<ExtractionRule>>,
}

impl ExtractionRulesConfig {
    /// Parse a rule file from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ExtractError> {
        Ok(toml::from_str(text)?)
    }
}

/// A rule with its regexes compiled and captures validated.
#[derive(Debug)]
pub struct CompiledRule {
    /// Compiled match pattern
    pub regex: Regex,
    /// Declared priority (rules are stored sorted by this)
    pub priority: u32,
    /// Confidence for values this rule produces
    pub confidence: ConfidenceLevel,
    /// Provenance description
    pub description: String,
    /// Named captures with compiled cleanup chains
    pub captures: BTreeMap<String, CompiledCapture>,
    /// Reporter name (citation rules)
    pub reporter: Option<String>,
    /// Court formatting kind (court rules)
    pub court_kind: Option<CourtKind>,
}

/// A capture spec with its cleanup chain compiled.
#[derive(Debug)]
pub struct CompiledCapture {
    /// Group number within the rule's pattern
    pub group: usize,
    /// Cleanup regexes applied in order
    pub cleanup: Vec<Regex>,
}

impl CompiledRule {
    /// Compile one rule for a named field.
    pub fn compile(field: &str, rule: &ExtractionRule) -> Result<Self, ExtractError> {
        let regex = compile_pattern(field, &rule.pattern)?;

        let mut captures = BTreeMap::new();
        for (name, spec) in &rule.captures {
            // Total group count includes group 0; a declared group must fit.
            if spec.group >= regex.captures_len() {
                tracing::warn!(
                    field,
                    capture = name.as_str(),
                    group = spec.group,
                    groups = regex.captures_len(),
                    "capture group number exceeds pattern group count; capture ignored"
                );
                continue;
            }
            let cleanup = spec
                .cleanup_patterns
                .iter()
                .map(|p| compile_cleanup(field, p))
                .collect::<Result<Vec<_>, _>>()?;
            captures.insert(
                name.clone(),
                CompiledCapture {
                    group: spec.group,
                    cleanup,
                },
            );
        }

        Ok(Self {
            regex,
            priority: rule.priority,
            confidence: rule.confidence_level(),
            description: rule.description.clone(),
            captures,
            reporter: rule.reporter.clone(),
            court_kind: rule.court_kind,
        })
    }

    /// Look up a named capture's text in a match and run its cleanup chain.
    ///
    /// Returns `None` when the capture is undeclared or did not participate
    /// in this particular match (optional groups).
    pub fn capture_value(&self, caps: &regex::Captures<'_>, name: &str) -> Option<String> {
        let spec = self.captures.get(name)?;
        let raw = caps.get(spec.group)?.as_str();
        let mut value = raw.trim().to_string();
        for cleanup in &spec.cleanup {
            value = cleanup.replace_all(&value, "").to_string();
        }
        let value = value.trim().trim_matches(',').trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

fn compile_pattern(field: &str, pattern: &str) -> Result<Regex, ExtractError> {
    // Match patterns run in multi-line mode so anchors bind to line
    // boundaries; unanchored patterns have a habit of capturing across
    // unrelated adjacent text.
    regex::RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|source| ExtractError::InvalidPattern {
            pattern: pattern.to_string(),
            field: field.to_string(),
            source,
        })
}

fn compile_cleanup(field: &str, pattern: &str) -> Result<Regex, ExtractError> {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ExtractError::InvalidPattern {
            pattern: pattern.to_string(),
            field: field.to_string(),
            source,
        })
}

/// Compile a full rule file into per-field rule lists sorted by priority.
pub fn compile_fields(
    config: &ExtractionRulesConfig,
) -> Result<BTreeMap<String, Vec<CompiledRule>>, ExtractError> {
    let mut fields = BTreeMap::new();
    for (field, rules) in &config.fields {
        let mut compiled = rules
            .iter()
            .map(|r| CompiledRule::compile(field, r))
            .collect::<Result<Vec<_>, _>>()?;
        compiled.sort_by_key(|r| r.priority);
        fields.insert(field.clone(), compiled);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_file() {
        let config = ExtractionRulesConfig::from_toml(
            r#"
            document_type = "caselaw"

            [[fields.year]]
            priority = 2
            confidence = "MEDIUM"
            description = "Filed date"
            pattern = 'Filed:\s+(\w+ \d{1,2}, (\d{4}))'
            [fields.year.captures.year]
            group = 2

            [[fields.year]]
            priority = 1
            confidence = "HIGH"
            description = "Decided date"
            pattern = 'Decided:\s+(\w+ \d{1,2}, (\d{4}))'
            [fields.year.captures.year]
            group = 2
            "#,
        )
        .unwrap();

        let fields = compile_fields(&config).unwrap();
        let rules = &fields["year"];
        // Sorted ascending by priority regardless of declaration order.
        assert_eq!(rules[0].description, "Decided date");
        assert_eq!(rules[1].description, "Filed date");
    }

    #[test]
    fn test_out_of_range_group_is_dropped_not_fatal() {
        let config = ExtractionRulesConfig::from_toml(
            r#"
            document_type = "caselaw"

            [[fields.year]]
            priority = 1
            description = "bad group"
            pattern = '(\d{4})'
            [fields.year.captures.year]
            group = 7
            "#,
        )
        .unwrap();

        let fields = compile_fields(&config).unwrap();
        assert!(fields["year"][0].captures.is_empty());
    }

    #[test]
    fn test_cleanup_chain_applies_in_sequence() {
        let config = ExtractionRulesConfig::from_toml(
            r#"
            document_type = "caselaw"

            [[fields.case_name]]
            priority = 1
            description = "caption"
            pattern = '(.+) v\. (.+)'
            [fields.case_name.captures.plaintiff]
            group = 1
            cleanup_patterns = [',?\s*Plaintiffs?\b.*$', ',?\s*et al\.?$']
            "#,
        )
        .unwrap();

        let fields = compile_fields(&config).unwrap();
        let rule = &fields["case_name"][0];
        let caps = rule.regex.captures("Smith, et al., Plaintiffs v. Jones").unwrap();
        assert_eq!(rule.capture_value(&caps, "plaintiff").as_deref(), Some("Smith"));
    }

    #[test]
    fn test_nonparticipating_optional_group_yields_none() {
        let config = ExtractionRulesConfig::from_toml(
            r#"
            document_type = "caselaw"

            [[fields.court]]
            priority = 1
            description = "optional outer group"
            pattern = '(?:(Supreme) )?Court of (\w+)'
            [fields.court.captures.level]
            group = 1
            [fields.court.captures.state]
            group = 2
            "#,
        )
        .unwrap();

        let fields = compile_fields(&config).unwrap();
        let rule = &fields["court"][0];

        // Group 1 does not participate here, but group 2 still resolves:
        // lookup is by total group count, not last participating index.
        let caps = rule.regex.captures("Court of Georgia").unwrap();
        assert_eq!(rule.capture_value(&caps, "level"), None);
        assert_eq!(rule.capture_value(&caps, "state").as_deref(), Some("Georgia"));
    }
}
