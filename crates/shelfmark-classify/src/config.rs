//! Rule set configuration: plain immutable data loaded from TOML.
//!
//! Rule identifiers are never resolved to executable code; a rule set is
//! data all the way down, which keeps rule files editable without touching
//! the scoring algorithm.

use serde::{Deserialize, Serialize};
use shelfmark_domain::DocumentType;

use crate::error::ClassifyError;

/// One weighted classification pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    /// Regular expression matched against the document text
    pub pattern: String,

    /// Signed weight: positive supports the type, negative contradicts it
    pub weight: i32,

    /// Human-readable description, recorded on matches for audit
    pub description: String,

    /// Match case-sensitively (default: false)
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Raw-score thresholds for the confidence bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    /// HIGH band floor (default 60)
    #[serde(default = "default_high")]
    pub high: i64,

    /// MEDIUM band floor (default 30)
    #[serde(default = "default_medium")]
    pub medium: i64,

    /// LOW band floor; scores below this are `Unknown` (default 10)
    #[serde(default = "default_low")]
    pub low: i64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
            low: default_low(),
        }
    }
}

fn default_high() -> i64 {
    60
}

fn default_medium() -> i64 {
    30
}

fn default_low() -> i64 {
    10
}

/// One document type's complete rule set, as loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Document type tag this set classifies (e.g. "caselaw")
    pub document_type: String,

    /// Disabled sets are skipped at load time (default: enabled)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Confidence band thresholds
    #[serde(default)]
    pub confidence_thresholds: ConfidenceThresholds,

    /// Weighted patterns
    #[serde(default)]
    pub patterns: Vec<PatternRule>,
}

fn default_true() -> bool {
    true
}

impl RuleSetConfig {
    /// Parse a rule set from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ClassifyError> {
        Ok(toml::from_str(text)?)
    }

    /// The document type this set classifies.
    pub fn document_type(&self) -> Result<DocumentType, ClassifyError> {
        self.document_type
            .parse()
            .map_err(|_| ClassifyError::UnknownDocumentType(self.document_type.clone()))
    }

    /// Validate structure: known type, at least one pattern, thresholds ordered.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        self.document_type()?;
        if self.patterns.is_empty() {
            return Err(ClassifyError::EmptyRuleSet(self.document_type.clone()));
        }
        let t = &self.confidence_thresholds;
        if !(t.low <= t.medium && t.medium <= t.high) {
            tracing::warn!(
                rule_set = %self.document_type,
                "confidence thresholds are not monotonic; bands may overlap"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_rule_set() {
        let cfg = RuleSetConfig::from_toml(
            r#"
            document_type = "caselaw"

            [[patterns]]
            pattern = 'v\.\s'
            weight = 20
            description = "caption"
            "#,
        )
        .unwrap();

        assert!(cfg.enabled);
        assert_eq!(cfg.confidence_thresholds.high, 60);
        assert_eq!(cfg.patterns.len(), 1);
        assert!(!cfg.patterns[0].case_sensitive);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_disabled_flag_parses() {
        let cfg = RuleSetConfig::from_toml(
            r#"
            document_type = "book"
            enabled = false

            [[patterns]]
            pattern = "ISBN"
            weight = 40
            description = "isbn"
            "#,
        )
        .unwrap();
        assert!(!cfg.enabled);
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let cfg = RuleSetConfig::from_toml(
            r#"
            document_type = "screenplay"

            [[patterns]]
            pattern = "FADE IN"
            weight = 50
            description = "slug"
            "#,
        )
        .unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ClassifyError::UnknownDocumentType(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_patterns() {
        let cfg = RuleSetConfig::from_toml(r#"document_type = "caselaw""#).unwrap();
        assert!(matches!(cfg.validate(), Err(ClassifyError::EmptyRuleSet(_))));
    }
}
