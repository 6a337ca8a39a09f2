//! Classification result produced by scoring text against every rule set.

use crate::document::{ConfidenceLevel, DocumentType};

/// Raw score divided by this scale gives the normalized confidence.
/// Scores above the scale (many patterns matching) cap at 1.0.
pub const CONFIDENCE_SCALE: f64 = 100.0;

/// Result of classifying one text against all enabled rule sets.
///
/// Created fresh per classification call and never mutated. The matched
/// indicator descriptions are kept for auditability: they explain *why* a
/// document landed on a given type.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Winning document type (`Unknown` when below the low threshold)
    pub document_type: DocumentType,

    /// Normalized confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Confidence band the raw score fell into, if any
    pub level: Option<ConfidenceLevel>,

    /// Descriptions of the rules that matched for the winning type
    pub indicators: Vec<String>,
}

impl Classification {
    /// Classification for empty or unmatchable text.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            document_type: DocumentType::Unknown,
            confidence: 0.0,
            level: None,
            indicators: vec![reason.into()],
        }
    }

    /// Normalize a raw weighted score to [0.0, 1.0].
    pub fn normalize(raw_score: f64) -> f64 {
        (raw_score / CONFIDENCE_SCALE).min(1.0).max(0.0)
    }

    /// True when the winning type is something other than `Unknown`.
    pub fn is_classified(&self) -> bool {
        self.document_type != DocumentType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_has_zero_confidence() {
        let c = Classification::unknown("no text");
        assert_eq!(c.document_type, DocumentType::Unknown);
        assert_eq!(c.confidence, 0.0);
        assert!(!c.is_classified());
        assert_eq!(c.indicators, vec!["no text".to_string()]);
    }

    #[test]
    fn test_normalize_caps_at_one() {
        assert_eq!(Classification::normalize(250.0), 1.0);
        assert_eq!(Classification::normalize(50.0), 0.5);
        assert_eq!(Classification::normalize(-10.0), 0.0);
    }
}
