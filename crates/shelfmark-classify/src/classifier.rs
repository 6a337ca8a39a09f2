//! Weighted pattern classifier over compiled rule sets.

use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use shelfmark_domain::{Classification, ConfidenceLevel, DocumentType};

use crate::config::{ConfidenceThresholds, RuleSetConfig};
use crate::error::ClassifyError;

/// Default rule sets shipped with the crate, in declaration order.
/// Order matters: equal best scores resolve to the earliest set.
const EMBEDDED_RULESETS: &[&str] = &[
    include_str!("rulesets/caselaw.toml"),
    include_str!("rulesets/statute.toml"),
    include_str!("rulesets/article.toml"),
];

/// One pattern with its compiled regex.
#[derive(Debug)]
struct CompiledRule {
    regex: Regex,
    weight: i64,
    description: String,
}

/// One document type's compiled rule set.
#[derive(Debug)]
struct CompiledRuleSet {
    document_type: DocumentType,
    thresholds: ConfidenceThresholds,
    rules: Vec<CompiledRule>,
}

impl CompiledRuleSet {
    fn compile(config: &RuleSetConfig) -> Result<Self, ClassifyError> {
        config.validate()?;
        let document_type = config.document_type()?;

        let mut rules = Vec::with_capacity(config.patterns.len());
        for pattern in &config.patterns {
            let regex = RegexBuilder::new(&pattern.pattern)
                .case_insensitive(!pattern.case_sensitive)
                .build()
                .map_err(|source| ClassifyError::InvalidPattern {
                    pattern: pattern.pattern.clone(),
                    rule_set: config.document_type.clone(),
                    source,
                })?;
            rules.push(CompiledRule {
                regex,
                weight: pattern.weight as i64,
                description: pattern.description.clone(),
            });
        }

        Ok(Self {
            document_type,
            thresholds: config.confidence_thresholds,
            rules,
        })
    }

    /// Sum the weights of every matching rule; collect match descriptions.
    fn score(&self, text: &str) -> (i64, Vec<String>) {
        let mut score = 0;
        let mut indicators = Vec::new();
        for rule in &self.rules {
            if rule.regex.is_match(text) {
                score += rule.weight;
                indicators.push(rule.description.clone());
            }
        }
        (score, indicators)
    }
}

/// Per-type score breakdown returned by [`Classifier::scores_for`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeScore {
    /// Document type this score is for
    pub document_type: DocumentType,
    /// Raw weighted sum
    pub score: i64,
    /// Descriptions of the rules that matched
    pub indicators: Vec<String>,
}

/// Rule-driven document classifier.
///
/// Rule sets are compiled once at construction and the classifier is a pure
/// function thereafter; [`Classifier::reload_from_dir`] exists for
/// development and tests.
#[derive(Debug)]
pub struct Classifier {
    rule_sets: Vec<CompiledRuleSet>,
}

impl Classifier {
    /// Build from the embedded default rule sets.
    pub fn from_embedded() -> Result<Self, ClassifyError> {
        let configs = EMBEDDED_RULESETS
            .iter()
            .map(|text| RuleSetConfig::from_toml(text))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_configs(configs)
    }

    /// Build from explicit configs. Disabled sets are skipped; declaration
    /// order is preserved for deterministic tie-breaking.
    pub fn from_configs(configs: Vec<RuleSetConfig>) -> Result<Self, ClassifyError> {
        let mut rule_sets = Vec::new();
        for config in &configs {
            if !config.enabled {
                tracing::debug!(rule_set = %config.document_type, "skipping disabled rule set");
                continue;
            }
            rule_sets.push(CompiledRuleSet::compile(config)?);
        }

        if rule_sets.is_empty() {
            return Err(ClassifyError::NoRuleSets);
        }

        tracing::debug!(count = rule_sets.len(), "compiled classification rule sets");
        Ok(Self { rule_sets })
    }

    /// Build from every `*.toml` file in a directory, sorted by filename so
    /// the declaration order (and tie-break) is reproducible across runs.
    pub fn from_dir(dir: &Path) -> Result<Self, ClassifyError> {
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let mut configs = Vec::new();
        for path in paths {
            let text = fs::read_to_string(&path)?;
            configs.push(RuleSetConfig::from_toml(&text)?);
        }
        Self::from_configs(configs)
    }

    /// Replace the compiled rule sets with the contents of a directory.
    pub fn reload_from_dir(&mut self, dir: &Path) -> Result<(), ClassifyError> {
        *self = Self::from_dir(dir)?;
        Ok(())
    }

    /// The enabled document types, in declaration order.
    pub fn document_types(&self) -> Vec<DocumentType> {
        self.rule_sets.iter().map(|s| s.document_type).collect()
    }

    /// Classify a text against every enabled rule set.
    ///
    /// Scores each set, takes the best raw score (first-declared set wins a
    /// tie), maps it to a confidence band, and returns `Unknown` when the
    /// score falls below the set's low threshold.
    pub fn classify(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification::unknown("No text to classify");
        }

        // Strictly-greater comparison keeps the first-declared set on ties.
        let mut best: Option<(&CompiledRuleSet, i64, Vec<String>)> = None;
        for set in &self.rule_sets {
            let (score, indicators) = set.score(text);
            tracing::trace!(document_type = %set.document_type, score, "scored rule set");
            if best.as_ref().is_none_or(|(_, best_score, _)| score > *best_score) {
                best = Some((set, score, indicators));
            }
        }

        let Some((set, score, indicators)) = best else {
            return Classification::unknown("No patterns matched");
        };

        if score <= 0 {
            return Classification::unknown("No patterns matched");
        }

        let confidence = Classification::normalize(score as f64);
        let level = band(score, &set.thresholds);

        if level.is_none() {
            let mut indicators = indicators;
            indicators.push(format!("Score {} below minimum threshold", score));
            return Classification {
                document_type: DocumentType::Unknown,
                confidence,
                level: None,
                indicators,
            };
        }

        tracing::debug!(
            document_type = %set.document_type,
            score,
            confidence,
            "classified document"
        );

        Classification {
            document_type: set.document_type,
            confidence,
            level,
            indicators,
        }
    }

    /// Score every enabled type without picking a winner (debug/analysis).
    pub fn scores_for(&self, text: &str) -> Vec<TypeScore> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.rule_sets
            .iter()
            .map(|set| {
                let (score, indicators) = set.score(text);
                TypeScore {
                    document_type: set.document_type,
                    score,
                    indicators,
                }
            })
            .collect()
    }
}

fn band(score: i64, thresholds: &ConfidenceThresholds) -> Option<ConfidenceLevel> {
    if score >= thresholds.high {
        Some(ConfidenceLevel::High)
    } else if score >= thresholds.medium {
        Some(ConfidenceLevel::Medium)
    } else if score >= thresholds.low {
        Some(ConfidenceLevel::Low)
    } else {
        None
    }
}
