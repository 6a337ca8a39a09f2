//! Error types for rule loading and classification.

use thiserror::Error;

/// Errors raised while loading rule sets or classifying.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A rule pattern failed to compile
    #[error("invalid pattern {pattern:?} in rule set {rule_set:?}: {source}")]
    InvalidPattern {
        /// The offending regex source
        pattern: String,
        /// Rule set the pattern belongs to
        rule_set: String,
        /// Compile error from the regex crate
        source: regex::Error,
    },

    /// Rule set file is missing its document type tag
    #[error("rule set {0:?} does not name a known document type")]
    UnknownDocumentType(String),

    /// A rule set declared no patterns
    #[error("rule set {0:?} has no patterns")]
    EmptyRuleSet(String),

    /// No enabled rule sets were found at all
    #[error("no enabled classification rule sets found")]
    NoRuleSets,

    /// TOML parsing error
    #[error("rule file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading rule files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
