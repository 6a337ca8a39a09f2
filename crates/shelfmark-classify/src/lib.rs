//! Shelfmark Classifier
//!
//! Rule-driven document type classification. Each enabled document type
//! carries a set of weighted regex patterns loaded from TOML; a text is
//! scored against every set and the best score wins, mapped to a confidence
//! band (HIGH/MEDIUM/LOW) or `Unknown` when too weak.
//!
//! ## Weight conventions
//!
//! Weights are plain signed integers; the scoring loop has no special cases.
//! By convention:
//! - definitive "trump card" indicators: 50-100 (one match decides the type)
//! - strong indicators: 20-40
//! - weak indicators: 3-10
//! - light contraindications: around -5
//!
//! Trump cards exist so that one unambiguous signal (an official code
//! marker, a DOI) overrides many incidental ones (case citations quoted
//! inside an annotated statute).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classifier;
pub mod config;
pub mod error;

pub use classifier::{Classifier, TypeScore};
pub use config::{ConfidenceThresholds, PatternRule, RuleSetConfig};
pub use error::ClassifyError;
