//! Shelfmark Rename Pipeline
//!
//! Orchestrates the full document workflow: extract text, classify, extract
//! metadata, allocate a shelfmark code, register, rename, record. The code
//! is allocated and embedded in the target filename *before* the rename, so
//! two "Smith v. Jones" opinions can never fight over one name.
//!
//! Modules:
//!
//! - [`allocator`]: code discovery (legacy `----XXXXX` suffixes) and minting
//! - [`formatter`]: metadata -> standardized filename
//! - [`orchestrator`]: the per-document stage machine
//! - [`batch`]: recursive folder runs with per-file failure isolation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod allocator;
pub mod batch;
pub mod error;
pub mod formatter;
pub mod orchestrator;

pub use allocator::{obtain_code, AllocatedCode};
pub use batch::{BatchRunner, BatchSummary, FileOutcome};
pub use error::PipelineError;
pub use formatter::FilenameFormatter;
pub use orchestrator::{RenameOptions, RenameOrchestrator, RenameOutcome};
