//! Batch runs over a folder tree.
//!
//! Files are discovered recursively and processed in lexicographic order.
//! Each document is isolated: a failure is recorded in the summary and the
//! batch moves on. Cancellation is checked between documents, so an
//! in-flight document always runs to a terminal state first.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use shelfmark_extract::TextExtractor;
use shelfmark_store::Registry;
use walkdir::WalkDir;

use crate::error::PipelineError;
use crate::orchestrator::{RenameOptions, RenameOrchestrator};

/// Per-file result in a batch summary.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Path as discovered
    pub path: PathBuf,
    /// New filename on success
    pub new_name: Option<String>,
    /// Code committed or discovered, on success
    pub code: Option<String>,
    /// Error text on failure
    pub error: Option<String>,
}

impl FileOutcome {
    /// True when the file processed without error.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of one batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Files discovered
    pub total: usize,
    /// Files processed without error
    pub succeeded: usize,
    /// Files that failed
    pub failed: usize,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// True when a cancel request stopped the run early
    pub cancelled: bool,
    /// Per-file outcomes in processing order
    pub files: Vec<FileOutcome>,
}

impl BatchSummary {
    /// True when the run found nothing or nothing succeeded.
    pub fn is_failure(&self) -> bool {
        self.total == 0 || (self.failed > 0 && self.succeeded == 0)
    }
}

/// Runs the rename pipeline over every supported file under a folder.
pub struct BatchRunner {
    orchestrator: RenameOrchestrator,
}

impl BatchRunner {
    /// Build a runner with the given options.
    pub fn new(options: RenameOptions) -> Result<Self, PipelineError> {
        Ok(Self {
            orchestrator: RenameOrchestrator::new(options)?,
        })
    }

    /// Discover supported files under `folder`, sorted lexicographically.
    pub fn discover(folder: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(folder)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| TextExtractor::supports(path))
            .collect();
        files.sort();
        files
    }

    /// Process every supported file under `folder`.
    ///
    /// `cancel` is checked between documents; setting it stops the run
    /// after the current document reaches a terminal state.
    pub fn run(
        &self,
        registry: &mut Registry,
        folder: &Path,
        cancel: &AtomicBool,
    ) -> Result<BatchSummary, PipelineError> {
        let started = Instant::now();
        let files = Self::discover(folder);
        tracing::info!(folder = %folder.display(), files = files.len(), "starting batch");

        let total = files.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut cancelled = false;

        for path in files {
            if cancel.load(Ordering::Relaxed) {
                tracing::warn!("batch cancelled");
                cancelled = true;
                break;
            }

            let outcome = match self.orchestrator.process(registry, &path) {
                Ok(result) => FileOutcome {
                    path,
                    new_name: Some(result.new_name),
                    code: Some(result.code),
                    error: None,
                },
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "document failed");
                    FileOutcome {
                        path,
                        new_name: None,
                        code: None,
                        error: Some(err.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        let failed = outcomes.len() - succeeded;
        let summary = BatchSummary {
            total,
            succeeded,
            failed,
            duration: started.elapsed(),
            cancelled,
            files: outcomes,
        };
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "text").unwrap();
        std::fs::write(dir.path().join("a.pdf"), "pdf").unwrap();
        std::fs::write(dir.path().join("notes.docx"), "nope").unwrap();
        std::fs::write(dir.path().join("sub/c.txt"), "text").unwrap();

        let files = BatchRunner::discover(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn test_empty_folder_is_a_failed_summary() {
        let summary = BatchSummary {
            total: 0,
            succeeded: 0,
            failed: 0,
            duration: Duration::ZERO,
            cancelled: false,
            files: Vec::new(),
        };
        assert!(summary.is_failure());
    }

    #[test]
    fn test_partial_success_is_not_a_failure() {
        let summary = BatchSummary {
            total: 2,
            succeeded: 1,
            failed: 1,
            duration: Duration::ZERO,
            cancelled: false,
            files: Vec::new(),
        };
        assert!(!summary.is_failure());
    }
}
