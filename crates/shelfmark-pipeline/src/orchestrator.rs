//! Per-document rename orchestration.
//!
//! Stages run strictly in order, none skipped:
//!
//! 1. extract text
//! 2. classify
//! 3. extract metadata
//! 4. allocate code (discovery or mint)
//! 5. register document + persist metadata
//! 6. commit code (minted codes advance the counter here)
//! 7. rename on disk
//! 8. record outcome
//!
//! Failures after allocation release a minted, uncommitted code; a
//! registered document never lacks a recorded failure step. Re-running on
//! an already-renamed file discovers its code and rebuilds the same name,
//! so the rename is a no-op.

use std::path::{Path, PathBuf};

use shelfmark_classify::Classifier;
use shelfmark_domain::{DocumentMetadata, DocumentType, ProcessingStatus};
use shelfmark_extract::{MetadataExtractor, Strategy, TextExtractor};
use shelfmark_store::Registry;

use crate::allocator::{obtain_code, AllocatedCode};
use crate::error::PipelineError;
use crate::formatter::FilenameFormatter;

/// Step order used in the processing_steps history.
const STEP_RENAME: i64 = 1;

/// Options for a rename run.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// PDF text extraction strategy
    pub strategy: Strategy,
    /// Full workflow minus rename and code commit
    pub dry_run: bool,
    /// Pages to read for metadata; `None` reads the whole document
    pub max_pages: Option<usize>,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Fast,
            dry_run: false,
            // The caption block sits in the first pages; reading more just
            // slows extraction down and invites margin-date noise.
            max_pages: Some(3),
        }
    }
}

/// Result of a successful (or dry-run) rename.
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    /// Registry id of the document
    pub document_id: i64,
    /// Path before the rename
    pub old_path: PathBuf,
    /// Path after the rename (prospective in dry-run mode)
    pub new_path: PathBuf,
    /// The standardized filename
    pub new_name: String,
    /// The committed (or discovered) shelfmark code
    pub code: String,
    /// Classified type
    pub document_type: DocumentType,
    /// Normalized classification confidence in `[0, 1]`
    pub confidence: f64,
    /// False when the file already carried its standardized name, or in
    /// dry-run mode
    pub renamed: bool,
}

/// Drives one document through the full rename workflow.
pub struct RenameOrchestrator {
    classifier: Classifier,
    metadata: MetadataExtractor,
    text: TextExtractor,
    formatter: FilenameFormatter,
    options: RenameOptions,
}

impl RenameOrchestrator {
    /// Build an orchestrator with embedded classification and extraction
    /// rules.
    pub fn new(options: RenameOptions) -> Result<Self, PipelineError> {
        Ok(Self {
            classifier: Classifier::from_embedded()?,
            metadata: MetadataExtractor::new()?,
            text: TextExtractor::new(options.strategy),
            formatter: FilenameFormatter::new(),
            options,
        })
    }

    /// Process one document end to end.
    ///
    /// On failure, bookkeeping runs before the error is returned: a failed
    /// step is recorded against the document if it was registered, and its
    /// status is set to failed.
    pub fn process(
        &self,
        registry: &mut Registry,
        path: &Path,
    ) -> Result<RenameOutcome, PipelineError> {
        match self.run(registry, path) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.record_failure(registry, path, &err);
                Err(err)
            }
        }
    }

    fn run(&self, registry: &mut Registry, path: &Path) -> Result<RenameOutcome, PipelineError> {
        let filename = file_name(path);

        // Stage 1: text
        let extracted = self.text.extract(path, self.options.max_pages)?;
        tracing::debug!(file = %path.display(), chars = extracted.text.len(), "extracted text");

        // Stage 2: classification
        let classification = self.classifier.classify(&extracted.text);
        if !classification.is_classified() {
            return Err(PipelineError::ClassificationUnknown(filename));
        }
        let document_type = classification.document_type;
        tracing::debug!(
            file = %path.display(),
            document_type = document_type.as_str(),
            confidence = classification.confidence,
            "classified"
        );

        // Stage 3: metadata
        let metadata = self.metadata.extract(document_type, &extracted.text);

        // Stage 4: code, before anything touches the filesystem. A document
        // whose code was committed but whose rename never landed keeps that
        // code on retry; minting again would leave two committed codes.
        let committed = registry
            .get_document_by_path(path)?
            .and_then(|doc| doc.unique_code);
        let code = match committed {
            Some(existing) => {
                tracing::debug!(code = %existing, "reusing previously committed code");
                AllocatedCode::Discovered(existing)
            }
            None => obtain_code(registry, &filename)?,
        };

        // Stages 5-8; a minted code that never got committed is released.
        let outcome = self.after_allocation(
            registry,
            path,
            document_type,
            classification.confidence,
            &metadata,
            &code,
        );
        if outcome.is_err() && code.is_minted() {
            if let Err(release_err) = registry.release_code(code.as_str()) {
                tracing::warn!(code = code.as_str(), error = %release_err, "failed to release code");
            }
        }
        outcome
    }

    fn after_allocation(
        &self,
        registry: &mut Registry,
        path: &Path,
        document_type: DocumentType,
        confidence: f64,
        metadata: &DocumentMetadata,
        code: &AllocatedCode,
    ) -> Result<RenameOutcome, PipelineError> {
        // Stage 5: register (idempotent on re-runs)
        let document_id = match registry.get_document_by_path(path)? {
            Some(doc) => {
                if doc.document_type.as_deref() != Some(document_type.as_str()) {
                    registry.update_document_type(doc.id, document_type)?;
                }
                doc.id
            }
            None => {
                let id = registry.register_document(path, Some(document_type), None)?;
                for field in metadata.fields.values() {
                    registry.add_metadata(id, field)?;
                }
                id
            }
        };

        // Stage 6: the standardized name, code embedded before any rename
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let new_name = self
            .formatter
            .format_filename(metadata, code.as_str(), extension)?;
        let new_path = path.parent().unwrap_or_else(|| Path::new("")).join(&new_name);

        let already_named = new_path == path;
        if !already_named && new_path.exists() {
            return Err(PipelineError::RenameConflict(new_path));
        }

        if self.options.dry_run {
            // Leave no trace in the code ledger or on disk.
            if code.is_minted() {
                registry.release_code(code.as_str())?;
            }
            registry.record_processing_step(
                document_id,
                "rename",
                STEP_RENAME,
                ProcessingStatus::Skipped,
                None,
            )?;
            tracing::info!(file = %path.display(), target = %new_name, "dry run, no changes made");
            return Ok(RenameOutcome {
                document_id,
                old_path: path.to_path_buf(),
                new_path,
                new_name,
                code: code.as_str().to_string(),
                document_type,
                confidence,
                renamed: false,
            });
        }

        // Stage 7: commit the code, then rename. Committing first means a
        // rename failure leaves a registered document with its code and a
        // failed step, never a renamed file with no registered code.
        match code {
            AllocatedCode::Minted(c) => registry.commit_minted_code(c, document_id)?,
            AllocatedCode::Discovered(c) => registry.commit_discovered_code(c, document_id)?,
        }

        if !already_named {
            std::fs::rename(path, &new_path)?;
            registry.update_document_name(document_id, &new_path)?;
            tracing::info!(from = %path.display(), to = %new_name, "renamed");
        } else {
            tracing::debug!(file = %path.display(), "already standardized, nothing to rename");
        }

        // Stage 8: record
        registry.update_document_status(document_id, ProcessingStatus::Success)?;
        registry.record_processing_step(
            document_id,
            "rename",
            STEP_RENAME,
            ProcessingStatus::Success,
            None,
        )?;

        Ok(RenameOutcome {
            document_id,
            old_path: path.to_path_buf(),
            new_path,
            new_name,
            code: code.as_str().to_string(),
            document_type,
            confidence,
            renamed: !already_named,
        })
    }

    /// Best-effort failure bookkeeping; never masks the original error.
    ///
    /// Documents that fail before registration (extraction, classification)
    /// are registered here so the failed step has somewhere to land.
    fn record_failure(&self, registry: &mut Registry, path: &Path, err: &PipelineError) {
        let document_id = match registry.get_document_by_path(path) {
            Ok(Some(doc)) => doc.id,
            Ok(None) => match registry.register_document(path, None, None) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "failed to register failed document");
                    return;
                }
            },
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to look up failed document");
                return;
            }
        };
        let message = err.to_string();
        if let Err(e) = registry.record_processing_step(
            document_id,
            "rename",
            STEP_RENAME,
            ProcessingStatus::Failed,
            Some(&message),
        ) {
            tracing::warn!(document_id, error = %e, "failed to record failure step");
        }
        if let Err(e) = registry.update_document_status(document_id, ProcessingStatus::Failed) {
            tracing::warn!(document_id, error = %e, "failed to update document status");
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
