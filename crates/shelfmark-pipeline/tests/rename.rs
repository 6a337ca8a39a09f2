//! End-to-end rename pipeline tests over real (temporary) files.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use shelfmark_pipeline::{BatchRunner, PipelineError, RenameOptions, RenameOrchestrator};
use shelfmark_store::Registry;

const GEORGIA_OPINION: &str = "\
Court of Appeals of Georgia

HAMILTON, Appellant v. RENEWED HOPE, INC., Appellee

328 Ga. App. 524

Decided: July 3, 2014

Per curiam.";

const EXPECTED_NAME: &str =
    "c.Ga_Ct_App__2014__HAMILTON-v-RENEWED-HOPE-INC__328_GaApp_524----AAAAA.txt";

const ANNOTATED_STATUTE: &str = "\
Official Code of Georgia Annotated

TITLE 16. CRIMES AND OFFENSES

§ 16-5-1. Murder; felony murder.";

fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn orchestrator() -> RenameOrchestrator {
    RenameOrchestrator::new(RenameOptions::default()).unwrap()
}

#[test]
fn test_end_to_end_rename() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "hamilton_scan.txt", GEORGIA_OPINION);
    let mut registry = Registry::new(":memory:").unwrap();

    let outcome = orchestrator().process(&mut registry, &path).unwrap();

    assert_eq!(outcome.new_name, EXPECTED_NAME);
    assert_eq!(outcome.code, "AAAAA");
    assert!(outcome.renamed);
    assert!(!path.exists());
    assert!(dir.path().join(EXPECTED_NAME).exists());

    // Registry state: document linked, counter advanced, step recorded.
    let doc = registry.get_document_by_code("AAAAA").unwrap().unwrap();
    assert_eq!(doc.current_name, EXPECTED_NAME);
    assert_eq!(doc.original_name, "hamilton_scan.txt");
    assert_eq!(doc.status, "success");
    assert_eq!(registry.peek_code_index().unwrap(), 1);

    let steps = registry.get_processing_steps(doc.id).unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].status, "success");

    // Extracted metadata was persisted with provenance.
    let meta = registry.get_metadata(doc.id).unwrap();
    assert!(meta.iter().any(|m| m.key == "case_name"));
    assert!(meta.iter().all(|m| m.source.as_deref() == Some("document")));
}

#[test]
fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "hamilton_scan.txt", GEORGIA_OPINION);
    let mut registry = Registry::new(":memory:").unwrap();
    let orchestrator = orchestrator();

    let first = orchestrator.process(&mut registry, &path).unwrap();
    let second = orchestrator.process(&mut registry, &first.new_path).unwrap();

    // Same name, no second rename, no second code.
    assert_eq!(second.new_name, EXPECTED_NAME);
    assert_eq!(second.code, "AAAAA");
    assert!(!second.renamed);
    assert_eq!(registry.peek_code_index().unwrap(), 1);
    assert!(dir.path().join(EXPECTED_NAME).exists());
}

#[test]
fn test_legacy_code_is_preserved_and_counter_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "old_scan----QXZAB.txt", GEORGIA_OPINION);
    let mut registry = Registry::new(":memory:").unwrap();

    let outcome = orchestrator().process(&mut registry, &path).unwrap();

    assert_eq!(outcome.code, "QXZAB");
    assert!(outcome.new_name.ends_with("----QXZAB.txt"));
    assert_eq!(registry.peek_code_index().unwrap(), 0);
}

#[test]
fn test_invalid_code_token_gets_fresh_code() {
    let dir = tempfile::tempdir().unwrap();
    // W is not in the alphabet, so the suffix is treated as absent.
    let path = write_file(dir.path(), "old_scan----WWWWW.txt", GEORGIA_OPINION);
    let mut registry = Registry::new(":memory:").unwrap();

    let outcome = orchestrator().process(&mut registry, &path).unwrap();

    assert_eq!(outcome.code, "AAAAA");
    assert!(outcome.new_name.ends_with("----AAAAA.txt"));
    assert_eq!(registry.peek_code_index().unwrap(), 1);
}

#[test]
fn test_rename_conflict_is_fatal_and_releases_the_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "hamilton_scan.txt", GEORGIA_OPINION);
    // Another file already occupies the target name.
    write_file(dir.path(), EXPECTED_NAME, "squatter");
    let mut registry = Registry::new(":memory:").unwrap();

    let err = orchestrator().process(&mut registry, &path).unwrap_err();
    assert!(matches!(err, PipelineError::RenameConflict(_)));

    // Original untouched, minted code released for reissue, failure recorded.
    assert!(path.exists());
    assert!(!registry.code_exists("AAAAA").unwrap());
    assert_eq!(registry.peek_code_index().unwrap(), 0);
    let doc = registry.get_document_by_path(&path).unwrap().unwrap();
    assert_eq!(doc.status, "failed");
    let steps = registry.get_processing_steps(doc.id).unwrap();
    assert!(steps.iter().any(|s| s.status == "failed"));
}

#[test]
fn test_retry_after_commit_reuses_the_committed_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "hamilton_scan.txt", GEORGIA_OPINION);
    let mut registry = Registry::new(":memory:").unwrap();

    // A previous run committed a code but crashed before the rename landed.
    let id = registry.register_document(&path, None, None).unwrap();
    registry.allocate_code("AAAAA").unwrap();
    registry.commit_minted_code("AAAAA", id).unwrap();

    let outcome = orchestrator().process(&mut registry, &path).unwrap();

    // The retry completes the rename with the committed code; no second
    // code is minted for the document.
    assert_eq!(outcome.code, "AAAAA");
    assert_eq!(outcome.new_name, EXPECTED_NAME);
    assert!(outcome.renamed);
    assert!(dir.path().join(EXPECTED_NAME).exists());

    let doc = registry.get_document_by_id(id).unwrap().unwrap();
    assert_eq!(doc.unique_code.as_deref(), Some("AAAAA"));
    assert_eq!(doc.status, "success");
    assert!(!registry.code_exists("AAAAB").unwrap());
    assert_eq!(registry.peek_code_index().unwrap(), 1);

    let stats = registry.get_statistics().unwrap();
    assert_eq!(stats.total_documents, 1);
    assert_eq!(stats.code_status.get("in_use"), Some(&1));
}

#[test]
fn test_failure_before_registration_still_leaves_a_trace() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "lunch_notes.txt", "lunch notes, nothing legal here");
    let mut registry = Registry::new(":memory:").unwrap();

    let err = orchestrator().process(&mut registry, &path).unwrap_err();
    assert!(matches!(err, PipelineError::ClassificationUnknown(_)));

    // The document is registered on the way out so the failed step has
    // somewhere to land.
    let doc = registry.get_document_by_path(&path).unwrap().unwrap();
    assert_eq!(doc.status, "failed");
    let steps = registry.get_processing_steps(doc.id).unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].status, "failed");
    assert!(steps[0].error_message.is_some());
}

#[test]
fn test_dry_run_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "hamilton_scan.txt", GEORGIA_OPINION);
    let mut registry = Registry::new(":memory:").unwrap();

    let options = RenameOptions {
        dry_run: true,
        ..RenameOptions::default()
    };
    let outcome = RenameOrchestrator::new(options)
        .unwrap()
        .process(&mut registry, &path)
        .unwrap();

    assert_eq!(outcome.new_name, EXPECTED_NAME);
    assert!(!outcome.renamed);
    // File still in place, counter unmoved, code not reserved.
    assert!(path.exists());
    assert!(!dir.path().join(EXPECTED_NAME).exists());
    assert_eq!(registry.peek_code_index().unwrap(), 0);
    assert!(!registry.code_exists("AAAAA").unwrap());
}

#[test]
fn test_statute_without_metadata_fails_with_missing_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ocga_title_16.txt", ANNOTATED_STATUTE);
    let mut registry = Registry::new(":memory:").unwrap();

    let err = orchestrator().process(&mut registry, &path).unwrap_err();
    assert!(matches!(err, PipelineError::MetadataMissing(f) if f == "case_name"));
    assert!(path.exists());
}

#[test]
fn test_batch_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = Registry::new(":memory:").unwrap();

    // Five good documents, three that cannot be processed.
    for i in 0..5 {
        write_file(dir.path(), &format!("good_{i}.txt"), GEORGIA_OPINION);
    }
    write_file(dir.path(), "empty.txt", "   ");
    write_file(dir.path(), "gibberish.txt", "lunch notes, nothing legal here");
    write_file(dir.path(), "statute.txt", ANNOTATED_STATUTE);

    let runner = BatchRunner::new(RenameOptions::default()).unwrap();
    let cancel = AtomicBool::new(false);
    let summary = runner.run(&mut registry, dir.path(), &cancel).unwrap();

    assert_eq!(summary.total, 8);
    assert_eq!(summary.succeeded, 5);
    assert_eq!(summary.failed, 3);
    assert!(!summary.is_failure());
    assert!(!summary.cancelled);

    // Each success got its own code; codes are sequential mints.
    let codes: Vec<_> = summary
        .files
        .iter()
        .filter_map(|f| f.code.clone())
        .collect();
    assert_eq!(codes, vec!["AAAAA", "AAAAB", "AAAAC", "AAAAD", "AAAAE"]);
    assert_eq!(registry.peek_code_index().unwrap(), 5);
}

#[test]
fn test_cancel_stops_between_documents() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = Registry::new(":memory:").unwrap();
    write_file(dir.path(), "a.txt", GEORGIA_OPINION);
    write_file(dir.path(), "b.txt", GEORGIA_OPINION);

    let runner = BatchRunner::new(RenameOptions::default()).unwrap();
    let cancel = AtomicBool::new(true);
    let summary = runner.run(&mut registry, dir.path(), &cancel).unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.succeeded + summary.failed, 0);
}
