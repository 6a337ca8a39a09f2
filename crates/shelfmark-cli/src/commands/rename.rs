//! Rename command implementation.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use crate::cli::RenameArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use shelfmark_pipeline::{BatchRunner, RenameOptions};
use shelfmark_store::Registry;

/// Execute the rename command.
///
/// Returns the process exit code: 0 when at least one document renamed,
/// 2 when the folder held nothing renameable or everything failed.
pub fn execute_rename(
    args: RenameArgs,
    registry_path: &Path,
    formatter: &Formatter,
) -> Result<i32> {
    if !args.folder.is_dir() {
        return Err(CliError::Config(format!(
            "Not a directory: {}",
            args.folder.display()
        )));
    }

    let mut registry = Registry::new(registry_path)?;
    let options = RenameOptions {
        strategy: args.strategy.into(),
        dry_run: args.dry_run,
        max_pages: Some(args.max_pages),
    };
    let runner = BatchRunner::new(options)?;

    let cancel = AtomicBool::new(false);
    let summary = runner.run(&mut registry, &args.folder, &cancel)?;

    if args.dry_run {
        println!("{}", formatter.info("Dry run: no files were renamed"));
    }
    println!("{}", formatter.format_summary(&summary)?);

    Ok(if summary.is_failure() { 2 } else { 0 })
}
