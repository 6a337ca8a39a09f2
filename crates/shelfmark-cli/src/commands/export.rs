//! Export command implementation.

use std::path::Path;

use crate::cli::ExportArgs;
use crate::error::Result;
use crate::output::Formatter;
use shelfmark_store::Registry;

/// Execute the export command.
pub fn execute_export(args: ExportArgs, registry_path: &Path, formatter: &Formatter) -> Result<()> {
    let registry = Registry::new(registry_path)?;
    registry.export_json(&args.output)?;
    println!(
        "{}",
        formatter.success(&format!("Registry exported to {}", args.output.display()))
    );
    Ok(())
}
