//! Stats command implementation.

use std::path::Path;

use crate::error::Result;
use crate::output::Formatter;
use shelfmark_store::Registry;

/// Execute the stats command.
pub fn execute_stats(registry_path: &Path, formatter: &Formatter) -> Result<()> {
    let registry = Registry::new(registry_path)?;
    let stats = registry.get_statistics()?;
    println!("{}", formatter.format_statistics(&stats)?);
    Ok(())
}
