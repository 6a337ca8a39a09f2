//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelfmark_extract::Strategy;

/// Shelfmark - classify, register, and rename legal document files.
#[derive(Debug, Parser)]
#[command(name = "shelfmark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Registry database path
    #[arg(short, long, global = true)]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (new names only)
    Quiet,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(value: CliFormat) -> Self {
        match value {
            CliFormat::Table => Self::Table,
            CliFormat::Json => Self::Json,
            CliFormat::Quiet => Self::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rename every supported document under a folder
    Rename(RenameArgs),

    /// Show registry statistics
    Stats,

    /// Export the registry to a JSON file
    Export(ExportArgs),
}

/// Arguments for the rename command.
#[derive(Debug, Parser)]
pub struct RenameArgs {
    /// Folder to scan recursively for documents
    pub folder: PathBuf,

    /// PDF text extraction strategy
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Fast)]
    pub strategy: StrategyArg,

    /// Run the full workflow without renaming or committing codes
    #[arg(long)]
    pub dry_run: bool,

    /// Pages to read for metadata extraction
    #[arg(long, default_value_t = 3)]
    pub max_pages: usize,
}

/// Extraction strategy flag.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StrategyArg {
    /// Default pdftotext output
    Fast,
    /// Layout-preserving pdftotext output (old two-column scans)
    Layout,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Fast => Strategy::Fast,
            StrategyArg::Layout => Strategy::Layout,
        }
    }
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Output JSON file path
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_args_parse() {
        let cli = Cli::try_parse_from([
            "shelfmark", "rename", "/docs", "--strategy", "layout", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Rename(args) => {
                assert_eq!(args.folder, PathBuf::from("/docs"));
                assert!(matches!(args.strategy, StrategyArg::Layout));
                assert!(args.dry_run);
                assert_eq!(args.max_pages, 3);
            }
            _ => panic!("expected rename command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "shelfmark",
            "--no-color",
            "--registry",
            "/tmp/reg.db",
            "stats",
        ])
        .unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.registry, Some(PathBuf::from("/tmp/reg.db")));
    }
}
