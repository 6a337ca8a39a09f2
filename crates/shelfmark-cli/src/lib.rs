//! Shelfmark CLI library.
//!
//! Command-line front end for the rename pipeline: batch renames, registry
//! statistics, and JSON export, with table/json/quiet output formats.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
