//! Shelfmark - classify, register, and rename legal document files.

use std::fs;

use anyhow::Context;
use clap::Parser;
use shelfmark_cli::commands;
use shelfmark_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    // Load config; create a default one on first run unless an explicit
    // config path was given.
    let config = match &cli.config {
        Some(path) => Config::load(Some(path))
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(None).unwrap_or_else(|_| {
            let cfg = Config::default();
            cfg.save().ok();
            cfg
        }),
    };

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let registry_path = config.resolve_registry_path(cli.registry.as_deref())?;
    if let Some(parent) = registry_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let code = match cli.command {
        Command::Rename(args) => commands::execute_rename(args, &registry_path, &formatter)?,
        Command::Stats => {
            commands::execute_stats(&registry_path, &formatter)?;
            0
        }
        Command::Export(args) => {
            commands::execute_export(args, &registry_path, &formatter)?;
            0
        }
    };

    Ok(code)
}
