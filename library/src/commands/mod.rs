//! Command-line subcommands
//!
//! Each subcommand lives in its own module with an `Args` struct and an
//! `execute` function taking the application context.

pub mod checksum;
pub mod export;
pub mod record;
pub mod scan;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::app::LauncherContext;

/// Configuration subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a configuration file and print the reconciled values
    Show(ConfigFileArgs),

    /// Print the checksum of a configuration file
    Checksum(ConfigFileArgs),

    /// Print the values exchanged with network peers
    Sync(ConfigFileArgs),

    /// Load a configuration file and write it back in canonical form
    Export(export::ExportArgs),

    /// Load a game database record (JSON object)
    Record(record::RecordArgs),

    /// Index ROM directories and list checksums
    Scan(scan::ScanArgs),
}

/// Arguments for commands operating on one configuration file
#[derive(Debug, Args)]
pub struct ConfigFileArgs {
    /// Path to the configuration file (.fs-uae)
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file: PathBuf,
}

impl Command {
    /// Whether the command loads a configuration, which updates the settings.
    pub fn loads_config(&self) -> bool {
        !matches!(self, Self::Scan(_))
    }
}

/// Execute a command
pub fn execute(command: Command, context: &mut LauncherContext) -> Result<()> {
    match command {
        Command::Show(args) => show::execute(args, context),
        Command::Checksum(args) => checksum::execute_checksum(args, context),
        Command::Sync(args) => checksum::execute_sync(args, context),
        Command::Export(args) => export::execute(args, context),
        Command::Record(args) => record::execute(args, context),
        Command::Scan(args) => scan::execute(args, context),
    }
}

/// Load a configuration file and print any warnings.
pub(crate) fn load_config(args: &ConfigFileArgs, context: &mut LauncherContext) -> Result<()> {
    let report = context
        .store
        .load_file(&args.config_file)
        .with_context(|| format!("Failed to load configuration: {}", args.config_file.display()))?;
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}
