//! FS Launcher configuration tool
//!
//! # Commands
//!
//! - `fs-launcher show <file>` - Print a reconciled configuration
//! - `fs-launcher checksum <file>` - Print the configuration checksum
//! - `fs-launcher sync <file>` - Print the values agreed on with network peers
//! - `fs-launcher export <file> <out>` - Write a configuration in canonical form
//! - `fs-launcher record <json>` - Load a game database record
//! - `fs-launcher scan [dir...]` - Index ROM directories

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fs_launcher::app::LauncherContext;
use fs_launcher::commands::{self, Command};

/// FS Launcher configuration tool
#[derive(Parser)]
#[command(name = "fs-launcher")]
#[command(about = "Inspect and convert FS launcher configurations")]
#[command(version)]
struct Cli {
    /// Base directory holding Floppies, CD-ROMs, Hard Drives and Kickstarts
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut context = LauncherContext::new(cli.base_dir)?;
    let loads_config = cli.command.loads_config();
    commands::execute(cli.command, &mut context)?;

    if loads_config && let Err(e) = context.save_settings() {
        tracing::warn!("{:#}", e);
    }
    Ok(())
}
