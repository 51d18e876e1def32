//! Export a configuration in canonical form

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::{ConfigFileArgs, load_config};
use crate::app::LauncherContext;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: ConfigFileArgs,

    /// Output path
    #[arg(value_name = "OUT_FILE")]
    pub output: PathBuf,
}

/// Execute the export command
pub fn execute(args: ExportArgs, context: &mut LauncherContext) -> Result<()> {
    load_config(&args.input, context)?;
    context
        .store
        .save_file(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Exported to {}", args.output.display());
    Ok(())
}
