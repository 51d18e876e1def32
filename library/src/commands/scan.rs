//! Index ROM directories

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fs_launcher_core::{ChecksumTool, DirectoryFileIndex};

use crate::app::LauncherContext;

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan (default: the Kickstarts directory)
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,
}

/// Execute the scan command
pub fn execute(args: ScanArgs, context: &mut LauncherContext) -> Result<()> {
    let kickstarts_dir = context.directories().kickstarts_dir();
    let dirs = if args.dirs.is_empty() {
        vec![kickstarts_dir.clone()]
    } else {
        args.dirs
    };

    let tool = ChecksumTool::new(Some(kickstarts_dir));
    let index = DirectoryFileIndex::scan(&dirs, &tool);
    for (sha1, path) in index.entries() {
        println!("{}  {}", sha1, path.display());
    }
    println!();
    println!("{} files indexed", index.len());
    Ok(())
}
