//! Configuration identity: checksum and sync set

use anyhow::Result;

use super::{ConfigFileArgs, load_config};
use crate::app::LauncherContext;

/// Execute the checksum command
pub fn execute_checksum(args: ConfigFileArgs, context: &mut LauncherContext) -> Result<()> {
    load_config(&args, context)?;
    println!("{}", context.store.checksum());
    Ok(())
}

/// Execute the sync command
pub fn execute_sync(args: ConfigFileArgs, context: &mut LauncherContext) -> Result<()> {
    load_config(&args, context)?;
    for (key, value) in context.store.sync_items() {
        println!("{} = {}", key, value);
    }
    Ok(())
}
