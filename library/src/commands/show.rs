//! Show a reconciled configuration

use anyhow::Result;
use fs_launcher_core::Settings;

use super::{ConfigFileArgs, load_config};
use crate::app::LauncherContext;

/// Execute the show command
pub fn execute(args: ConfigFileArgs, context: &mut LauncherContext) -> Result<()> {
    load_config(&args, context)?;
    // Show the devices a launch on this machine would use
    context.store.update_joystick_ports();

    let store = &context.store;
    println!("Configuration: {}", context.settings.get("config_name"));
    println!("Base name:     {}", context.settings.get("config_base"));
    println!("Model:         {}", store.amiga_model().title);
    println!("Checksum:      {}", store.checksum());
    println!(
        "Floppy drives: {}",
        store.get_parsed::<usize>("floppy_drive_count").unwrap_or(1)
    );
    for port in [0, 1] {
        let device = store.get(&format!("joystick_port_{port}"), "");
        println!("Port {port}:        {} {device}", store.joystick_mode(port));
    }
    if store.get_bool("mouse_integration") {
        println!("Mouse integration enabled");
    }
    println!();

    for spec in store.schema().all_keys() {
        let value = store.get(&spec.name, "");
        if !value.is_empty() {
            println!("{} = {}", spec.name, value);
        }
    }
    Ok(())
}
