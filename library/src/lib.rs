//! FS Launcher command-line front end
//!
//! Loads, inspects and exports launcher configurations without the desktop
//! user interface. All configuration logic lives in `fs-launcher-core`; this
//! crate only wires it to the command line.

pub mod app;
pub mod commands;
