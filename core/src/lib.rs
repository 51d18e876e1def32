//! FS Launcher Core - configuration reconciliation
//!
//! This crate owns the launcher's view of an emulator configuration: a
//! schema-defined key/value store whose derived fields (ROM selection,
//! resource checksums, joystick devices) are kept consistent on every load
//! and every mutation.
//!
//! # Architecture
//!
//! - [`Schema`] - Ordered, immutable table of configuration keys and flags
//! - [`ConfigStore`] - Live configuration with change notification
//! - [`ChecksumTool`] - SHA-1 content identity for files and ROMs
//! - [`services`] - Collaborators: file index, settings, platform handlers,
//!   input devices and base directories

pub mod checksum;
pub mod config;
pub mod error;
pub mod services;

pub use checksum::ChecksumTool;
pub use config::{
    AmigaValueLoader, ConfigChange, ConfigKeySpec, ConfigListener, ConfigStore, ConfigValues,
    DerivedFieldRule, JoystickMode, KeyFlags, ListenerId, ResourceKind, Schema,
};
pub use error::{ConfigError, ConfigWarning, LoadReport};
pub use services::{
    BaseDirectories, ConfigServices, DirectoryFileIndex, FileIndex, InputDevice, InputDevices,
    LauncherSettings, LoaderContext, PlatformHandler, PlatformLoader, PlatformRegistry, Settings,
    StaticInputDevices,
};
