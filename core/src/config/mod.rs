//! Launcher configuration
//!
//! - [`schema`] declares every configuration key, its default and its flags
//! - [`store`] owns the live values and notifies listeners after each batch
//! - [`derive`] keeps ROM selection and resource checksums consistent
//! - [`joystick`] assigns concrete devices to joystick ports
//! - [`load`] is the reconciliation pipeline behind every load entry point
//! - [`ini`] reads and writes the persisted configuration format
//! - [`values`] converts Amiga game database records
//! - [`typed`] converts string values at the boundary

pub mod derive;
pub mod ini;
pub mod joystick;
pub mod load;
pub mod schema;
pub mod store;
pub mod typed;
pub mod values;

/// Configuration key to value mapping. All values are strings.
pub type ConfigValues = hashbrown::HashMap<String, String>;

pub use load::UNNAMED_CONFIGURATION;
pub use schema::{ConfigKeySpec, DerivedFieldRule, KeyFlags, ResourceKind, Schema};
pub use store::{ConfigChange, ConfigListener, ConfigStore, ListenerId};
pub use typed::JoystickMode;
pub use values::{AMIGA_PLATFORMS, AmigaValueLoader};

/// Value of `key` in a mapping, or an empty string.
pub(crate) fn value_of<'a>(values: &'a ConfigValues, key: &str) -> &'a str {
    values.get(key).map(String::as_str).unwrap_or("")
}
