//! Typed accessors over string configuration values.
//!
//! Values stay strings in the store and in configuration files. Call sites
//! that need booleans, numbers or enums convert here.

use std::fmt;
use std::str::FromStr;

use fs_launcher_shared::{AmigaModel, get_model_config};

use super::store::ConfigStore;

/// What is connected to a joystick port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoystickMode {
    /// No mode configured; the model default applies
    #[default]
    Unset,
    Joystick,
    Cd32Gamepad,
    Mouse,
    Nothing,
}

impl JoystickMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Joystick => "joystick",
            Self::Cd32Gamepad => "cd32 gamepad",
            Self::Mouse => "mouse",
            Self::Nothing => "nothing",
        }
    }

    /// Whether the mode is served by a joystick-like device.
    pub fn wants_joystick(self) -> bool {
        matches!(self, Self::Joystick | Self::Cd32Gamepad)
    }
}

impl fmt::Display for JoystickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoystickMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(Self::Unset),
            "joystick" => Ok(Self::Joystick),
            "cd32 gamepad" => Ok(Self::Cd32Gamepad),
            "mouse" => Ok(Self::Mouse),
            "nothing" => Ok(Self::Nothing),
            other => Err(format!("unknown joystick mode: {other:?}")),
        }
    }
}

/// Interpret a configuration string as a boolean.
///
/// `"1"`, `"true"` and `"yes"` are true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

impl ConfigStore {
    /// Boolean value of `key`; absent and empty values are false.
    pub fn get_bool(&self, key: &str) -> bool {
        parse_bool(self.get(key, ""))
    }

    /// Parsed value of `key`, or `None` when empty or unparsable.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key, "").trim().parse().ok()
    }

    /// Mode of joystick port `port`. Unknown modes read as unset.
    pub fn joystick_mode(&self, port: usize) -> JoystickMode {
        self.get(&format!("joystick_port_{port}_mode"), "")
            .parse()
            .unwrap_or_default()
    }

    /// Model table entry for the configured Amiga model.
    pub fn amiga_model(&self) -> &'static AmigaModel {
        get_model_config(self.get("amiga_model", ""))
    }
}
