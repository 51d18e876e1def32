//! Launcher settings (~/.config/FS Launcher/settings.toml)
//!
//! Settings hold session and UI state that is not part of an emulator
//! configuration: the name of the loaded configuration, preferred joysticks,
//! and video options the user controls globally. Values are strings, like
//! configuration values, and are stored as a flat TOML table.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

use hashbrown::HashMap;

use crate::error::ConfigError;

/// Keys that may appear in a configuration file but belong to the settings.
///
/// Loading a configuration diverts these keys to [`Settings::set`] instead
/// of storing them in the configuration.
pub const INITIALIZE_FROM_CONFIG: &[&str] = &[
    "fullscreen",
    "fullscreen_mode",
    "monitor",
    "zoom",
    "keep_aspect",
    "scanlines",
    "rtg_scanlines",
    "texture_filter",
    "texture_format",
    "video_format",
    "fsaa",
    "keyboard_input_grab",
    "swap_ctrl_keys",
];

/// Settings with their default values.
pub fn default_settings() -> &'static [(&'static str, &'static str)] {
    &[
        ("config_base", ""),
        ("config_name", "Unnamed Configuration"),
        ("config_path", ""),
        ("config_xml_path", ""),
        ("primary_joystick", ""),
        ("secondary_joystick", ""),
        ("fullscreen", ""),
        ("fullscreen_mode", ""),
        ("monitor", ""),
        ("zoom", ""),
        ("keep_aspect", ""),
        ("scanlines", ""),
        ("rtg_scanlines", ""),
        ("texture_filter", ""),
        ("texture_format", ""),
        ("video_format", ""),
        ("fsaa", ""),
        ("keyboard_input_grab", ""),
        ("swap_ctrl_keys", ""),
    ]
}

/// Session settings collaborator.
pub trait Settings: Send + Sync {
    /// Current value, or an empty string for unknown keys.
    fn get(&self, key: &str) -> String;

    fn set(&self, key: &str, value: &str);

    /// Keys diverted from configuration documents to the settings.
    fn initialize_from_config(&self) -> &[&str] {
        INITIALIZE_FROM_CONFIG
    }
}

/// Thread-safe in-memory settings with TOML persistence.
#[derive(Debug)]
pub struct LauncherSettings {
    values: RwLock<HashMap<String, String>>,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        let values = default_settings()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

impl LauncherSettings {
    /// Parse settings from TOML text, on top of the defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let table: BTreeMap<String, String> =
            toml::from_str(content).map_err(|e| ConfigError::SettingsFormat(e.to_string()))?;
        let settings = Self::default();
        for (key, value) in table {
            settings.set(&key, &value);
        }
        Ok(settings)
    }

    /// Loads settings from disk.
    ///
    /// Returns default values if the file doesn't exist or cannot be parsed.
    pub fn load(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        Self::from_toml(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring settings file {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Serialize all non-empty settings as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let table: BTreeMap<String, String> = self
            .snapshot()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();
        toml::to_string_pretty(&table).map_err(|e| ConfigError::SettingsFormat(e.to_string()))
    }

    /// Saves the settings to disk.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the settings
    /// cannot be serialized, or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Copy of all values.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Settings for LauncherSettings {
    fn get(&self, key: &str) -> String {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
    }
}
