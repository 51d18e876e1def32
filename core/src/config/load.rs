//! Loading configurations
//!
//! Every entry point funnels into [`ConfigStore::load`], which rebuilds the
//! whole configuration from schema defaults and the incoming values:
//!
//! 1. seed every schema key with its default
//! 2. divert session settings to the [`Settings`](crate::services::Settings)
//! 3. stage the remaining values
//! 4. resolve kickstarts
//! 5. fill in resource checksums
//! 6. apply the staged values in one batch, dropping unknown keys, and mark
//!    the configuration clean
//!
//! Joystick devices are machine specific and are not assigned here, so a
//! loaded document saves back without device ids it never had. They are
//! assigned when a port changes and by
//! [`ConfigStore::update_joystick_ports`].
//!
//! Sources are read and parsed completely before step 1. A source that fails
//! leaves the store on the default configuration and no settings diverted.

use std::path::Path;

use fs_launcher_shared::{config_base_name, create_fs_name};

use super::derive::DerivedFields;
use super::values::{AMIGA_PLATFORMS, AmigaValueLoader};
use super::{ConfigStore, ConfigValues, ini, value_of};
use crate::error::{ConfigError, LoadReport};
use crate::services::LoaderContext;

/// Display name of a configuration without a name.
pub const UNNAMED_CONFIGURATION: &str = "Unnamed Configuration";

impl ConfigStore {
    /// Replace the configuration with `raw` reconciled against the schema.
    pub fn load(&mut self, raw: &ConfigValues) -> LoadReport {
        let settings = self.services().settings.clone();
        let diverted = settings.initialize_from_config();

        let mut staged = self.schema().defaults();
        for (key, value) in raw {
            if diverted.contains(&key.as_str()) {
                settings.set(key, value);
            } else {
                staged.insert(key.clone(), value.clone());
            }
        }

        let mut derived = DerivedFields::new(self.schema(), self.services());
        derived.update_kickstart(&mut staged);
        derived.fix_file_checksums(&mut staged);
        let warnings = derived.into_warnings();

        self.commit(staged);
        self.mark_clean();
        tracing::debug!("Loaded configuration ({} warnings)", warnings.len());
        LoadReport { warnings }
    }

    /// Load the default configuration and clear the configuration name.
    pub fn load_default_config(&mut self) -> LoadReport {
        tracing::info!("Loading default configuration");
        let report = self.load(&ConfigValues::new());
        let settings = &self.services().settings;
        settings.set("config_base", "");
        settings.set("config_name", UNNAMED_CONFIGURATION);
        settings.set("config_path", "");
        settings.set("config_xml_path", "");
        report
    }

    /// Load a configuration file.
    ///
    /// The configuration name is taken from `__config_name` when present,
    /// otherwise from the file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. The default
    /// configuration is loaded in that case.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadReport, ConfigError> {
        tracing::info!("Loading configuration from {}", path.display());
        let parsed = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|text| ini::parse(&text));
        let raw = match parsed {
            Ok(raw) => raw,
            Err(e) => return Err(self.fall_back(e)),
        };

        self.services()
            .settings
            .set("config_path", &path.to_string_lossy());
        let report = self.load(&raw);

        let name = match value_of(&raw, "__config_name") {
            "" => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            name => create_fs_name(name),
        };
        self.set_config_name(&name);
        Ok(report)
    }

    /// Load configuration text in the persisted file format.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed. The default
    /// configuration is loaded in that case.
    pub fn load_data(&mut self, text: &str) -> Result<LoadReport, ConfigError> {
        let raw = match ini::parse(text) {
            Ok(raw) => raw,
            Err(e) => return Err(self.fall_back(e)),
        };

        self.services().settings.set("config_path", "");
        let report = self.load(&raw);
        let name = match value_of(&raw, "__config_name") {
            "" => UNNAMED_CONFIGURATION.to_string(),
            name => create_fs_name(name),
        };
        self.set_config_name(&name);
        Ok(report)
    }

    /// Load a game database record.
    ///
    /// Amiga, CDTV and CD32 records are converted by [`AmigaValueLoader`].
    /// Other platforms are converted by their registered platform handler
    /// and applied without Amiga kickstart or media resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is malformed or no handler exists for
    /// its platform. The default configuration is loaded in that case.
    pub fn load_values(&mut self, values: &ConfigValues, uuid: &str) -> Result<LoadReport, ConfigError> {
        let platform = value_of(values, "platform").to_lowercase();

        let (report, name) = if AMIGA_PLATFORMS.contains(&platform.as_str()) {
            let config = match AmigaValueLoader::new(uuid).load_values(values) {
                Ok(config) => config,
                Err(e) => return Err(self.fall_back(e)),
            };
            let report = self.load(&config);
            (report, value_of(&config, "__config_name").to_string())
        } else {
            tracing::warn!("Loading non-Amiga game for platform {:?}", platform);
            let config = match self.platform_values(&platform, values) {
                Ok(config) => config,
                Err(e) => return Err(self.fall_back(e)),
            };
            let report = self.load_foreign(&config);
            let name = format!(
                "{} ({})",
                value_of(values, "game_name"),
                value_of(values, "platform_name")
            );
            (report, name)
        };

        self.services().settings.set("config_path", "");
        self.set_config_name(&create_fs_name(&name));
        Ok(report)
    }

    /// Write the persisted keys with non-empty values to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_ini())?;
        tracing::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// The configuration in the persisted file format.
    pub fn to_ini(&self) -> String {
        ini::write(self.export_items())
    }

    fn platform_values(&self, platform: &str, values: &ConfigValues) -> Result<ConfigValues, ConfigError> {
        let services = self.services();
        let handler = services.platforms.create(platform)?;
        let context = LoaderContext {
            settings: services.settings.as_ref(),
            file_index: services.file_index.as_ref(),
        };
        handler.get_loader(&context).load_values(values)
    }

    /// Apply a mapping produced by a non-Amiga platform handler.
    fn load_foreign(&mut self, config: &ConfigValues) -> LoadReport {
        let mut staged = self.schema().defaults();
        staged.extend(config.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.commit(staged);
        self.mark_clean();
        LoadReport::default()
    }

    fn fall_back(&mut self, error: ConfigError) -> ConfigError {
        tracing::warn!("Failed to load configuration: {}", error);
        self.load_default_config();
        error
    }

    fn set_config_name(&self, name: &str) {
        let settings = &self.services().settings;
        settings.set("config_base", &config_base_name(name));
        settings.set("config_name", name);
        settings.set("config_xml_path", "");
    }
}
