//! Derived-field resolution
//!
//! Derived fields are cached facts about the hardware a configuration
//! describes: which kickstart file to boot, the content checksum of every
//! inserted medium, and the concrete devices behind joystick ports. They are
//! recomputed on a staged copy of the values before it is applied, so the
//! store never exposes a path whose checksum is stale.

use fs_launcher_shared::{
    INTERNAL_KICKSTART, INTERNAL_ROM_SHA1, MAX_CHECKSUM_BYTES, get_model_config, is_remote_uri,
};

use super::joystick::{JoystickPreferences, fix_joystick_ports};
use super::schema::{DerivedFieldRule, Schema};
use super::{ConfigValues, value_of};
use crate::checksum::ChecksumTool;
use crate::error::ConfigWarning;
use crate::services::ConfigServices;

const KICKSTART: KickstartKeys = KickstartKeys {
    file: "kickstart_file",
    resolved: "x_kickstart_file",
    sha1: "x_kickstart_file_sha1",
};

const KICKSTART_EXT: KickstartKeys = KickstartKeys {
    file: "kickstart_ext_file",
    resolved: "x_kickstart_ext_file",
    sha1: "x_kickstart_ext_file_sha1",
};

/// Keys whose change requires kickstart resolution to run again.
pub const KICKSTART_INPUT_KEYS: &[&str] = &["amiga_model", "kickstart_file", "kickstart_ext_file"];

struct KickstartKeys {
    /// User override
    file: &'static str,
    /// Resolved path
    resolved: &'static str,
    /// Checksum of the resolved ROM
    sha1: &'static str,
}

/// Resolves derived fields on a staged mapping and collects warnings.
pub struct DerivedFields<'a> {
    schema: &'a Schema,
    services: &'a ConfigServices,
    tool: ChecksumTool,
    warnings: Vec<ConfigWarning>,
}

impl<'a> DerivedFields<'a> {
    pub fn new(schema: &'a Schema, services: &'a ConfigServices) -> Self {
        let tool = ChecksumTool::new(Some(services.directories.kickstarts_dir()));
        Self {
            schema,
            services,
            tool,
            warnings: Vec::new(),
        }
    }

    /// Warnings collected so far.
    pub fn into_warnings(self) -> Vec<ConfigWarning> {
        self.warnings
    }

    fn warn(&mut self, warning: ConfigWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Resolve `x_kickstart_file` and `x_kickstart_ext_file` with their
    /// checksums from the model and the user overrides.
    ///
    /// An explicit override is adopted verbatim. Otherwise the model's
    /// acceptable checksums are tried in order and the first one with a
    /// local file wins. Without any, the main kickstart falls back to the
    /// internal ROM; the extended ROM is left empty.
    pub fn update_kickstart(&mut self, values: &mut ConfigValues) {
        let default_model = self.schema.default_value("amiga_model").unwrap_or("");
        let model_id = values
            .entry("amiga_model".to_string())
            .or_insert_with(|| default_model.to_string())
            .clone();
        let model = get_model_config(&model_id);

        let kickstart_file = value_of(values, KICKSTART.file).to_string();
        if !kickstart_file.is_empty() {
            adopt_override(values, &KICKSTART, &kickstart_file);
            if kickstart_file == INTERNAL_KICKSTART {
                values.insert(KICKSTART.sha1.to_string(), INTERNAL_ROM_SHA1.to_string());
            }
        } else if let Some((path, sha1)) = self.first_available(model.kickstarts) {
            set_resolved(values, &KICKSTART, path, sha1);
        } else {
            self.warn(ConfigWarning::NoKickstart {
                model: model.id.to_string(),
            });
            set_resolved(values, &KICKSTART, String::new(), INTERNAL_ROM_SHA1.to_string());
        }

        let ext_file = value_of(values, KICKSTART_EXT.file).to_string();
        if !ext_file.is_empty() {
            adopt_override(values, &KICKSTART_EXT, &ext_file);
        } else if model.ext_roms.is_empty() {
            set_resolved(values, &KICKSTART_EXT, String::new(), String::new());
        } else if let Some((path, sha1)) = self.first_available(model.ext_roms) {
            set_resolved(values, &KICKSTART_EXT, path, sha1);
        } else {
            self.warn(ConfigWarning::NoExtendedKickstart {
                model: model.id.to_string(),
            });
            set_resolved(values, &KICKSTART_EXT, String::new(), String::new());
        }
    }

    /// First checksum in preference order with a readable local file.
    fn first_available(&self, checksums: &[&str]) -> Option<(String, String)> {
        let index = &self.services.file_index;
        checksums.iter().find_map(|sha1| {
            let path = index.find_by_sha1(sha1)?;
            index.open(&path)?;
            Some((path, sha1.to_string()))
        })
    }

    /// Fill in missing checksums for every resource slot and both kickstarts.
    pub fn fix_file_checksums(&mut self, values: &mut ConfigValues) {
        let schema = self.schema;
        for rule in schema.derived_rules() {
            self.fix_file_checksum(values, rule);
        }
    }

    /// Fill in the checksum of one resource slot.
    ///
    /// An existing checksum is trusted. Remote URIs stand in for their own
    /// checksum. Directories and files above the size ceiling have none.
    pub fn fix_file_checksum(&mut self, values: &mut ConfigValues, rule: &DerivedFieldRule) {
        let path = value_of(values, &rule.path_key);
        if path.is_empty() || !value_of(values, &rule.sha1_key).is_empty() {
            return;
        }
        if is_remote_uri(path) {
            let uri = path.to_string();
            values.insert(rule.sha1_key.clone(), uri);
            return;
        }

        let path = path.to_string();
        let Some(resolved) = self.services.directories.resolve(&path, rule.kind) else {
            self.warn(ConfigWarning::ResourceMissing {
                key: rule.path_key.clone(),
                path,
            });
            return;
        };
        if resolved.is_dir() {
            return;
        }
        let size = match std::fs::metadata(&resolved) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                self.warn(ConfigWarning::ChecksumFailed {
                    key: rule.path_key.clone(),
                    path,
                    message: e.to_string(),
                });
                return;
            }
        };
        if size > MAX_CHECKSUM_BYTES {
            self.warn(ConfigWarning::ChecksumSkipped {
                key: rule.path_key.clone(),
                path,
                size,
            });
            return;
        }

        tracing::debug!("Checksumming {}", resolved.display());
        let result = if rule.kind.is_rom() {
            self.tool.checksum_rom(&resolved)
        } else {
            self.tool.checksum(&resolved)
        };
        match result {
            Ok(sha1) => {
                values.insert(rule.sha1_key.clone(), sha1);
            }
            Err(e) => self.warn(ConfigWarning::ChecksumFailed {
                key: rule.path_key.clone(),
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Assign devices to joystick ports that need one.
    pub fn fix_joystick_ports(&mut self, values: &mut ConfigValues) {
        let settings = &self.services.settings;
        let preferences = JoystickPreferences {
            primary: settings.get("primary_joystick"),
            secondary: settings.get("secondary_joystick"),
        };
        let joysticks = self.services.devices.joysticks();
        fix_joystick_ports(values, &joysticks, &preferences);
    }
}

/// Adopt a user-specified kickstart path. The cached checksum only survives
/// when it belongs to the same path.
fn adopt_override(values: &mut ConfigValues, keys: &KickstartKeys, path: &str) {
    if value_of(values, keys.resolved) != path {
        values.insert(keys.resolved.to_string(), path.to_string());
        values.insert(keys.sha1.to_string(), String::new());
    }
}

fn set_resolved(values: &mut ConfigValues, keys: &KickstartKeys, path: String, sha1: String) {
    values.insert(keys.resolved.to_string(), path);
    values.insert(keys.sha1.to_string(), sha1);
}
