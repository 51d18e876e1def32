//! Game database records for Amiga-family platforms
//!
//! A record is a flat string mapping as served by the game database. Keys
//! that are also configuration keys are taken over as they are; the rest
//! describe the game and its media and are translated here.

use fs_launcher_shared::{
    MAX_CDROM_IMAGES, MAX_FLOPPY_DRIVES, MAX_FLOPPY_IMAGES, default_model_for_platform,
};
use serde::Deserialize;

use super::schema::Schema;
use super::{ConfigValues, value_of};
use crate::error::ConfigError;

/// Platform identifiers handled by [`AmigaValueLoader`].
pub const AMIGA_PLATFORMS: &[&str] = &["amiga", "cdtv", "cd32"];

const FLOPPY_EXTENSIONS: &[&str] = &[".adf", ".adz", ".dms", ".ipf"];
const CDROM_EXTENSIONS: &[&str] = &[".cue", ".iso", ".ccd"];

/// One entry of a record's `file_list`.
#[derive(Debug, Deserialize)]
struct FileEntry {
    name: String,
    #[serde(default)]
    sha1: String,
}

/// Converts an Amiga, CDTV or CD32 record into configuration values.
#[derive(Debug, Clone, Default)]
pub struct AmigaValueLoader {
    uuid: String,
}

impl AmigaValueLoader {
    /// Loader for the game variant identified by `uuid` (may be empty).
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }

    /// Build a configuration mapping from a database record.
    ///
    /// The result may contain `__config_name`, which is not a schema key and
    /// is consumed by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedRecord`] if `file_list` is not a JSON
    /// array of `{"name": ..., "sha1": ...}` objects.
    pub fn load_values(&self, values: &ConfigValues) -> Result<ConfigValues, ConfigError> {
        let schema = Schema::launcher();
        let mut config: ConfigValues = values
            .iter()
            .filter(|(key, _)| schema.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let platform = value_of(values, "platform").to_lowercase();
        let model = value_of(values, "model");
        if !model.is_empty() {
            config.insert("amiga_model".into(), model.to_string());
        } else if value_of(&config, "amiga_model").is_empty()
            && let Some(default) = default_model_for_platform(&platform)
        {
            config.insert("amiga_model".into(), default.to_string());
        }

        let name = match (value_of(values, "game_name"), value_of(values, "variant_name")) {
            ("", _) => String::new(),
            (game, "") => game.to_string(),
            (game, variant) => format!("{game} ({variant})"),
        };
        if !name.is_empty() {
            config.insert("__config_name".into(), name);
        }
        if !self.uuid.is_empty() {
            config.insert("x_game_uuid".into(), self.uuid.clone());
        }

        let file_list = value_of(values, "file_list");
        if !file_list.is_empty() {
            let files: Vec<FileEntry> = serde_json::from_str(file_list)
                .map_err(|e| ConfigError::MalformedRecord(format!("file_list: {e}")))?;
            insert_media(&mut config, &files);
        }
        Ok(config)
    }
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}

/// Fill image slots from the file list and insert the first images.
fn insert_media(config: &mut ConfigValues, files: &[FileEntry]) {
    let floppies: Vec<&FileEntry> = files
        .iter()
        .filter(|file| has_extension(&file.name, FLOPPY_EXTENSIONS))
        .take(MAX_FLOPPY_IMAGES)
        .collect();
    let cdroms: Vec<&FileEntry> = files
        .iter()
        .filter(|file| has_extension(&file.name, CDROM_EXTENSIONS))
        .take(MAX_CDROM_IMAGES)
        .collect();

    for (i, file) in floppies.iter().enumerate() {
        set_slot(config, &format!("floppy_image_{i}"), file);
    }
    let drive_count = value_of(config, "floppy_drive_count")
        .parse::<usize>()
        .unwrap_or(1)
        .min(MAX_FLOPPY_DRIVES);
    for (i, file) in floppies.iter().take(drive_count).enumerate() {
        set_slot(config, &format!("floppy_drive_{i}"), file);
    }

    for (i, file) in cdroms.iter().enumerate() {
        set_slot(config, &format!("cdrom_image_{i}"), file);
    }
    if let Some(file) = cdroms.first() {
        set_slot(config, "cdrom_drive_0", file);
    }
}

fn set_slot(config: &mut ConfigValues, key: &str, file: &FileEntry) {
    config.insert(key.to_string(), file.name.clone());
    config.insert(format!("x_{key}_sha1"), file.sha1.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> ConfigValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_schema_keys_copied_and_others_dropped() {
        let values = record(&[
            ("platform", "Amiga"),
            ("chip_memory", "1024"),
            ("sort_key", "lotus"),
        ]);
        let config = AmigaValueLoader::new("").load_values(&values).unwrap();
        assert_eq!(config["chip_memory"], "1024");
        assert!(!config.contains_key("sort_key"));
    }

    #[test]
    fn test_model_mapping() {
        let values = record(&[("platform", "amiga"), ("model", "A1200")]);
        let config = AmigaValueLoader::new("").load_values(&values).unwrap();
        assert_eq!(config["amiga_model"], "A1200");
    }

    #[test]
    fn test_platform_default_model() {
        let values = record(&[("platform", "CD32")]);
        let config = AmigaValueLoader::new("").load_values(&values).unwrap();
        assert_eq!(config["amiga_model"], "CD32");

        let values = record(&[("platform", "amiga")]);
        let config = AmigaValueLoader::new("").load_values(&values).unwrap();
        assert!(!config.contains_key("amiga_model"));
    }

    #[test]
    fn test_config_name_and_uuid() {
        let values = record(&[
            ("platform", "amiga"),
            ("game_name", "Lotus Turbo Challenge"),
            ("variant_name", "Disk"),
        ]);
        let config = AmigaValueLoader::new("1234-abcd").load_values(&values).unwrap();
        assert_eq!(config["__config_name"], "Lotus Turbo Challenge (Disk)");
        assert_eq!(config["x_game_uuid"], "1234-abcd");
    }

    #[test]
    fn test_file_list_fills_floppies() {
        let files = r#"[
            {"name": "Lotus (Disk 1).adf", "sha1": "1111"},
            {"name": "Lotus (Disk 2).ADF", "sha1": "2222"},
            {"name": "manual.txt", "sha1": "3333"}
        ]"#;
        let values = record(&[("platform", "amiga"), ("file_list", files)]);
        let config = AmigaValueLoader::new("").load_values(&values).unwrap();

        assert_eq!(config["floppy_image_0"], "Lotus (Disk 1).adf");
        assert_eq!(config["x_floppy_image_1_sha1"], "2222");
        assert_eq!(config["floppy_drive_0"], "Lotus (Disk 1).adf");
        assert_eq!(config["x_floppy_drive_0_sha1"], "1111");
        // One drive by default
        assert!(!config.contains_key("floppy_drive_1"));
        assert!(!config.contains_key("floppy_image_2"));
    }

    #[test]
    fn test_file_list_respects_drive_count() {
        let files = r#"[{"name": "a.adf", "sha1": "1"}, {"name": "b.adf", "sha1": "2"}]"#;
        let values = record(&[
            ("platform", "amiga"),
            ("floppy_drive_count", "2"),
            ("file_list", files),
        ]);
        let config = AmigaValueLoader::new("").load_values(&values).unwrap();
        assert_eq!(config["floppy_drive_1"], "b.adf");
    }

    #[test]
    fn test_file_list_fills_cdrom() {
        let files = r#"[{"name": "Game.cue", "sha1": "c1"}, {"name": "Game.bin"}]"#;
        let values = record(&[("platform", "cd32"), ("file_list", files)]);
        let config = AmigaValueLoader::new("").load_values(&values).unwrap();
        assert_eq!(config["cdrom_drive_0"], "Game.cue");
        assert_eq!(config["x_cdrom_drive_0_sha1"], "c1");
        assert!(!config.contains_key("cdrom_image_1"));
    }

    #[test]
    fn test_malformed_file_list() {
        let values = record(&[("platform", "amiga"), ("file_list", "{not json")]);
        assert!(matches!(
            AmigaValueLoader::new("").load_values(&values),
            Err(ConfigError::MalformedRecord(_))
        ));
    }
}
