//! Configuration schema
//!
//! The schema is the authoritative list of configuration keys. Declaration
//! order matters: options that implicitly change other options come first
//! (the Amiga model decides kickstarts and joystick defaults), and every
//! resource path precedes its checksum key.

use std::sync::LazyLock;

use fs_launcher_shared::{
    MAX_CDROM_DRIVES, MAX_CDROM_IMAGES, MAX_FLOPPY_DRIVES, MAX_FLOPPY_IMAGES, MAX_HARD_DRIVES,
};
use hashbrown::{HashMap, HashSet};

use super::ConfigValues;
use crate::error::ConfigError;

bitflags::bitflags! {
    /// Behavior flags of a configuration key
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyFlags: u8 {
        /// Part of the configuration checksum
        const CHECKSUM = 0b0000_0001;
        /// Exchanged between peers of a network session
        const SYNC = 0b0000_0010;
        /// Managed by a dedicated code path, skipped by generic copies
        const CUSTOM = 0b0000_0100;
        /// Derived value, never written to configuration files
        const NOSAVE = 0b0000_1000;
    }
}

const NONE: KeyFlags = KeyFlags::empty();
const CS: KeyFlags = KeyFlags::CHECKSUM.union(KeyFlags::SYNC);
const CSC: KeyFlags = CS.union(KeyFlags::CUSTOM);
const CSN: KeyFlags = CS.union(KeyFlags::NOSAVE);

/// One schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKeySpec {
    pub name: String,
    pub default_value: String,
    pub flags: KeyFlags,
}

impl ConfigKeySpec {
    pub fn new(name: impl Into<String>, default_value: impl Into<String>, flags: KeyFlags) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.into(),
            flags,
        }
    }
}

/// Kind of a hardware resource slot. Decides the base directory for
/// relative paths and the checksum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Floppy,
    CdRom,
    HardDrive,
    Kickstart,
}

impl ResourceKind {
    /// Kickstarts are hashed with the ROM-aware variant.
    pub fn is_rom(self) -> bool {
        self == Self::Kickstart
    }
}

/// Pairing of a resource path key with the key caching its checksum.
///
/// Whenever the path changes without a checksum supplied alongside it, the
/// checksum key is cleared and recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFieldRule {
    pub path_key: String,
    pub sha1_key: String,
    pub kind: ResourceKind,
}

impl DerivedFieldRule {
    pub fn new(path_key: impl Into<String>, sha1_key: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            path_key: path_key.into(),
            sha1_key: sha1_key.into(),
            kind,
        }
    }
}

/// Ordered, immutable set of configuration keys.
#[derive(Debug)]
pub struct Schema {
    keys: Vec<ConfigKeySpec>,
    index: HashMap<String, usize>,
    sync_keys: HashSet<String>,
    rules: Vec<DerivedFieldRule>,
}

static LAUNCHER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let (keys, rules) = launcher_entries();
    Schema::new(keys, rules).unwrap_or_else(|e| panic!("invalid launcher schema: {e}"))
});

impl Schema {
    /// Build a schema, rejecting duplicate keys and rules that reference
    /// undeclared keys.
    pub fn new(keys: Vec<ConfigKeySpec>, rules: Vec<DerivedFieldRule>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(keys.len());
        for (i, spec) in keys.iter().enumerate() {
            if index.insert(spec.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateKey(spec.name.clone()));
            }
        }
        for rule in &rules {
            for key in [&rule.path_key, &rule.sha1_key] {
                if !index.contains_key(key.as_str()) {
                    return Err(ConfigError::UndeclaredRuleKey(key.clone()));
                }
            }
        }
        let sync_keys = keys
            .iter()
            .filter(|spec| spec.flags.contains(KeyFlags::SYNC))
            .map(|spec| spec.name.clone())
            .collect();
        Ok(Self {
            keys,
            index,
            sync_keys,
            rules,
        })
    }

    /// The launcher's Amiga configuration schema.
    ///
    /// # Panics
    ///
    /// Panics on first use if the built-in table declares a key twice.
    pub fn launcher() -> &'static Schema {
        &LAUNCHER_SCHEMA
    }

    /// All entries in declaration order.
    pub fn all_keys(&self) -> &[ConfigKeySpec] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn spec(&self, key: &str) -> Option<&ConfigKeySpec> {
        self.index.get(key).map(|&i| &self.keys[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn default_value(&self, key: &str) -> Option<&str> {
        self.spec(key).map(|spec| spec.default_value.as_str())
    }

    pub fn has_flag(&self, key: &str, flag: KeyFlags) -> bool {
        self.spec(key).is_some_and(|spec| spec.flags.contains(flag))
    }

    /// Keys included in the configuration checksum, in declaration order.
    pub fn checksum_keys(&self) -> impl Iterator<Item = &str> {
        self.keys_with(KeyFlags::CHECKSUM)
    }

    /// Keys exchanged for network session agreement.
    pub fn sync_keys(&self) -> &HashSet<String> {
        &self.sync_keys
    }

    /// Keys written to configuration files, in declaration order.
    pub fn persisted_keys(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(|spec| !spec.flags.contains(KeyFlags::NOSAVE))
            .map(|spec| spec.name.as_str())
    }

    /// Keys managed by dedicated code paths, in declaration order.
    pub fn custom_keys(&self) -> impl Iterator<Item = &str> {
        self.keys_with(KeyFlags::CUSTOM)
    }

    fn keys_with(&self, flag: KeyFlags) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(move |spec| spec.flags.contains(flag))
            .map(|spec| spec.name.as_str())
    }

    /// A fully populated mapping of default values.
    pub fn defaults(&self) -> ConfigValues {
        self.keys
            .iter()
            .map(|spec| (spec.name.clone(), spec.default_value.clone()))
            .collect()
    }

    /// Path/checksum pairings of all resource slots.
    pub fn derived_rules(&self) -> &[DerivedFieldRule] {
        &self.rules
    }

    /// The rule whose path key is `key`, if any.
    pub fn rule_for_path(&self, key: &str) -> Option<&DerivedFieldRule> {
        self.rules.iter().find(|rule| rule.path_key == key)
    }
}

/// The built-in key table and resource rules.
fn launcher_entries() -> (Vec<ConfigKeySpec>, Vec<DerivedFieldRule>) {
    let mut keys = Vec::with_capacity(256);
    let mut push = |name: &str, flags: KeyFlags| keys.push(ConfigKeySpec::new(name, "", flags));

    // Hardware
    for name in [
        "amiga_model",
        "ntsc_mode",
        "accuracy",
        "chip_memory",
        "slow_memory",
        "fast_memory",
        "zorro_iii_memory",
        "bsdsocket_library",
        "uaegfx_card",
    ] {
        push(name, CS);
    }

    // Joystick ports; the device itself is local to each peer
    for port in 0..4 {
        push(&format!("joystick_port_{port}"), NONE);
        push(&format!("joystick_port_{port}_mode"), CS);
        push(&format!("joystick_port_{port}_autofire"), CS);
    }

    push("floppy_drive_count", CSC);
    push("cdrom_drive_count", CSC);

    // Not an Amiga device, so it is neither checksummed nor synced
    push("joystick_port_4_mode", KeyFlags::CUSTOM);

    push("kickstart_file", NONE);
    push("x_kickstart_file", KeyFlags::NOSAVE);
    push("x_kickstart_file_sha1", CSN);
    push("kickstart_ext_file", NONE);
    push("x_kickstart_ext_file", KeyFlags::NOSAVE);
    push("x_kickstart_ext_file_sha1", CSN);

    push("x_whdload_args", CS);
    push("x_whdload_version", CS);
    push("floppy_drive_speed", CSC);
    push("dongle_type", CSC);
    push("platform", NONE);

    // Network session
    for name in [
        "__netplay_game",
        "__netplay_password",
        "__netplay_players",
    ] {
        push(name, CS);
    }
    push("__netplay_port", KeyFlags::SYNC);
    push("__netplay_addresses", CS);
    push("__netplay_host", NONE);
    push("__netplay_ready", NONE);
    push("__netplay_state_dir_name", CS);

    push("__error", NONE);
    push("x_game_uuid", NONE);
    push("x_game_xml_path", NONE);
    push("title", KeyFlags::CUSTOM);
    push("sub_title", KeyFlags::CUSTOM);
    push("viewport", KeyFlags::CUSTOM);

    // Game metadata
    for name in [
        "year",
        "developer",
        "publisher",
        "languages",
        "players",
        "protection",
        "hol_url",
        "wikipedia_url",
        "database_url",
        "lemon_url",
        "mobygames_url",
        "amigamemo_url",
        "whdload_url",
        "longplay_url",
        "__variant_rating",
        "variant_rating",
        "variant_uuid",
        "download_file",
        "download_page",
        "download_terms",
        "download_notice",
        "x_missing_files",
        "x_game_notice",
        "x_variant_notice",
        "x_variant_warning",
        "x_variant_error",
        "x_joy_emu_conflict",
        "screen1_sha1",
        "screen2_sha1",
        "screen3_sha1",
        "screen4_sha1",
        "screen5_sha1",
        "front_sha1",
        "title_sha1",
    ] {
        push(name, NONE);
    }

    push("mouse_integration", CS);

    let mut rules = Vec::new();
    let mut slots = |prefix: &str, count: usize, kind: ResourceKind, keys: &mut Vec<ConfigKeySpec>| {
        for i in 0..count {
            let path_key = format!("{prefix}_{i}");
            let sha1_key = format!("x_{prefix}_{i}_sha1");
            keys.push(ConfigKeySpec::new(&path_key, "", NONE));
            if kind == ResourceKind::HardDrive {
                keys.push(ConfigKeySpec::new(format!("{prefix}_{i}_label"), "", CSC));
                keys.push(ConfigKeySpec::new(format!("{prefix}_{i}_priority"), "", CSC));
            }
            keys.push(ConfigKeySpec::new(&sha1_key, "", CSN));
            rules.push(DerivedFieldRule::new(path_key, sha1_key, kind));
        }
    };
    slots("floppy_drive", MAX_FLOPPY_DRIVES, ResourceKind::Floppy, &mut keys);
    slots("floppy_image", MAX_FLOPPY_IMAGES, ResourceKind::Floppy, &mut keys);
    slots("cdrom_drive", MAX_CDROM_DRIVES, ResourceKind::CdRom, &mut keys);
    slots("cdrom_image", MAX_CDROM_IMAGES, ResourceKind::CdRom, &mut keys);
    slots("hard_drive", MAX_HARD_DRIVES, ResourceKind::HardDrive, &mut keys);

    // The resolved kickstarts are checksummed last, after the media slots
    rules.push(DerivedFieldRule::new(
        "x_kickstart_file",
        "x_kickstart_file_sha1",
        ResourceKind::Kickstart,
    ));
    rules.push(DerivedFieldRule::new(
        "x_kickstart_ext_file",
        "x_kickstart_ext_file_sha1",
        ResourceKind::Kickstart,
    ));

    keys.push(ConfigKeySpec::new(
        "__version",
        env!("CARGO_PKG_VERSION"),
        NONE,
    ));

    (keys, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================================
    // Built-in schema
    // =============================================================

    #[test]
    fn test_launcher_schema_builds() {
        let schema = Schema::launcher();
        assert!(schema.contains("amiga_model"));
        assert!(schema.contains("x_hard_drive_9_sha1"));
        assert!(!schema.contains("x_hard_drive_10_sha1"));
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_amiga_model_declared_first() {
        assert_eq!(Schema::launcher().all_keys()[0].name, "amiga_model");
    }

    #[test]
    fn test_slot_keys_generated() {
        let schema = Schema::launcher();
        for i in 0..MAX_FLOPPY_DRIVES {
            assert!(schema.contains(&format!("floppy_drive_{i}")));
        }
        for i in 0..MAX_FLOPPY_IMAGES {
            assert!(schema.contains(&format!("x_floppy_image_{i}_sha1")));
        }
        assert!(schema.contains("cdrom_drive_0"));
        assert!(!schema.contains("cdrom_drive_1"));
        assert!(schema.has_flag("hard_drive_3_label", KeyFlags::CUSTOM));
    }

    #[test]
    fn test_path_precedes_checksum() {
        let schema = Schema::launcher();
        let position = |key: &str| {
            schema
                .all_keys()
                .iter()
                .position(|spec| spec.name == key)
                .unwrap()
        };
        for rule in schema.derived_rules() {
            assert!(position(&rule.path_key) < position(&rule.sha1_key), "{}", rule.path_key);
        }
        assert!(position("amiga_model") < position("kickstart_file"));
    }

    #[test]
    fn test_flags() {
        let schema = Schema::launcher();
        assert!(schema.has_flag("x_kickstart_file_sha1", KeyFlags::CHECKSUM));
        assert!(schema.has_flag("x_kickstart_file_sha1", KeyFlags::NOSAVE));
        assert!(!schema.has_flag("joystick_port_0", KeyFlags::CHECKSUM));
        assert!(schema.has_flag("__netplay_port", KeyFlags::SYNC));
        assert!(!schema.has_flag("__netplay_port", KeyFlags::CHECKSUM));
        assert!(!schema.has_flag("no_such_key", KeyFlags::SYNC));
    }

    #[test]
    fn test_persisted_keys_exclude_nosave() {
        let schema = Schema::launcher();
        let persisted: Vec<&str> = schema.persisted_keys().collect();
        assert!(persisted.contains(&"kickstart_file"));
        assert!(!persisted.contains(&"x_kickstart_file"));
        assert!(!persisted.contains(&"x_floppy_drive_0_sha1"));
    }

    #[test]
    fn test_custom_keys() {
        let custom: Vec<&str> = Schema::launcher().custom_keys().collect();
        assert!(custom.contains(&"title"));
        assert!(custom.contains(&"floppy_drive_count"));
        assert!(!custom.contains(&"amiga_model"));
    }

    #[test]
    fn test_checksum_keys_in_declaration_order() {
        let keys: Vec<&str> = Schema::launcher().checksum_keys().collect();
        assert_eq!(keys[0], "amiga_model");
        assert_eq!(keys[1], "ntsc_mode");
        assert!(!keys.contains(&"title"));
    }

    #[test]
    fn test_defaults_cover_every_key() {
        let schema = Schema::launcher();
        let defaults = schema.defaults();
        assert_eq!(defaults.len(), schema.len());
        assert_eq!(defaults["__version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(schema.default_value("amiga_model"), Some(""));
        assert_eq!(schema.default_value("bogus"), None);
    }

    #[test]
    fn test_rule_for_path() {
        let schema = Schema::launcher();
        let rule = schema.rule_for_path("cdrom_image_3").unwrap();
        assert_eq!(rule.sha1_key, "x_cdrom_image_3_sha1");
        assert_eq!(rule.kind, ResourceKind::CdRom);
        assert!(schema.rule_for_path("amiga_model").is_none());
    }

    // =============================================================
    // Schema integrity
    // =============================================================

    #[test]
    fn test_duplicate_key_rejected() {
        let keys = vec![
            ConfigKeySpec::new("a", "", NONE),
            ConfigKeySpec::new("a", "", CS),
        ];
        assert!(matches!(
            Schema::new(keys, vec![]),
            Err(ConfigError::DuplicateKey(key)) if key == "a"
        ));
    }

    #[test]
    fn test_rule_with_undeclared_key_rejected() {
        let keys = vec![ConfigKeySpec::new("disk", "", NONE)];
        let rules = vec![DerivedFieldRule::new("disk", "x_disk_sha1", ResourceKind::Floppy)];
        assert!(matches!(
            Schema::new(keys, rules),
            Err(ConfigError::UndeclaredRuleKey(key)) if key == "x_disk_sha1"
        ));
    }
}
