//! Amiga hardware specifications.
//!
//! Slot counts for removable media and the per-model kickstart tables used
//! to pick a ROM when the configuration does not name one explicitly.

/// Number of floppy drives an Amiga configuration can describe.
pub const MAX_FLOPPY_DRIVES: usize = 4;
/// Number of entries in the floppy swap list.
pub const MAX_FLOPPY_IMAGES: usize = 20;
/// Number of CD-ROM drives an Amiga configuration can describe.
pub const MAX_CDROM_DRIVES: usize = 1;
/// Number of entries in the CD-ROM swap list.
pub const MAX_CDROM_IMAGES: usize = 20;
/// Number of hard drive slots.
pub const MAX_HARD_DRIVES: usize = 10;

/// Checksum reported for the built-in replacement ROM.
///
/// Used when no acceptable kickstart is available locally; the emulator then
/// boots its internal ROM instead. The value is the SHA-1 of the ASCII
/// identifier [`INTERNAL_KICKSTART`], so every peer derives the same digest.
pub const INTERNAL_ROM_SHA1: &str = "9f33a7c798af6fd6abb28049d9c1b3edfa2fd24a";

/// Kickstart identifier that selects the internal ROM explicitly.
pub const INTERNAL_KICKSTART: &str = "internal";

/// Specification of one Amiga model.
#[derive(Debug, Clone)]
pub struct AmigaModel {
    /// Model identifier as written in configuration files (e.g. "A1200")
    pub id: &'static str,
    /// Human readable title
    pub title: &'static str,
    /// Acceptable kickstart checksums, most preferred first
    pub kickstarts: &'static [&'static str],
    /// Acceptable extended ROM checksums, most preferred first.
    /// Empty for models without an extended ROM.
    pub ext_roms: &'static [&'static str],
}

// === Kickstart checksums ===

const KICKSTART_13_A500: &str = "891e9a547772fe0c6c19b610baf8bc4ea7fcb785";
const KICKSTART_13_A500_CLOANTO: &str = "c39bd9094d4e5f4e28c1411f3086950406062e87";
const KICKSTART_204_A500P: &str = "c5839f5cb98a7a8947065c3ed2f14f5f42e334a1";
const KICKSTART_205_A600: &str = "02843c4253bbd29aba535b0aa3bd9a85034ecde4";
const KICKSTART_31_A1200: &str = "e21545723fe8374e91342617604f1b3d703094f1";
const KICKSTART_30_A1200: &str = "70033828182fffc7ed106e5373a8b89dda76faa5";
const KICKSTART_31_A3000: &str = "f8e210d72b4c4853e0c9b85d223ba20e3d1b36ee";
const KICKSTART_31_A4000: &str = "5fe04842d04a489720f0f4bb0e46948199406f49";
const KICKSTART_31_CD32: &str = "3525be8887f79b5929e017b42380a79edfee542d";
const EXT_ROM_CD32: &str = "5bef3d628ce59cc02a66e6e4ae0da48f60e78f7f";
const EXT_ROM_CDTV: &str = "7ba40ffa17e500ed9fed041f3424bd81d9c907be";

/// All known models. The first entry is the default model.
pub const MODELS: &[AmigaModel] = &[
    AmigaModel {
        id: "A500",
        title: "Amiga 500",
        kickstarts: &[KICKSTART_13_A500, KICKSTART_13_A500_CLOANTO],
        ext_roms: &[],
    },
    AmigaModel {
        id: "A500+",
        title: "Amiga 500+",
        kickstarts: &[KICKSTART_204_A500P],
        ext_roms: &[],
    },
    AmigaModel {
        id: "A600",
        title: "Amiga 600",
        kickstarts: &[KICKSTART_205_A600],
        ext_roms: &[],
    },
    AmigaModel {
        id: "A1200",
        title: "Amiga 1200",
        kickstarts: &[KICKSTART_31_A1200, KICKSTART_30_A1200],
        ext_roms: &[],
    },
    AmigaModel {
        id: "A1200/020",
        title: "Amiga 1200 (68020)",
        kickstarts: &[KICKSTART_31_A1200, KICKSTART_30_A1200],
        ext_roms: &[],
    },
    AmigaModel {
        id: "A3000",
        title: "Amiga 3000",
        kickstarts: &[KICKSTART_31_A3000],
        ext_roms: &[],
    },
    AmigaModel {
        id: "A4000/040",
        title: "Amiga 4000 (68040)",
        kickstarts: &[KICKSTART_31_A4000],
        ext_roms: &[],
    },
    AmigaModel {
        id: "CD32",
        title: "Amiga CD32",
        kickstarts: &[KICKSTART_31_CD32],
        ext_roms: &[EXT_ROM_CD32],
    },
    AmigaModel {
        id: "CDTV",
        title: "Commodore CDTV",
        kickstarts: &[KICKSTART_13_A500, KICKSTART_13_A500_CLOANTO],
        ext_roms: &[EXT_ROM_CDTV],
    },
];

/// Look up a model by identifier (case-insensitive).
///
/// Unknown or empty identifiers resolve to the default model (A500).
pub fn get_model_config(model: &str) -> &'static AmigaModel {
    MODELS
        .iter()
        .find(|m| m.id.eq_ignore_ascii_case(model))
        .unwrap_or(&MODELS[0])
}

/// Default model for a platform identifier from the game database.
pub fn default_model_for_platform(platform: &str) -> Option<&'static str> {
    match platform.to_ascii_lowercase().as_str() {
        "cd32" => Some("CD32"),
        "cdtv" => Some("CDTV"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_lookup_is_case_insensitive() {
        assert_eq!(get_model_config("a1200").id, "A1200");
        assert_eq!(get_model_config("cd32").id, "CD32");
    }

    #[test]
    fn test_unknown_model_falls_back_to_a500() {
        assert_eq!(get_model_config("").id, "A500");
        assert_eq!(get_model_config("A9000").id, "A500");
    }

    #[test]
    fn test_only_cd_models_have_ext_roms() {
        for model in MODELS {
            assert!(!model.kickstarts.is_empty(), "{} has no kickstarts", model.id);
            let cd = model.id == "CD32" || model.id == "CDTV";
            assert_eq!(!model.ext_roms.is_empty(), cd, "{}", model.id);
        }
    }

    #[test]
    fn test_model_ids_are_unique() {
        let mut ids: Vec<&str> = MODELS.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), MODELS.len());
    }

    #[test]
    fn test_default_model_for_platform() {
        assert_eq!(default_model_for_platform("CD32"), Some("CD32"));
        assert_eq!(default_model_for_platform("cdtv"), Some("CDTV"));
        assert_eq!(default_model_for_platform("amiga"), None);
    }
}
