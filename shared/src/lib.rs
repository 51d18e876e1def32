//! Shared types for the FS launcher.
//!
//! Hardware tables and pure helpers used by both the configuration core and
//! the command-line front end. Nothing in here touches the live configuration.

pub mod amiga;
pub mod fs;
pub mod naming;

pub use amiga::{
    AmigaModel, INTERNAL_KICKSTART, INTERNAL_ROM_SHA1, MAX_CDROM_DRIVES, MAX_CDROM_IMAGES,
    MAX_FLOPPY_DRIVES, MAX_FLOPPY_IMAGES, MAX_HARD_DRIVES, default_model_for_platform,
    get_model_config,
};
pub use fs::{MAX_CHECKSUM_BYTES, is_remote_uri, read_file_with_limit};
pub use naming::{config_base_name, create_fs_name};
