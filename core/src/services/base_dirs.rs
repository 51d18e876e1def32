//! Base resource directories
//!
//! Relative paths in a configuration are resolved against per-kind
//! directories below a single base directory:
//!
//! ```text
//! <base>/Floppies
//! <base>/CD-ROMs
//! <base>/Hard Drives
//! <base>/Kickstarts
//! ```

use std::path::{Path, PathBuf};

use crate::config::ResourceKind;

/// Project identity used for platform-specific directories.
const QUALIFIER: &str = "io.fs-launcher";
const APPLICATION: &str = "FS Launcher";
/// Name of the base directory inside the user's documents folder.
const BASE_DIR_NAME: &str = "FS-UAE";

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\FS Launcher\config`
/// On macOS: `~/Library/Application Support/io.fs-launcher.FS-Launcher`
/// On Linux: `~/.config/FS Launcher`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from(QUALIFIER, "", APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Base directory holding the resource subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirectories {
    base: PathBuf,
}

impl BaseDirectories {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The platform default: `FS-UAE` in the user's documents folder, or the
    /// application data directory when there is no documents folder.
    pub fn from_platform() -> Option<Self> {
        let documents = directories::UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|d| d.join(BASE_DIR_NAME)));
        documents
            .or_else(|| {
                directories::ProjectDirs::from(QUALIFIER, "", APPLICATION)
                    .map(|dirs| dirs.data_dir().to_path_buf())
            })
            .map(Self::new)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn floppies_dir(&self) -> PathBuf {
        self.base.join("Floppies")
    }

    pub fn cdroms_dir(&self) -> PathBuf {
        self.base.join("CD-ROMs")
    }

    pub fn hard_drives_dir(&self) -> PathBuf {
        self.base.join("Hard Drives")
    }

    pub fn kickstarts_dir(&self) -> PathBuf {
        self.base.join("Kickstarts")
    }

    /// Directory that relative paths of the given kind resolve against.
    pub fn dir_for(&self, kind: ResourceKind) -> PathBuf {
        match kind {
            ResourceKind::Floppy => self.floppies_dir(),
            ResourceKind::CdRom => self.cdroms_dir(),
            ResourceKind::HardDrive => self.hard_drives_dir(),
            ResourceKind::Kickstart => self.kickstarts_dir(),
        }
    }

    /// Expand `~/`, `$HOME/` and `$BASE/` prefixes.
    pub fn expand_path(&self, path: &str) -> PathBuf {
        let home = || directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        if let Some(rest) = path.strip_prefix("$BASE/") {
            return self.base.join(rest);
        }
        if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("$HOME/"))
            && let Some(home) = home()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    /// Locate a configured path on disk.
    ///
    /// The expanded path is tried as given, then relative to the resource
    /// directory of `kind`. Returns `None` if neither exists.
    pub fn resolve(&self, path: &str, kind: ResourceKind) -> Option<PathBuf> {
        let expanded = self.expand_path(path);
        if expanded.exists() {
            return Some(expanded);
        }
        let in_dir = self.dir_for(kind).join(&expanded);
        in_dir.exists().then_some(in_dir)
    }
}
