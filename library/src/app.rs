//! Application context
//!
//! Owns the launcher settings and the configuration store for one run of the
//! command-line front end. Commands receive the context instead of reaching
//! for global state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use fs_launcher_core::services::config_dir;
use fs_launcher_core::{
    BaseDirectories, ChecksumTool, ConfigServices, ConfigStore, DirectoryFileIndex,
    LauncherSettings,
};

/// Settings file name inside the platform configuration directory.
pub const SETTINGS_FILE: &str = "settings.toml";

pub struct LauncherContext {
    pub settings: Arc<LauncherSettings>,
    settings_file: Option<PathBuf>,
    pub store: ConfigStore,
}

impl LauncherContext {
    /// Build a context over `base_dir`, or the platform default base
    /// directory when none is given.
    ///
    /// # Errors
    ///
    /// Returns an error if no base directory is given and the platform has
    /// no home directory.
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let directories = match base_dir {
            Some(dir) => BaseDirectories::new(dir),
            None => BaseDirectories::from_platform()
                .context("Could not determine the base directory, use --base-dir")?,
        };
        let settings_file = config_dir().map(|dir| dir.join(SETTINGS_FILE));
        Ok(Self::with_paths(directories, settings_file))
    }

    /// Build a context with explicit paths. Kickstarts below the base
    /// directory are indexed immediately.
    pub fn with_paths(directories: BaseDirectories, settings_file: Option<PathBuf>) -> Self {
        let settings = Arc::new(
            settings_file
                .as_deref()
                .map(LauncherSettings::load)
                .unwrap_or_default(),
        );

        let kickstarts_dir = directories.kickstarts_dir();
        let tool = ChecksumTool::new(Some(kickstarts_dir.clone()));
        let index = DirectoryFileIndex::scan(&[kickstarts_dir], &tool);
        tracing::debug!("Indexed {} kickstart files", index.len());

        let services = ConfigServices::new(directories)
            .with_settings(settings.clone())
            .with_file_index(Arc::new(index));
        Self {
            settings,
            settings_file,
            store: ConfigStore::new(services),
        }
    }

    /// Persist the launcher settings, if a settings file is known.
    pub fn save_settings(&self) -> Result<()> {
        if let Some(path) = &self.settings_file {
            self.settings
                .save(path)
                .with_context(|| format!("Failed to save settings: {}", path.display()))?;
        }
        Ok(())
    }

    pub fn directories(&self) -> &BaseDirectories {
        &self.store.services().directories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_launcher_core::{FileIndex, Settings};
    use tempfile::TempDir;

    #[test]
    fn test_context_indexes_kickstarts() {
        let temp = TempDir::new().unwrap();
        let dirs = BaseDirectories::new(temp.path());
        std::fs::create_dir_all(dirs.kickstarts_dir()).unwrap();
        std::fs::write(dirs.kickstarts_dir().join("kick.rom"), b"rom").unwrap();

        let context = LauncherContext::with_paths(dirs, None);
        let rom_sha1 = fs_launcher_core::checksum::sha1_hex(b"rom");
        assert!(
            context
                .store
                .services()
                .file_index
                .find_by_sha1(&rom_sha1)
                .is_some()
        );
    }

    #[test]
    fn test_settings_round_trip() {
        let temp = TempDir::new().unwrap();
        let settings_file = temp.path().join("config").join(SETTINGS_FILE);

        let context = LauncherContext::with_paths(
            BaseDirectories::new(temp.path()),
            Some(settings_file.clone()),
        );
        context.settings.set("primary_joystick", "Competition Pro");
        context.save_settings().unwrap();

        let reloaded =
            LauncherContext::with_paths(BaseDirectories::new(temp.path()), Some(settings_file));
        assert_eq!(reloaded.settings.get("primary_joystick"), "Competition Pro");
    }
}
