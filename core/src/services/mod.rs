//! Collaborators of the configuration store
//!
//! The store never reaches for global state. Everything it needs from the
//! outside world is handed to it in a [`ConfigServices`] bundle.

mod base_dirs;
mod devices;
mod file_index;
mod platform;
mod settings;

use std::sync::Arc;

pub use base_dirs::{BaseDirectories, config_dir};
pub use devices::{InputDevice, InputDevices, StaticInputDevices};
pub use file_index::{DirectoryFileIndex, FileIndex};
pub use platform::{LoaderContext, PlatformHandler, PlatformLoader, PlatformRegistry};
pub use settings::{INITIALIZE_FROM_CONFIG, LauncherSettings, Settings, default_settings};

/// Everything the configuration store consults while resolving derived fields.
#[derive(Clone)]
pub struct ConfigServices {
    /// Resolves ROM checksums to local files
    pub file_index: Arc<dyn FileIndex>,
    /// Session settings outside the configuration schema
    pub settings: Arc<dyn Settings>,
    /// Connected joysticks
    pub devices: Arc<dyn InputDevices>,
    /// Handlers for non-Amiga platforms
    pub platforms: Arc<PlatformRegistry>,
    /// Base resource directories for relative paths
    pub directories: BaseDirectories,
}

impl ConfigServices {
    /// Services with no local files, no joysticks and no platform handlers.
    pub fn new(directories: BaseDirectories) -> Self {
        Self {
            file_index: Arc::new(DirectoryFileIndex::default()),
            settings: Arc::new(LauncherSettings::default()),
            devices: Arc::new(StaticInputDevices::default()),
            platforms: Arc::new(PlatformRegistry::new()),
            directories,
        }
    }

    pub fn with_file_index(mut self, file_index: Arc<dyn FileIndex>) -> Self {
        self.file_index = file_index;
        self
    }

    pub fn with_settings(mut self, settings: Arc<dyn Settings>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_devices(mut self, devices: Arc<dyn InputDevices>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_platforms(mut self, platforms: Arc<PlatformRegistry>) -> Self {
        self.platforms = platforms;
        self
    }
}
