//! Platform handler abstraction
//!
//! Amiga-family records are converted by the built-in
//! [`AmigaValueLoader`](crate::config::AmigaValueLoader). Every other
//! platform registers a [`PlatformHandler`] that turns a game database record
//! into a configuration mapping.

use crate::config::ConfigValues;
use crate::error::ConfigError;

use super::{FileIndex, Settings};

/// Collaborators available to platform loaders.
pub struct LoaderContext<'a> {
    pub settings: &'a dyn Settings,
    pub file_index: &'a dyn FileIndex,
}

/// Converts a record of one platform into configuration values.
pub trait PlatformLoader {
    fn load_values(&self, values: &ConfigValues) -> Result<ConfigValues, ConfigError>;
}

/// Trait for platform-specific configuration support.
///
/// # Example
///
/// ```ignore
/// struct ArcadeHandler;
///
/// impl PlatformHandler for ArcadeHandler {
///     fn platform_id(&self) -> &'static str { "arcade" }
///     fn get_loader(&self, _context: &LoaderContext) -> Box<dyn PlatformLoader> {
///         Box::new(ArcadeLoader)
///     }
/// }
/// ```
pub trait PlatformHandler: Send + Sync {
    /// Lowercase platform identifier, as found in the `platform` record field.
    fn platform_id(&self) -> &'static str;

    fn get_loader(&self, context: &LoaderContext<'_>) -> Box<dyn PlatformLoader>;
}

/// Registry of handlers for non-Amiga platforms.
pub struct PlatformRegistry {
    handlers: Vec<Box<dyn PlatformHandler>>,
}

impl PlatformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a platform handler.
    pub fn register(&mut self, handler: Box<dyn PlatformHandler>) {
        self.handlers.push(handler);
    }

    /// Handler for a platform identifier (case-insensitive).
    pub fn create(&self, platform_id: &str) -> Result<&dyn PlatformHandler, ConfigError> {
        self.handlers
            .iter()
            .find(|h| h.platform_id().eq_ignore_ascii_case(platform_id))
            .map(|h| h.as_ref())
            .ok_or_else(|| ConfigError::UnsupportedPlatform(platform_id.to_string()))
    }

    /// Identifiers of all registered platforms.
    pub fn platform_ids(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.platform_id()).collect()
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}
