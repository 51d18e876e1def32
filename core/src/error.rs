//! Error and warning types for configuration handling

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building the schema or reading a configuration source.
///
/// Source errors are recoverable: every load entry point falls back to the
/// default configuration before returning them.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The same key was declared twice in a schema.
    #[error("Duplicate configuration key in schema: {0}")]
    DuplicateKey(String),

    /// A derived-field rule references a key the schema does not declare.
    #[error("Derived-field rule references undeclared key: {0}")]
    UndeclaredRuleKey(String),

    /// A configuration file could not be read.
    #[error("Cannot read configuration {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration text could not be parsed.
    #[error("Malformed configuration at line {line}: {message}")]
    SourceMalformed { line: usize, message: String },

    /// A game database record could not be converted.
    #[error("Malformed game record: {0}")]
    MalformedRecord(String),

    /// No platform handler is registered for a platform identifier.
    #[error("Unsupported platform: {0:?}")]
    UnsupportedPlatform(String),

    /// Settings file could not be (de)serialized.
    #[error("Settings format error: {0}")]
    SettingsFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A degraded but non-fatal outcome of resolving derived fields.
///
/// Warnings never stop a load; the affected field keeps an explicit fallback
/// value and the calling layer decides how to surface the condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No acceptable kickstart is available; the internal ROM is used.
    NoKickstart { model: String },
    /// No acceptable extended ROM is available for a model that needs one.
    NoExtendedKickstart { model: String },
    /// A referenced resource file does not exist.
    ResourceMissing { key: String, path: String },
    /// A resource file is larger than the checksum size ceiling.
    ChecksumSkipped { key: String, path: String, size: u64 },
    /// A resource file exists but could not be read.
    ChecksumFailed {
        key: String,
        path: String,
        message: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoKickstart { model } => {
                write!(f, "No suitable kickstart found for {model}, using internal ROM")
            }
            Self::NoExtendedKickstart { model } => {
                write!(f, "No suitable extended kickstart found for {model}")
            }
            Self::ResourceMissing { key, path } => write!(f, "{key}: {path} does not exist"),
            Self::ChecksumSkipped { key, path, size } => {
                write!(f, "{key}: not checksumming large file {path} ({size} bytes)")
            }
            Self::ChecksumFailed { key, path, message } => {
                write!(f, "{key}: failed to checksum {path}: {message}")
            }
        }
    }
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub warnings: Vec<ConfigWarning>,
}

impl LoadReport {
    /// Whether any derived field fell back to a degraded value.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = ConfigWarning::NoKickstart {
            model: "A500".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "No suitable kickstart found for A500, using internal ROM"
        );
    }

    #[test]
    fn test_source_unreadable_display_names_path() {
        let err = ConfigError::SourceUnreadable {
            path: PathBuf::from("/tmp/missing.fs-uae"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.fs-uae"));
    }

    #[test]
    fn test_empty_report_is_not_degraded() {
        assert!(!LoadReport::default().is_degraded());
    }
}
