//! Filesystem helpers shared by the configuration core and the CLI.

use std::path::Path;

use anyhow::{Context, Result};

/// Largest file that is read for content checksumming.
///
/// Bigger disk images (hard drive files, CD-ROM images) are not identified
/// by checksum.
pub const MAX_CHECKSUM_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB

/// URI schemes that refer to remote resources.
const REMOTE_SCHEMES: &[&str] = &["http://", "https://"];

/// Whether `path` is a remote URI rather than a local path.
///
/// Remote resources are never fetched while resolving a configuration; the
/// URI itself stands in for the content checksum.
pub fn is_remote_uri(path: &str) -> bool {
    REMOTE_SCHEMES.iter().any(|scheme| path.starts_with(scheme))
}

/// Read a file into memory with a size cap.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
    let len = metadata.len();
    if len > max_bytes {
        anyhow::bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            len,
            max_bytes
        );
    }
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}
