//! File index: resolves content checksums to local files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use fs_launcher_shared::{MAX_CHECKSUM_BYTES, is_remote_uri};
use hashbrown::HashMap;
use walkdir::WalkDir;

use crate::checksum::ChecksumTool;

/// Lookup of locally available files by content checksum.
///
/// Not finding a file is a normal outcome, never an error.
pub trait FileIndex: Send + Sync {
    /// Path of a local file whose checksum is `sha1`, if any.
    fn find_by_sha1(&self, sha1: &str) -> Option<String>;

    /// Open a local file. Remote URIs are never fetched and yield `None`.
    fn open(&self, uri: &str) -> Option<Box<dyn Read + Send>>;
}

/// In-memory index built by scanning directories.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFileIndex {
    by_sha1: HashMap<String, PathBuf>,
}

impl DirectoryFileIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan directories recursively and index every file up to the checksum
    /// size ceiling. Files are hashed ROM-aware so encrypted kickstarts are
    /// found under their plain checksum. The first file seen for a checksum
    /// wins.
    pub fn scan(dirs: &[PathBuf], tool: &ChecksumTool) -> Self {
        let mut index = Self::new();
        for dir in dirs {
            index.scan_dir(dir, tool);
        }
        index
    }

    fn scan_dir(&mut self, dir: &Path, tool: &ChecksumTool) {
        if !dir.is_dir() {
            tracing::debug!("Skipping missing directory {}", dir.display());
            return;
        }
        for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if metadata.len() > MAX_CHECKSUM_BYTES {
                continue;
            }
            match tool.checksum_rom(path) {
                Ok(sha1) => {
                    tracing::debug!("Indexed {} ({})", path.display(), sha1);
                    self.by_sha1.entry(sha1).or_insert_with(|| path.to_path_buf());
                }
                Err(e) => tracing::warn!("Failed to index {}: {}", path.display(), e),
            }
        }
    }

    /// Register a file under a known checksum.
    pub fn insert(&mut self, sha1: impl Into<String>, path: impl Into<PathBuf>) {
        self.by_sha1.insert(sha1.into(), path.into());
    }

    pub fn len(&self) -> usize {
        self.by_sha1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sha1.is_empty()
    }

    /// All indexed entries, sorted by checksum.
    pub fn entries(&self) -> Vec<(&str, &Path)> {
        let mut entries: Vec<(&str, &Path)> = self
            .by_sha1
            .iter()
            .map(|(sha1, path)| (sha1.as_str(), path.as_path()))
            .collect();
        entries.sort_unstable_by_key(|(sha1, _)| *sha1);
        entries
    }
}

impl FileIndex for DirectoryFileIndex {
    fn find_by_sha1(&self, sha1: &str) -> Option<String> {
        self.by_sha1
            .get(sha1)
            .map(|path| path.to_string_lossy().into_owned())
    }

    fn open(&self, uri: &str) -> Option<Box<dyn Read + Send>> {
        if is_remote_uri(uri) {
            return None;
        }
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        File::open(path)
            .ok()
            .map(|file| Box::new(file) as Box<dyn Read + Send>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::sha1_hex;
    use tempfile::TempDir;

    #[test]
    fn test_empty_index_finds_nothing() {
        let index = DirectoryFileIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.find_by_sha1("abc"), None);
    }

    #[test]
    fn test_scan_indexes_nested_files() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("Amiga Forever");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("a.rom"), b"rom a").unwrap();
        std::fs::write(nested.join("b.rom"), b"rom b").unwrap();

        let index = DirectoryFileIndex::scan(&[temp.path().to_path_buf()], &ChecksumTool::default());
        assert_eq!(index.len(), 2);

        let found = index.find_by_sha1(&sha1_hex(b"rom b")).unwrap();
        assert!(found.ends_with("b.rom"));
    }

    #[test]
    fn test_scan_skips_missing_dir() {
        let index = DirectoryFileIndex::scan(
            &[PathBuf::from("/nonexistent/path/that/does/not/exist")],
            &ChecksumTool::default(),
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_open_local_and_file_uri() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kick.rom");
        std::fs::write(&path, b"rom").unwrap();
        let index = DirectoryFileIndex::new();

        let mut content = String::new();
        index
            .open(path.to_str().unwrap())
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "rom");

        let uri = format!("file://{}", path.display());
        assert!(index.open(&uri).is_some());
    }

    #[test]
    fn test_open_never_fetches_remote() {
        let index = DirectoryFileIndex::new();
        assert!(index.open("https://example.com/kick.rom").is_none());
    }

    #[test]
    fn test_entries_sorted() {
        let mut index = DirectoryFileIndex::new();
        index.insert("bbb", "/b");
        index.insert("aaa", "/a");
        let entries = index.entries();
        assert_eq!(entries[0].0, "aaa");
        assert_eq!(entries[1].0, "bbb");
    }
}
