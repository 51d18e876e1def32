//! Content checksums for disk images and kickstart ROMs.
//!
//! Checksums are SHA-1 digests encoded as lowercase hex. They identify file
//! content for configuration matching, not for security.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use fs_launcher_shared::read_file_with_limit;
use sha1::{Digest, Sha1};

/// Header of an encrypted Cloanto kickstart image.
const CLOANTO_HEADER: &[u8] = b"AMIROMTYPE1";

/// Name of the key file used to decrypt Cloanto kickstarts.
const ROM_KEY_FILE: &str = "rom.key";

/// Upper bound for a `rom.key` file. Real keys are a few KiB.
const MAX_ROM_KEY_BYTES: u64 = 64 * 1024;

/// Computes file and ROM checksums.
#[derive(Debug, Clone, Default)]
pub struct ChecksumTool {
    /// Fallback location of `rom.key` when it is not next to the ROM.
    kickstarts_dir: Option<PathBuf>,
}

impl ChecksumTool {
    pub fn new(kickstarts_dir: Option<PathBuf>) -> Self {
        Self { kickstarts_dir }
    }

    /// SHA-1 of a file's raw content.
    pub fn checksum(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = Sha1::new();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(hex::encode(hasher.finalize()))
    }

    /// SHA-1 of a kickstart ROM.
    ///
    /// Encrypted Cloanto images are decrypted with `rom.key` first so that
    /// they hash identically to the plain ROM. Without a key file the raw
    /// content is hashed.
    pub fn checksum_rom(&self, path: &Path) -> io::Result<String> {
        let data = std::fs::read(path)?;
        let Some(encrypted) = data.strip_prefix(CLOANTO_HEADER) else {
            return Ok(sha1_hex(&data));
        };

        match self.find_rom_key(path) {
            Some(key) if !key.is_empty() => Ok(sha1_hex(&decrypt_rom(encrypted, &key))),
            _ => {
                tracing::debug!("No rom.key for encrypted ROM {}", path.display());
                Ok(sha1_hex(&data))
            }
        }
    }

    fn find_rom_key(&self, rom_path: &Path) -> Option<Vec<u8>> {
        let beside = rom_path.parent().map(|dir| dir.join(ROM_KEY_FILE));
        let fallback = self.kickstarts_dir.as_ref().map(|dir| dir.join(ROM_KEY_FILE));
        [beside, fallback]
            .into_iter()
            .flatten()
            .find_map(|candidate| read_file_with_limit(&candidate, MAX_ROM_KEY_BYTES).ok())
    }
}

/// SHA-1 of a byte slice, hex encoded.
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

/// XOR-decrypt a Cloanto ROM body with a repeating key.
fn decrypt_rom(encrypted: &[u8], key: &[u8]) -> Vec<u8> {
    encrypted
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ABC_SHA1: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";

    #[test]
    fn test_sha1_hex_known_vector() {
        assert_eq!(sha1_hex(b"abc"), ABC_SHA1);
    }

    #[test]
    fn test_internal_rom_sentinel_is_digest_of_identifier() {
        use fs_launcher_shared::{INTERNAL_KICKSTART, INTERNAL_ROM_SHA1};
        assert_eq!(sha1_hex(INTERNAL_KICKSTART.as_bytes()), INTERNAL_ROM_SHA1);
    }

    #[test]
    fn test_checksum_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.adf");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(ChecksumTool::default().checksum(&path).unwrap(), ABC_SHA1);
    }

    #[test]
    fn test_checksum_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(ChecksumTool::default().checksum(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_plain_rom_hashes_raw_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kick.rom");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(ChecksumTool::default().checksum_rom(&path).unwrap(), ABC_SHA1);
    }

    #[test]
    fn test_encrypted_rom_with_key_beside() {
        let dir = TempDir::new().unwrap();
        let key = b"\x01\x02";
        let encrypted: Vec<u8> = decrypt_rom(b"abc", key);
        let mut content = CLOANTO_HEADER.to_vec();
        content.extend_from_slice(&encrypted);
        std::fs::write(dir.path().join("kick.rom"), &content).unwrap();
        std::fs::write(dir.path().join(ROM_KEY_FILE), key).unwrap();

        let sha1 = ChecksumTool::default()
            .checksum_rom(&dir.path().join("kick.rom"))
            .unwrap();
        assert_eq!(sha1, ABC_SHA1);
    }

    #[test]
    fn test_encrypted_rom_with_key_in_kickstarts_dir() {
        let rom_dir = TempDir::new().unwrap();
        let key_dir = TempDir::new().unwrap();
        let key = b"secret";
        let mut content = CLOANTO_HEADER.to_vec();
        content.extend_from_slice(&decrypt_rom(b"abc", key));
        std::fs::write(rom_dir.path().join("kick.rom"), &content).unwrap();
        std::fs::write(key_dir.path().join(ROM_KEY_FILE), key).unwrap();

        let tool = ChecksumTool::new(Some(key_dir.path().to_path_buf()));
        let sha1 = tool.checksum_rom(&rom_dir.path().join("kick.rom")).unwrap();
        assert_eq!(sha1, ABC_SHA1);
    }

    #[test]
    fn test_encrypted_rom_without_key_hashes_raw() {
        let dir = TempDir::new().unwrap();
        let mut content = CLOANTO_HEADER.to_vec();
        content.extend_from_slice(b"xyz");
        std::fs::write(dir.path().join("kick.rom"), &content).unwrap();

        let sha1 = ChecksumTool::default()
            .checksum_rom(&dir.path().join("kick.rom"))
            .unwrap();
        assert_eq!(sha1, sha1_hex(&content));
    }
}
