use std::io::{self, Read};

use mygit_types::ObjectId;
use sha1::{Digest, Sha1};

/// SHA-1 content hasher.
///
/// Payloads are hashed as-is: no type header, no length prefix. A blob's
/// fingerprint is therefore the plain SHA-1 of the file bytes, and a tree or
/// commit's fingerprint is the SHA-1 of its text serialization.
#[derive(Debug, Default)]
pub struct ContentHasher {
    inner: Sha1,
}

impl ContentHasher {
    /// Create an empty incremental hasher.
    pub fn new() -> Self {
        Self { inner: Sha1::new() }
    }

    /// Feed more bytes into the digest.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finish and return the fingerprint.
    pub fn finalize(self) -> ObjectId {
        let digest = self.inner.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest);
        ObjectId::from_hash(bytes)
    }

    /// Fingerprint a byte slice in one shot.
    pub fn hash(data: &[u8]) -> ObjectId {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Fingerprint everything readable from `reader` (8 KiB buffered).
    pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<ObjectId> {
        let mut hasher = Self::new();
        let mut buffer = [0u8; 8192];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
        Ok(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn hello_matches_known_sha1() {
        let id = ContentHasher::hash(b"hello");
        assert_eq!(id.to_hex(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn empty_input_matches_known_sha1() {
        let id = ContentHasher::hash(b"");
        assert_eq!(id.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn hash_is_deterministic() {
        let data = b"hello world";
        assert_eq!(ContentHasher::hash(data), ContentHasher::hash(data));
    }

    #[test]
    fn different_data_different_hash() {
        assert_ne!(ContentHasher::hash(b"hello"), ContentHasher::hash(b"world"));
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut hasher = ContentHasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(hasher.finalize(), ContentHasher::hash(b"hello world"));
    }

    #[test]
    fn hash_reader_matches_bytes() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("large.bin");
        let mut file = std::fs::File::create(&path)?;
        let chunk = vec![0xAB; 100_000];
        for _ in 0..3 {
            file.write_all(&chunk)?;
        }
        drop(file);

        let streamed = ContentHasher::hash_reader(std::fs::File::open(&path)?)?;
        let direct = ContentHasher::hash(&std::fs::read(&path)?);
        assert_eq!(streamed, direct);
        Ok(())
    }
}
