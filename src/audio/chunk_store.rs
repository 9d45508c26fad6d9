//! Per-batch audio files on disk.

use crate::defaults;
use crate::error::Result;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// A chunk written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChunk {
    /// 1-based batch index the chunk came from.
    pub index: usize,
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Writes `<base>_chunk_<i>.wav` files into the output directory.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    dir: PathBuf,
}

impl ChunkStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Path of the chunk for batch `index`.
    pub fn chunk_path(&self, base_name: &str, index: usize) -> PathBuf {
        self.dir.join(format!(
            "{base_name}{}{index}.{}",
            defaults::CHUNK_SUFFIX,
            defaults::FILE_FORMAT
        ))
    }

    /// Write the bytes unchanged, replacing any file of the same name.
    ///
    /// The output directory is created first if it does not exist yet.
    pub fn persist(&self, base_name: &str, index: usize, bytes: &[u8]) -> Result<PersistedChunk> {
        self.ensure_dir()?;
        let path = self.chunk_path(base_name, index);
        fs::write(&path, bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(PersistedChunk {
            index,
            path,
            bytes_written: bytes.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_chunk_path_naming() {
        let store = ChunkStore::new("output");
        assert_eq!(
            store.chunk_path("episode", 3),
            PathBuf::from("output/episode_chunk_3.wav")
        );
    }

    #[test]
    fn test_ensure_dir_creates_nested_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = ChunkStore::new(tmp.path().join("a").join("b"));
        store.ensure_dir().unwrap();
        assert!(store.dir().is_dir());
        // Second call is a no-op
        store.ensure_dir().unwrap();
    }

    #[test]
    fn test_persist_writes_exact_bytes() {
        let tmp = TempDir::new().unwrap();
        let store = ChunkStore::new(tmp.path());

        let chunk = store.persist("ep", 1, b"RIFF1234").unwrap();
        assert_eq!(chunk.index, 1);
        assert_eq!(chunk.bytes_written, 8);
        assert_eq!(fs::read(&chunk.path).unwrap(), b"RIFF1234");
    }

    #[test]
    fn test_persist_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let store = ChunkStore::new(tmp.path());

        store.persist("ep", 2, b"old contents that are longer").unwrap();
        let chunk = store.persist("ep", 2, b"new").unwrap();
        assert_eq!(fs::read(&chunk.path).unwrap(), b"new");
    }

    #[test]
    fn test_persist_creates_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let store = ChunkStore::new(tmp.path().join("fresh").join("nested"));

        let chunk = store.persist("ep", 1, b"RIFF").unwrap();
        assert!(store.dir().is_dir());
        assert_eq!(chunk.bytes_written, 4);
        assert_eq!(fs::read(&chunk.path).unwrap(), b"RIFF");

        // Directory already there the second time
        store.persist("ep", 2, b"RIFF").unwrap();
    }
}
