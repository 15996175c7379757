//! Durable key-value storage for store snapshots.
//!
//! The store never touches the filesystem directly. It reads and writes
//! whole JSON blobs through a [`Backend`], keyed by a fixed storage name.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

/// A place snapshots can be loaded from and saved to.
pub trait Backend {
    /// Read the blob stored under `key`, or `None` if nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn save(&mut self, key: &str, contents: &str) -> io::Result<()>;
}

/// Stores each blob as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Use the given directory for storage.
    ///
    /// The directory is created on first write if it does not exist.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The directory blobs are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a given key is stored in.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Backend for FileBackend {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!("Loaded {} bytes from {}", contents.len(), path.display());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, key: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        // The previous snapshot stays intact until the rename.
        let tmp = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!("Saved {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}

/// Keeps blobs in memory. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blobs: HashMap<String, String>,
}

impl MemoryBackend {
    /// An empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob, as if it had been saved earlier.
    #[must_use]
    pub fn with_blob(mut self, key: impl Into<String>, contents: impl Into<String>) -> Self {
        self.blobs.insert(key.into(), contents.into());
        self
    }

    /// The blob currently stored under `key`.
    #[must_use]
    pub fn blob(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }
}

impl Backend for MemoryBackend {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, contents: &str) -> io::Result<()> {
        self.blobs.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn file_backend_missing_key_is_none() {
        let tmp = tempdir().unwrap();
        let backend = FileBackend::new(tmp.path().to_path_buf());
        assert_eq!(backend.load("nothing").unwrap(), None);
    }

    #[test]
    fn file_backend_creates_root_on_save() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("nested").join("data");
        let mut backend = FileBackend::new(root.clone());

        backend.save("blob", "{}").unwrap();

        assert!(root.join("blob.json").exists());
        assert!(!root.join(".blob.json.tmp").exists());
        assert_eq!(backend.load("blob").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn file_backend_overwrites_wholesale() {
        let tmp = tempdir().unwrap();
        let mut backend = FileBackend::new(tmp.path().to_path_buf());

        backend.save("blob", "first, and longer").unwrap();
        backend.save("blob", "second").unwrap();

        assert_eq!(backend.load("blob").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn memory_backend_round_trips() {
        let mut backend = MemoryBackend::new();
        backend.save("key", "value").unwrap();
        assert_eq!(backend.blob("key"), Some("value"));
        assert_eq!(backend.load("other").unwrap(), None);
    }
}
