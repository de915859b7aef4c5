//! Local filesystem Storage implementation for the desktop simulator.
//!
//! `LocalFileStorage` implements `platform::Storage` using `std::fs`.
//! Keys are flash-filesystem style paths (`/last-displayed.json`) and are
//! resolved relative to the `state_root` provided at construction.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::storage::Storage;

/// Error type for local filesystem operations.
#[derive(Debug, thiserror::Error)]
#[error("local storage error: {0}")]
pub struct LocalStorageError(#[from] pub std::io::Error);

/// A `platform::Storage` implementation backed by `std::fs`.
///
/// # Example
/// ```no_run
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
/// let mut storage = LocalFileStorage::new("/tmp/node-state");
/// let bytes = storage.read("/last-displayed.json").unwrap();
/// ```
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a new storage rooted at `state_root`.
    #[must_use]
    pub fn new(state_root: impl Into<PathBuf>) -> Self {
        Self { root: state_root.into() }
    }

    /// Create from the `NODE_STATE_DIR` environment variable.
    ///
    /// Returns `None` if `NODE_STATE_DIR` is not set or is not valid UTF-8.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("NODE_STATE_DIR").ok().map(Self::new)
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;

    fn exists(&mut self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(key).is_file())
    }

    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        match fs::read(self.resolve(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LocalStorageError(e)),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.root)?;
        let full = self.resolve(key);
        fs::write(&full, bytes)?;
        tracing::debug!(path = %full.display(), len = bytes.len(), "state written");
        Ok(())
    }
}
