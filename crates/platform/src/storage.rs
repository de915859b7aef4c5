//! Persisted-state storage abstraction
//!
//! A minimal key/bytes contract over whatever non-volatile store the node
//! has (LittleFS on the device, a directory on the desktop, memory in tests).

/// Byte-addressable persisted storage
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Check if `key` exists
    fn exists(&mut self, key: &str) -> Result<bool, Self::Error>;

    /// Read the full contents stored under `key`, `None` if absent
    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Replace the contents stored under `key`
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Generic storage failure used by in-memory and device stores
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Filesystem could not be mounted
    #[error("storage unavailable")]
    Unavailable,
    /// Write did not complete
    #[error("write to {0} failed")]
    WriteFailed(String),
}

impl<S: Storage + ?Sized> Storage for &mut S {
    type Error = S::Error;

    fn exists(&mut self, key: &str) -> Result<bool, Self::Error> {
        (**self).exists(key)
    }

    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(key, bytes)
    }
}
