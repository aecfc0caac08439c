//! Local JSON file storage for state that lives outside the remote document.
//!
//! Storage layout:
//! ```text
//! ~/.local/share/kitvault/
//! ├── cache.json           # last fetched remote catalog + fetch time
//! ├── working.json         # working copy with pending edits
//! ├── favorites.json       # favorite kit ids
//! └── admin_session.json   # admin session flag
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Kinds of locally persisted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalKind {
    Cache,
    Working,
    Favorites,
    AdminSession,
}

impl LocalKind {
    pub fn filename(self) -> &'static str {
        match self {
            LocalKind::Cache => "cache.json",
            LocalKind::Working => "working.json",
            LocalKind::Favorites => "favorites.json",
            LocalKind::AdminSession => "admin_session.json",
        }
    }
}

/// Storage for local JSON files under a single data directory.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    data_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a file kind.
    pub fn path(&self, kind: LocalKind) -> PathBuf {
        self.data_dir.join(kind.filename())
    }

    pub fn exists(&self, kind: LocalKind) -> bool {
        self.path(kind).exists()
    }

    /// Loads and deserializes a file.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load<T: DeserializeOwned>(&self, kind: LocalKind) -> Result<Option<T>, StorageError> {
        let path = self.path(kind);

        match fs::read(&path) {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| StorageError::Corrupt(path, e.to_string()))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    /// Loads a file, treating corruption and I/O failures as absence.
    pub fn load_lenient<T: DeserializeOwned>(&self, kind: LocalKind) -> Option<T> {
        match self.load(kind) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring unreadable local file: {}", e);
                None
            }
        }
    }

    /// Serializes and writes a file, creating the data directory if needed.
    pub fn save<T: Serialize>(&self, kind: LocalKind, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.path(kind);
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StorageError::Corrupt(path.clone(), e.to_string()))?;

        fs::write(&path, bytes).map_err(|e| StorageError::IoError(path, e))?;

        Ok(())
    }

    /// Removes a file. Missing files are not an error.
    pub fn remove(&self, kind: LocalKind) -> Result<(), StorageError> {
        let path = self.path(kind);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }
}

/// Errors that can occur during local storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// File exists but does not hold the expected JSON.
    Corrupt(PathBuf, String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::Corrupt(path, e) => {
                write!(f, "Invalid data in {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::Corrupt(_, _) => None,
        }
    }
}
