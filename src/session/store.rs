//! Persistent key-value storage for the current session.
//!
//! DESIGN
//! ======
//! Two keys are stored: `token` (raw bearer token) and `currentUser` (the
//! serialized [`Session`]). Backends take both keys in one batch so a token
//! can never be written or cleared without its user. The file backend keeps
//! an in-memory copy and persists with write-to-temp + rename.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use super::Session;

pub const TOKEN_KEY: &str = "token";
pub const CURRENT_USER_KEY: &str = "currentUser";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("session serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value backend holding session entries.
pub trait SessionStorage: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// Write every entry in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the batch; the previous
    /// entries are left in place.
    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    /// Remove every key in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the removal.
    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY BACKEND
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_owned(), value.clone());
        }
        Ok(())
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}

// =============================================================================
// FILE BACKEND
// =============================================================================

/// JSON-object file on disk, e.g. `{"token": "...", "currentUser": "{...}"}`.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the file at `path`. A missing or unreadable file opens empty.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed session file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "session file unreadable");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if entries.is_empty() {
            return self.erase();
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.replace_contents(&serde_json::to_string_pretty(entries)?)
    }

    /// Blank the file before deleting it, so a failed delete still leaves
    /// no credentials behind.
    fn erase(&self) -> Result<(), StorageError> {
        self.erase_with(|path| std::fs::remove_file(path))
    }

    fn erase_with(&self, remove: impl FnOnce(&Path) -> io::Result<()>) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        let blanked = self.replace_contents("{}");
        match remove(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => match blanked {
                Ok(()) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "session file blanked but not removed");
                    Ok(())
                }
                Err(_) => Err(e.into()),
            },
        }
    }

    fn replace_contents(&self, text: &str) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut next = self.entries.clone();
        for (key, value) in entries {
            next.insert((*key).to_owned(), value.clone());
        }
        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.entries.remove(*key);
        }
        self.persist(&self.entries)
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Typed view over a [`SessionStorage`] backend.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(TOKEN_KEY)
            .filter(|t| !t.is_empty())
    }

    /// Parse the stored user, treating malformed JSON as absent.
    #[must_use]
    pub fn load_user(&self) -> Option<Session> {
        let raw = self.storage.get(CURRENT_USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "stored session is malformed; starting logged out");
                None
            }
        }
    }

    /// Write token and user together.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage backend fails.
    pub fn save(&mut self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(session)?;
        self.storage
            .set_all(&[(TOKEN_KEY, session.token.clone()), (CURRENT_USER_KEY, user)])
    }

    /// Remove token and user together.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot persist the removal.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove_all(&[TOKEN_KEY, CURRENT_USER_KEY])
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
