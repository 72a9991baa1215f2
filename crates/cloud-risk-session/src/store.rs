//! Persisted token slot implementations.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::SessionError;

/// Durable single-value slot holding the session token.
pub trait TokenStore: Send + Sync {
    /// Reads the persisted token; `None` when the slot is empty.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Replaces the persisted token.
    fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Empties the slot. Succeeds when it is already empty.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Token slot backed by one file on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store writing to `path`. The file is created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(storage_error("read", &self.path, error)),
        }
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|error| storage_error("create", parent, error))?;
        }
        fs::write(&self.path, token).map_err(|error| storage_error("write", &self.path, error))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(storage_error("remove", &self.path, error)),
        }
    }
}

fn storage_error(action: &str, path: &Path, error: std::io::Error) -> SessionError {
    SessionError::Storage(format!("unable to {action} '{}': {error}", path.display()))
}

/// Process-local token slot for tests and ephemeral shells.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates a slot already holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot()? = None;
        Ok(())
    }
}

impl MemoryTokenStore {
    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, SessionError> {
        self.slot
            .lock()
            .map_err(|_| SessionError::Storage("token slot lock poisoned".to_string()))
    }
}
