//! Persistent storage for the session token.
//!
//! Exactly one token is kept, under [`TOKEN_KEY`]. The session manager reads
//! it at bootstrap and writes through on every sign-in and sign-out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage key (and default file name) of the persisted token.
pub const TOKEN_KEY: &str = "token";

/// Errors raised by a token store backend.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("token store lock poisoned")]
    Poisoned,
}

/// Device storage for the session token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Persist `token`, replacing any previous one.
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the persisted token. Erasing an absent token is not an error.
    fn erase(&self) -> Result<(), TokenStoreError>;
}

// ============================================================================
// File-backed store
// ============================================================================

/// Keeps the token in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim_end();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, token).map_err(|e| self.io_error(e))
    }

    fn erase(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Keeps the token for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let guard = self.token.lock().map_err(|_| TokenStoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut guard = self.token.lock().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn erase(&self) -> Result<(), TokenStoreError> {
        let mut guard = self.token.lock().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join(TOKEN_KEY));

        assert_eq!(store.load().unwrap(), None);

        store.save("tok-123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-123"));

        store.save("tok-456").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-456"));

        store.erase().unwrap();
        assert_eq!(store.load().unwrap(), None);

        // Erasing twice is fine.
        store.erase().unwrap();
    }

    #[test]
    fn file_store_ignores_trailing_newline_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_KEY);

        fs::write(&path, "abc\n").unwrap();
        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        fs::write(&path, "").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn memory_store_lifecycle() {
        let store = MemoryTokenStore::with_token("seed");
        assert_eq!(store.load().unwrap().as_deref(), Some("seed"));

        store.erase().unwrap();
        assert_eq!(store.load().unwrap(), None);

        store.save("next").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("next"));
    }
}
