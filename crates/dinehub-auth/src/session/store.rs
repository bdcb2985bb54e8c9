//! Access credential persistence.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use dinehub_core::error::AppError;

/// Persists the access credential between runs.
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// The stored credential, if any.
    fn load(&self) -> Option<String>;

    /// Replace the stored credential.
    fn save(&self, token: &str) -> Result<(), AppError>;

    /// Remove the stored credential. Removing nothing is not an error.
    fn clear(&self) -> Result<(), AppError>;
}

/// Keeps the credential in a single file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read credential: {}", e);
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)?;
        tracing::debug!(path = %self.path.display(), "Credential stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the credential in memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save(&self, token: &str) -> Result<(), AppError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
