//! Durable session vault implementations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{env, fs};

use thiserror::Error;

use crate::traits::SessionVault;
use crate::types::PersistedSession;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault io error: {0}")]
    Io(String),

    #[error("vault serialization error: {0}")]
    Serialize(String),
}

impl VaultError {
    fn io(err: impl core::fmt::Display) -> Self {
        Self::Io(err.to_string())
    }
}

/// Platform-default snapshot location
/// (`<data dir>/havencrm/session.json`, temp dir as a last resort).
pub fn default_vault_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("havencrm")
        .join("session.json")
}

/// JSON file vault.
///
/// The snapshot is one small record, so a single file with atomic
/// tmp-write-then-rename keeps the "token and principal never partially
/// present" guarantee without a database.
#[derive(Debug)]
pub struct FileVault {
    path: PathBuf,
}

impl FileVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_location() -> Self {
        Self::new(default_vault_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionVault for FileVault {
    fn load(&self) -> Result<Option<PersistedSession>, VaultError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(VaultError::io(e)),
        };

        match serde_json::from_slice::<PersistedSession>(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // Corrupt snapshot: treat as absent and clear it.
                tracing::warn!(path = %self.path.display(), error = %e, "discarding malformed session snapshot");
                if let Err(remove_err) = fs::remove_file(&self.path) {
                    if remove_err.kind() != ErrorKind::NotFound {
                        tracing::warn!(
                            path = %self.path.display(),
                            error = %remove_err,
                            "failed to remove malformed session snapshot"
                        );
                    }
                }
                Ok(None)
            }
        }
    }

    fn store(&self, session: &PersistedSession) -> Result<(), VaultError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(VaultError::io)?;
        }

        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| VaultError::Serialize(e.to_string()))?;

        // Write-then-rename so token and principal commit together.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(VaultError::io)?;
        fs::rename(&tmp, &self.path).map_err(VaultError::io)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::io(e)),
        }
    }
}

/// In-memory vault for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    inner: Mutex<Option<PersistedSession>>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionVault for InMemoryVault {
    fn load(&self) -> Result<Option<PersistedSession>, VaultError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| VaultError::Io("vault mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn store(&self, session: &PersistedSession) -> Result<(), VaultError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| VaultError::Io("vault mutex poisoned".to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| VaultError::Io("vault mutex poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
