//! Storage for the provider credential.
//!
//! The composition root owns a [`CredentialStore`] and hands the resolved
//! credential to the client. Nothing is stored implicitly.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

/// Fixed key the credential is stored under.
pub const CREDENTIAL_KEY: &str = "openai_api_key";
/// Environment variable that takes precedence over any stored credential.
pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to access credential file '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to parse credential file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize credentials: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub trait CredentialStore {
    /// Returns the stored credential, if any.
    fn get(&self) -> Result<Option<String>, CredentialError>;
    /// Stores `credential`, replacing any existing one.
    fn set(&self, credential: &str) -> Result<(), CredentialError>;
    /// Removes the stored credential. Clearing an empty store is a no-op.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, credential: &str) -> Result<(), CredentialError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// TOML key-value file holding the credential under [`CREDENTIAL_KEY`].
/// Other keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(CredentialError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        toml::from_str(&raw).map_err(|source| CredentialError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        let io_err = |source| CredentialError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string(entries)?;
        fs::write(&self.path, raw).map_err(io_err)?;
        restrict_permissions(&self.path).map_err(io_err)?;
        debug!(path = %self.path.display(), "credential file written");
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.read_entries()?.remove(CREDENTIAL_KEY))
    }

    fn set(&self, credential: &str) -> Result<(), CredentialError> {
        let mut entries = self.read_entries()?;
        entries.insert(CREDENTIAL_KEY.to_string(), credential.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut entries = self.read_entries()?;
        if entries.remove(CREDENTIAL_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Store,
}

/// Picks the credential for this process: `OPENAI_API_KEY` first, then the store.
pub fn resolve(
    store: &dyn CredentialStore,
) -> Result<Option<(String, CredentialSource)>, CredentialError> {
    resolve_with(env::var(CREDENTIAL_ENV).ok(), store)
}

fn resolve_with(
    from_env: Option<String>,
    store: &dyn CredentialStore,
) -> Result<Option<(String, CredentialSource)>, CredentialError> {
    if let Some(value) = from_env.filter(|value| !value.trim().is_empty()) {
        return Ok(Some((value.trim().to_string(), CredentialSource::Environment)));
    }
    Ok(store
        .get()?
        .filter(|value| !value.trim().is_empty())
        .map(|value| (value, CredentialSource::Store)))
}

/// Display form that never reveals more than the last four characters.
pub fn mask(credential: &str) -> String {
    let chars = credential.chars().collect::<Vec<_>>();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail = chars[chars.len() - 4..].iter().collect::<String>();
    format!("{}{tail}", "*".repeat(chars.len() - 4))
}
