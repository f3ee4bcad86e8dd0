//! Persistent settings.
//!
//! Scalar values (master password, re-encrypt flag, active key) and keyed
//! values (the per-key password cache) live in `<home>/settings.toml`.
//! Every write is flushed to disk immediately.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::core::constants::{self, settings as keys};
use crate::core::types::PasswordCache;
use crate::error::{ConfigError, Result};

/// Key/value settings storage.
///
/// Implementations use interior mutability: the controller shares one store
/// between its handlers and background tasks.
pub trait SettingsStore: Send + Sync {
    /// Read a scalar value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a scalar value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// All values stored under `scope`.
    fn keyed(&self, scope: &str) -> BTreeMap<String, String>;

    /// Write one value under `scope`.
    fn set_keyed(&self, scope: &str, key: &str, value: &str) -> Result<()>;

    /// Remove one value under `scope`. Removing a missing key is not an error.
    fn delete_keyed(&self, scope: &str, key: &str) -> Result<()>;

    /// Read one value under `scope`.
    fn get_keyed(&self, scope: &str, key: &str) -> Option<String> {
        self.keyed(scope).remove(key)
    }
}

/// Pending re-encryption state (`encryption.shouldReencrypt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reencrypt {
    No,
    Yes,
    /// Ask the user at the next opportunity
    Notify,
}

impl Reencrypt {
    pub fn as_setting(self) -> &'static str {
        match self {
            Reencrypt::No => "0",
            Reencrypt::Yes => "1",
            Reencrypt::Notify => "2",
        }
    }

    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("1") => Reencrypt::Yes,
            Some("2") => Reencrypt::Notify,
            _ => Reencrypt::No,
        }
    }
}

/// Read the pending re-encryption state.
pub fn should_reencrypt(store: &dyn SettingsStore) -> Reencrypt {
    Reencrypt::from_setting(store.get(keys::SHOULD_REENCRYPT).as_deref())
}

/// Clear the pending re-encryption state.
pub fn clear_reencrypt(store: &dyn SettingsStore) -> Result<()> {
    store.set(keys::SHOULD_REENCRYPT, Reencrypt::No.as_setting())
}

/// The cached per-key passwords.
pub fn password_cache(store: &dyn SettingsStore) -> PasswordCache {
    store.keyed(keys::PASSWORD_CACHE)
}

/// The stored master password, empty when unset.
pub fn master_password(store: &dyn SettingsStore) -> String {
    store.get(keys::MASTER_PASSWORD).unwrap_or_default()
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default)]
    keyed: BTreeMap<String, BTreeMap<String, String>>,
}

/// TOML file-backed settings store
pub struct FileSettings {
    path: PathBuf,
    data: Mutex<SettingsFile>,
}

impl FileSettings {
    /// Open `<home>/settings.toml`; a missing file starts empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the file exists but is malformed.
    pub fn open(home: &Path) -> Result<Self> {
        let path = home.join(constants::SETTINGS_FILE);
        debug!(path = %path.display(), "opening settings");

        let data = if path.exists() {
            let contents =
                std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
                    path: path.display().to_string(),
                    source,
                })?;
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            SettingsFile::default()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, SettingsFile> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `edit` to a copy, write the copy, then swap it in.
    ///
    /// The in-memory state only changes once the file is on disk. `edit`
    /// returns false when there is nothing to write.
    fn commit(&self, edit: impl FnOnce(&mut SettingsFile) -> bool) -> Result<()> {
        let mut data = self.lock();
        let mut next = data.clone();
        if !edit(&mut next) {
            return Ok(());
        }
        self.flush(&next)?;
        *data = next;
        Ok(())
    }

    fn flush(&self, data: &SettingsFile) -> Result<()> {
        let contents = toml::to_string_pretty(data).map_err(ConfigError::Serialize)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Replace atomically: temp file, then rename.
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.commit(|data| {
            data.values.insert(key.to_string(), value.to_string());
            true
        })?;
        debug!(key, "setting saved");
        Ok(())
    }

    fn keyed(&self, scope: &str) -> BTreeMap<String, String> {
        self.lock().keyed.get(scope).cloned().unwrap_or_default()
    }

    fn set_keyed(&self, scope: &str, key: &str, value: &str) -> Result<()> {
        self.commit(|data| {
            data.keyed
                .entry(scope.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
            true
        })?;
        debug!(scope, key, "keyed setting saved");
        Ok(())
    }

    fn delete_keyed(&self, scope: &str, key: &str) -> Result<()> {
        let mut removed = false;
        self.commit(|data| {
            removed = data
                .keyed
                .get_mut(scope)
                .and_then(|m| m.remove(key))
                .is_some();
            removed
        })?;
        if removed {
            debug!(scope, key, "keyed setting deleted");
        }
        Ok(())
    }
}
