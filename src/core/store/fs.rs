//! Filesystem-based master key storage.
//!
//! Stores one JSON record per key in `<home>/master_keys/<id>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::KeyStore;
use crate::core::constants;
use crate::core::domain::MasterKey;
use crate::error::{Result, StoreError};

/// Validate file permissions (Unix only).
#[cfg(unix)]
fn has_mode(path: &Path, expected_mode: u32) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o777 == expected_mode)
        .unwrap_or(false)
}

/// Filesystem key storage.
pub struct Filesystem {
    dir: PathBuf,
}

impl Filesystem {
    /// Store rooted at `<home>/master_keys`.
    pub fn new(home: &Path) -> Self {
        Self {
            dir: home.join(constants::KEYS_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        // Ids become file names.
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(StoreError::InvalidFormat(format!("invalid key id: {:?}", id)).into());
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    fn read_record(path: &Path) -> Result<MasterKey> {
        #[cfg(unix)]
        {
            if !has_mode(path, 0o600) {
                warn!(path = %path.display(), "insecure master key file permissions");
            }
        }

        let contents = fs::read_to_string(path).map_err(StoreError::ReadFailed)?;
        serde_json::from_str(&contents)
            .map_err(|e| StoreError::InvalidFormat(format!("{}: {}", path.display(), e)).into())
    }
}

#[async_trait]
impl KeyStore for Filesystem {
    async fn save(&self, key: &MasterKey) -> Result<()> {
        let path = self.record_path(&key.id)?;
        fs::create_dir_all(&self.dir).map_err(StoreError::WriteFailed)?;

        let json = serde_json::to_string_pretty(key)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;

        // Replace atomically: temp file, then rename.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(StoreError::WriteFailed)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(StoreError::WriteFailed)?;
        }

        fs::rename(&tmp, &path).map_err(StoreError::WriteFailed)?;
        debug!(id = %key.id, path = %path.display(), "master key saved");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MasterKey>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(StoreError::ReadFailed)? {
            let path = entry.map_err(StoreError::ReadFailed)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            keys.push(Self::read_record(&path)?);
        }

        keys.sort_by(|a, b| {
            a.created_time
                .cmp(&b.created_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        debug!(count = keys.len(), "master keys listed");
        Ok(keys)
    }

    async fn get(&self, id: &str) -> Result<MasterKey> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Err(StoreError::KeyNotFound(id.to_string()).into());
        }
        Self::read_record(&path)
    }
}
