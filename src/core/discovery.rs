//! Password discovery.
//!
//! When the controller has no password for a key it asks a
//! [`PasswordDiscovery`] for one. The default implementation tries the
//! master password, then the persisted password cache.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::core::cipher::Verifier;
use crate::core::domain::MasterKey;
use crate::core::settings::{self, SettingsStore};

/// Best-effort password resolution for a master key.
#[async_trait]
pub trait PasswordDiscovery: Send + Sync {
    /// A password that opens `key`, if one can be found.
    async fn resolve(&self, verifier: &dyn Verifier, key: &MasterKey) -> Option<String>;
}

/// Master password first, then the persisted password cache
pub struct MasterPasswordDiscovery {
    settings: Arc<dyn SettingsStore>,
}

impl MasterPasswordDiscovery {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PasswordDiscovery for MasterPasswordDiscovery {
    async fn resolve(&self, verifier: &dyn Verifier, key: &MasterKey) -> Option<String> {
        let master = settings::master_password(self.settings.as_ref());
        if !master.is_empty() && verifier.check(key, &master).await {
            debug!(id = %key.id, "master password opens key");
            return Some(master);
        }

        let cached = settings::password_cache(self.settings.as_ref()).remove(&key.id)?;
        if verifier.check(key, &cached).await {
            debug!(id = %key.id, "cached password opens key");
            return Some(cached);
        }

        debug!(id = %key.id, "no password found");
        None
    }
}
