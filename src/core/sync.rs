//! Background synchronization requests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::core::constants::settings as keys;
use crate::core::settings::SettingsStore;
use crate::error::Result;

/// Requests a synchronization pass. Callers do not wait for the pass itself.
#[async_trait]
pub trait SyncTrigger: Send + Sync {
    async fn request_sync(&self) -> Result<()>;
}

/// Records the request time in settings; the sync engine picks it up.
pub struct PendingSync {
    settings: Arc<dyn SettingsStore>,
}

impl PendingSync {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// Time of the last unhandled request, if any.
    pub fn requested_at(&self) -> Option<String> {
        self.settings.get(keys::SYNC_REQUESTED_AT)
    }
}

#[async_trait]
impl SyncTrigger for PendingSync {
    async fn request_sync(&self) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.settings.set(keys::SYNC_REQUESTED_AT, &now)?;
        debug!(at = %now, "sync requested");
        Ok(())
    }
}
