//! Local item index and decryption statistics.
//!
//! The sync engine (outside this crate) maintains `<home>/items.json`.
//! Here it is only read for counts and rewritten to flag every item for
//! re-upload.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::domain::ItemStats;
use crate::error::{Result, StoreError};

/// Source of aggregate item counts.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Count items still encrypted locally and all items.
    async fn encrypted_items_stats(&self) -> Result<ItemStats>;

    /// Mark every item to be sent again on the next sync.
    async fn force_sync_all(&self) -> Result<()>;
}

/// One entry of the item index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    /// Payload is still encrypted locally
    #[serde(default)]
    pub encryption_applied: bool,
    /// Pending forced upload
    #[serde(default)]
    pub force_sync: bool,
}

/// JSON-file item index
pub struct ItemIndex {
    path: PathBuf,
}

impl ItemIndex {
    pub fn new(home: &Path) -> Self {
        Self {
            path: home.join(constants::ITEMS_FILE),
        }
    }

    /// All items; a missing index is empty.
    pub fn load(&self) -> Result<Vec<Item>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(StoreError::ReadFailed)?;
        serde_json::from_str(&contents).map_err(|e| {
            StoreError::InvalidFormat(format!("{}: {}", self.path.display(), e)).into()
        })
    }

    pub fn save(&self, items: &[Item]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(StoreError::WriteFailed)?;
        Ok(())
    }
}

#[async_trait]
impl StatsSource for ItemIndex {
    async fn encrypted_items_stats(&self) -> Result<ItemStats> {
        let items = self.load()?;
        let stats = ItemStats {
            encrypted: items.iter().filter(|i| i.encryption_applied).count() as u64,
            total: items.len() as u64,
        };
        debug!(encrypted = stats.encrypted, total = stats.total, "item stats");
        Ok(stats)
    }

    async fn force_sync_all(&self) -> Result<()> {
        let mut items = self.load()?;
        if items.is_empty() {
            return Ok(());
        }
        for item in &mut items {
            item.force_sync = true;
        }
        self.save(&items)?;
        debug!(count = items.len(), "all items flagged for sync");
        Ok(())
    }
}
