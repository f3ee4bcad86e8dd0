//! Decryption statistics.

use serde::{Deserialize, Serialize};

/// Aggregate counts reported by a stats source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    /// Items whose payload is still encrypted locally
    pub encrypted: u64,
    pub total: u64,
}

/// Controller-side stats, unset until the first refresh completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub encrypted: Option<u64>,
    pub total: Option<u64>,
}

impl From<ItemStats> for Stats {
    fn from(s: ItemStats) -> Self {
        Self {
            encrypted: Some(s.encrypted),
            total: Some(s.total),
        }
    }
}

impl Stats {
    /// Text of the form `Decrypted items: done / total`, with `-` for unknowns.
    pub fn decrypted_text(&self) -> String {
        let done = match (self.encrypted, self.total) {
            (Some(encrypted), Some(total)) => total.saturating_sub(encrypted).to_string(),
            _ => "-".to_string(),
        };
        let total = self
            .total
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!("Decrypted items: {} / {}", done, total)
    }
}
