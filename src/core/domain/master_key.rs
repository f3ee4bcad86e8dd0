//! Master key record.
//!
//! A master key wraps the data-encryption key under a password. The
//! `content` field is opaque here; only the verifier knows its format.

use serde::{Deserialize, Serialize};

use crate::core::types::{KeyContent, KeyId, TimestampMs};

/// A persisted master key record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterKey {
    pub id: KeyId,
    pub created_time: TimestampMs,
    pub updated_time: TimestampMs,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Key derivation cost the content was wrapped with (scrypt log2 N)
    pub work_factor: u8,
    pub content: KeyContent,
}

fn default_enabled() -> bool {
    true
}

impl MasterKey {
    /// Creation time rendered in local time, for display.
    pub fn created_local(&self) -> String {
        format_local(self.created_time)
    }

    /// Copy of this record with `enabled` flipped.
    pub fn toggled(&self) -> Self {
        Self {
            enabled: !self.enabled,
            ..self.clone()
        }
    }
}

/// Format a millisecond timestamp as a local date and time.
pub(crate) fn format_local(ms: TimestampMs) -> String {
    use chrono::{Local, TimeZone};

    match Local.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        _ => "-".to_string(),
    }
}

impl std::fmt::Display for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
