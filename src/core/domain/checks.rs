//! Password check results.

use std::collections::BTreeMap;

use crate::core::constants::MASTER_CHECK_ID;
use crate::core::types::KeyId;

/// Validity of each known key's password, plus the reserved `master` entry.
///
/// Built fresh on every verification pass; never merged with a previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChecks(BTreeMap<KeyId, bool>);

impl PasswordChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<KeyId>, ok: bool) {
        self.0.insert(id.into(), ok);
    }

    /// `true` only for an explicit successful check.
    pub fn is_valid(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn get(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }

    /// Result of the master password against the active key.
    pub fn master(&self) -> bool {
        self.is_valid(MASTER_CHECK_ID)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
