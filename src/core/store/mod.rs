//! Master key storage.
//!
//! Abstracts persistence of master key records so the controller can be
//! driven against the filesystem in production and in-memory doubles in
//! tests.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `KeyStore` trait
//! 2. Add the implementation in a new file (e.g., `sqlite.rs`)
//! 3. Re-export from this module

use async_trait::async_trait;

use crate::core::domain::MasterKey;
use crate::error::Result;

mod fs;

pub use fs::Filesystem;

/// Master key storage trait.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Persist a record, replacing any prior record with the same id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the record cannot be written.
    async fn save(&self, key: &MasterKey) -> Result<()>;

    /// All stored records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a record cannot be read or parsed.
    async fn list(&self) -> Result<Vec<MasterKey>>;

    /// Look up one record by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::KeyNotFound` if no record has that id.
    async fn get(&self, id: &str) -> Result<MasterKey> {
        self.list()
            .await?
            .into_iter()
            .find(|k| k.id == id)
            .ok_or_else(|| crate::error::StoreError::KeyNotFound(id.to_string()).into())
    }
}
