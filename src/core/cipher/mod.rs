//! Master key verification.
//!
//! The controller never touches key material directly. It asks a
//! [`Verifier`] whether a password opens a master key, and asks it to
//! re-wrap a key under current derivation parameters.
//!
//! ## Adding a New Verifier
//!
//! 1. Implement the `Verifier` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::core::domain::MasterKey;
use crate::error::Result;

mod age;

pub use age::AgeVerifier;

/// Password verification and key upgrade.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Check whether `password` opens `key`.
    ///
    /// Never fails: any error (wrong password, corrupt content, task
    /// failure) is reported as `false`.
    async fn check(&self, key: &MasterKey, password: &str) -> bool;

    /// Re-wrap `key` under the verifier's current parameters.
    ///
    /// The returned record keeps the id of `key` and the same underlying
    /// data-encryption key.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::WrongPassword` if `password` does not open the
    /// key, or `CipherError::CorruptKey` if the content cannot be read.
    async fn upgrade(&self, key: &MasterKey, password: &str) -> Result<MasterKey>;

    /// Whether `key` was wrapped with weaker parameters than this verifier uses.
    fn needs_upgrade(&self, _key: &MasterKey) -> bool {
        false
    }
}

/// Short content fingerprint for display.
pub fn fingerprint(key: &MasterKey) -> String {
    let digest = format!("{:x}", Sha256::digest(key.content.as_bytes()));
    digest[..12].to_string()
}
