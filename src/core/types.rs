//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

use std::collections::BTreeMap;

/// A master key identifier (uuid v4 in simple form).
pub type KeyId = String;

/// Opaque master key material (age-armored ciphertext for the default verifier).
pub type KeyContent = String;

/// Candidate passwords by master key id.
pub type PasswordCache = BTreeMap<KeyId, String>;

/// Unix timestamp in milliseconds.
pub type TimestampMs = i64;

/// Whether each key's resolved password is the master password.
pub type MasterPasswordKeys = BTreeMap<KeyId, bool>;
