//! Error types.
//!
//! Each subsystem owns an error enum; [`Error`] wraps them so that
//! collaborator implementations and CLI commands can propagate with `?`.
//! The controller never returns these to its host: it turns them into
//! alerts or `false` check results.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// A workflow refused or failed; the user has already been told why.
    #[error("{0}")]
    Aborted(&'static str),
}

/// Configuration and settings file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: run `keyward init` first")]
    NotInitialized,

    #[error("unable to determine home directory")]
    NoHomeDir,

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Master key and item storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("master key not found: {0}")]
    KeyNotFound(String),

    #[error("failed to read {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("invalid record format: {0}")]
    InvalidFormat(String),
}

/// Key derivation and encryption errors raised by the verifier.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("invalid password for master key {0}")]
    WrongPassword(String),

    #[error("master key {id} is corrupt: {reason}")]
    CorruptKey { id: String, reason: String },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("armor encoding failed: {0}")]
    ArmorFailed(String),

    #[error("key derivation task failed: {0}")]
    Task(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("invalid work factor {0}: expected 1..=30")]
    WorkFactor(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
