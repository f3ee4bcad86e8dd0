//! Age-based verifier.
//!
//! The data-encryption key is an age x25519 identity. A master key's
//! content is that identity encrypted to an age scrypt (passphrase)
//! recipient and ASCII armored. scrypt runs on the blocking pool.

use std::io::{Read, Write};

use ::age::secrecy::{ExposeSecret, SecretString};
use ::age::{scrypt, x25519};
use async_trait::async_trait;
use tracing::{debug, trace, warn};

use super::Verifier;
use crate::core::domain::MasterKey;
use crate::error::{CipherError, Result, ValidationError};

/// Verifier for passphrase-wrapped age identities
#[derive(Debug, Clone, Copy)]
pub struct AgeVerifier {
    work_factor: u8,
}

impl AgeVerifier {
    /// Verifier producing keys at `work_factor` (scrypt log2 N).
    pub fn new(work_factor: u8) -> Self {
        Self { work_factor }
    }

    pub fn work_factor(&self) -> u8 {
        self.work_factor
    }

    /// Create a new master key protected by `password`.
    ///
    /// Blocking: runs scrypt on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyPassword` for an empty password.
    pub fn generate(&self, password: &str) -> Result<MasterKey> {
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let identity = x25519::Identity::generate();
        let content = wrap(identity.to_string().expose_secret(), password, self.work_factor)?;
        let now = chrono::Utc::now().timestamp_millis();

        let key = MasterKey {
            id: uuid::Uuid::new_v4().simple().to_string(),
            created_time: now,
            updated_time: now,
            enabled: true,
            work_factor: self.work_factor,
            content,
        };
        debug!(id = %key.id, work_factor = self.work_factor, "master key generated");
        Ok(key)
    }

    /// Decrypt the wrapped identity. Blocking.
    fn open(&self, key: &MasterKey, password: &str) -> Result<x25519::Identity> {
        trace!(id = %key.id, "opening master key");

        let mut identity = scrypt::Identity::new(SecretString::from(password.to_owned()));
        identity.set_max_work_factor(key.work_factor.max(self.work_factor));

        let reader = ::age::armor::ArmoredReader::new(key.content.as_bytes());
        let decryptor = ::age::Decryptor::new(reader).map_err(|e| corrupt(key, e))?;

        let mut reader = decryptor
            .decrypt(std::iter::once(&identity as &dyn ::age::Identity))
            .map_err(|e| match e {
                ::age::DecryptError::DecryptionFailed | ::age::DecryptError::NoMatchingKeys => {
                    CipherError::WrongPassword(key.id.clone())
                }
                other => corrupt(key, other),
            })?;

        let mut plaintext = Vec::new();
        reader
            .read_to_end(&mut plaintext)
            .map_err(|e| corrupt(key, e))?;
        let plaintext = String::from_utf8(plaintext).map_err(|e| corrupt(key, e))?;

        plaintext
            .trim()
            .parse::<x25519::Identity>()
            .map_err(|e: &str| corrupt(key, e).into())
    }

    fn rewrap(&self, key: &MasterKey, password: &str) -> Result<MasterKey> {
        let identity = self.open(key, password)?;
        let content = wrap(identity.to_string().expose_secret(), password, self.work_factor)?;

        Ok(MasterKey {
            updated_time: chrono::Utc::now().timestamp_millis(),
            work_factor: self.work_factor,
            content,
            ..key.clone()
        })
    }
}

impl Default for AgeVerifier {
    fn default() -> Self {
        Self::new(crate::core::constants::DEFAULT_WORK_FACTOR)
    }
}

#[async_trait]
impl Verifier for AgeVerifier {
    async fn check(&self, key: &MasterKey, password: &str) -> bool {
        let verifier = *self;
        let key = key.clone();
        let password = password.to_owned();

        match tokio::task::spawn_blocking(move || verifier.open(&key, &password)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(error = %e, "password check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "password check task failed");
                false
            }
        }
    }

    async fn upgrade(&self, key: &MasterKey, password: &str) -> Result<MasterKey> {
        let verifier = *self;
        let key = key.clone();
        let password = password.to_owned();

        let upgraded = tokio::task::spawn_blocking(move || verifier.rewrap(&key, &password))
            .await
            .map_err(|e| CipherError::Task(e.to_string()))??;

        debug!(id = %upgraded.id, work_factor = upgraded.work_factor, "master key upgraded");
        Ok(upgraded)
    }

    fn needs_upgrade(&self, key: &MasterKey) -> bool {
        key.work_factor < self.work_factor
    }
}

/// Encrypt `secret` to a passphrase recipient and armor it.
fn wrap(secret: &str, password: &str, work_factor: u8) -> Result<String> {
    let mut recipient = scrypt::Recipient::new(SecretString::from(password.to_owned()));
    recipient.set_work_factor(work_factor);

    let encryptor =
        ::age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn ::age::Recipient))
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(::age::armor::ArmoredWriter::wrap_output(
            &mut encrypted,
            ::age::armor::Format::AsciiArmor,
        )?)
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

    writer.write_all(secret.as_bytes())?;
    let armored = writer
        .finish()
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
    armored
        .finish()
        .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;

    String::from_utf8(encrypted)
        .map_err(|e| CipherError::EncryptionFailed(format!("UTF-8 error: {}", e)).into())
}

fn corrupt(key: &MasterKey, reason: impl std::fmt::Display) -> CipherError {
    CipherError::CorruptKey {
        id: key.id.clone(),
        reason: reason.to_string(),
    }
}
