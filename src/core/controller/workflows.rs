//! User-confirmed workflows: full re-encryption and master key upgrade.

use tracing::{debug, info, warn};

use super::{verify, EncryptionConfig};
use crate::core::constants;
use crate::core::domain::MasterKey;
use crate::core::settings;
use crate::error::Result;

/// Outcome of [`EncryptionConfig::reencrypt_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reencryption {
    /// Items were flagged and a sync was requested
    Scheduled,
    /// The user said no; nothing changed
    Declined,
    /// Flagging items failed and the user was alerted
    Failed,
}

impl EncryptionConfig {
    /// Ask for confirmation, then flag every item for re-upload, request a
    /// sync and clear the pending re-encrypt setting.
    ///
    /// Declining changes nothing.
    pub async fn reencrypt_data(&self) -> Reencryption {
        let prompt = &self.services.prompt;
        if !prompt.confirm(constants::REENCRYPT_CONFIRM) {
            debug!("re-encryption declined");
            return Reencryption::Declined;
        }

        if let Err(e) = self.services.stats.force_sync_all().await {
            warn!(error = %e, "forced resync failed");
            prompt.alert(&format!("Could not re-encrypt data: {}", e));
            return Reencryption::Failed;
        }

        self.request_sync();
        if let Err(e) = settings::clear_reencrypt(self.services.settings.as_ref()) {
            warn!(error = %e, "failed to clear re-encrypt flag");
        }

        info!("re-encryption scheduled");
        prompt.alert(constants::REENCRYPT_DONE);
        Reencryption::Scheduled
    }

    /// Dismiss the re-encrypt reminder without re-encrypting anything.
    ///
    /// Returns `false` if the reminder could not be cleared.
    pub fn dont_reencrypt_data(&self) -> bool {
        match settings::clear_reencrypt(self.services.settings.as_ref()) {
            Ok(()) => {
                debug!("re-encrypt reminder dismissed");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to clear re-encrypt flag");
                false
            }
        }
    }

    /// Re-wrap `key` under current derivation parameters and persist it.
    ///
    /// Requires a successful password check for the key. The record is
    /// only saved after the verifier produced the upgraded key, so a
    /// failure never leaves stored key state half-changed. Returns `true`
    /// on success.
    pub async fn upgrade_master_key(&self, key: &MasterKey) -> bool {
        let prompt = &self.services.prompt;
        let (verified, cached) = {
            let state = self.state();
            (
                state.password_checks.is_valid(&key.id),
                state.passwords.get(&key.id).cloned(),
            )
        };

        if !verified {
            debug!(id = %key.id, "upgrade refused: password not verified");
            prompt.alert(constants::UPGRADE_NEEDS_PASSWORD);
            return false;
        }

        let password = match cached {
            Some(p) if !p.is_empty() => p,
            _ => verify::resolve_password(
                self.services.verifier.as_ref(),
                self.services.discovery.as_ref(),
                key,
                &Default::default(),
            )
            .await
            .unwrap_or_default(),
        };

        match self.upgrade_and_save(key, &password).await {
            Ok(upgraded) => {
                info!(id = %upgraded.id, work_factor = upgraded.work_factor, "master key upgraded");
                self.request_sync();
                prompt.alert(constants::UPGRADE_DONE);
                true
            }
            Err(e) => {
                warn!(error = %e, id = %key.id, "master key upgrade failed");
                prompt.alert(&format!("Could not upgrade master key: {}", e));
                false
            }
        }
    }

    async fn upgrade_and_save(&self, key: &MasterKey, password: &str) -> Result<MasterKey> {
        let upgraded = self.services.verifier.upgrade(key, password).await?;
        self.services.keys.save(&upgraded).await?;
        Ok(upgraded)
    }

    /// Fire-and-forget sync request; see [`EncryptionConfig::flush`].
    fn request_sync(&self) {
        let sync = self.services.sync.clone();
        self.spawn_background(async move {
            if let Err(e) = sync.request_sync().await {
                warn!(error = %e, "sync request failed");
            }
        });
    }
}
