//! Encryption configuration controller.
//!
//! One [`EncryptionConfig`] backs one configuration screen (or one CLI
//! invocation). The host constructs it with its collaborators and the
//! current [`Inputs`], mounts it, forwards user actions, feeds new inputs
//! through [`EncryptionConfig::on_update`] and finally unmounts or drops it.
//!
//! The controller never returns errors to its host. Verification failures
//! become `false` checks; workflow failures become alerts through the
//! [`Prompt`] collaborator and are logged.
//!
//! ```text
//!            new ──► on_mount ──► (handlers, on_update)* ──► on_unmount
//!                       │                                       │
//!                       └── arms stats poller ──────── disarms ─┘
//! ```

mod poller;
pub mod verify;
mod workflows;

pub use workflows::Reencryption;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::core::cipher::Verifier;
use crate::core::constants::{self, settings as keys};
use crate::core::discovery::PasswordDiscovery;
use crate::core::domain::{MasterKey, PasswordChecks, Stats};
use crate::core::items::StatsSource;
use crate::core::prompt::Prompt;
use crate::core::settings::SettingsStore;
use crate::core::store::KeyStore;
use crate::core::sync::SyncTrigger;
use crate::core::types::{KeyId, MasterPasswordKeys, PasswordCache};

use poller::Poller;
use verify::Pass;

/// Collaborators the controller calls into.
#[derive(Clone)]
pub struct Services {
    pub verifier: Arc<dyn Verifier>,
    pub keys: Arc<dyn KeyStore>,
    pub stats: Arc<dyn StatsSource>,
    pub sync: Arc<dyn SyncTrigger>,
    pub settings: Arc<dyn SettingsStore>,
    pub discovery: Arc<dyn PasswordDiscovery>,
    pub prompt: Arc<dyn Prompt>,
}

/// Values supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub master_keys: Vec<MasterKey>,
    pub passwords: PasswordCache,
    pub master_password: String,
    pub active_master_key_id: Option<KeyId>,
}

/// Snapshot of the controller state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub password_checks: PasswordChecks,
    /// Keys whose resolved password is the master password
    pub master_password_keys: MasterPasswordKeys,
    pub stats: Stats,
    /// Working copy of the password cache, edited by the user
    pub passwords: PasswordCache,
    pub show_disabled_master_keys: bool,
    pub master_password_input: String,
    pub mounted: bool,
    pub polling: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

/// Master key configuration controller.
pub struct EncryptionConfig {
    services: Services,
    inputs: Inputs,
    state: Arc<Mutex<State>>,
    live: Arc<AtomicBool>,
    lifecycle: Lifecycle,
    poller: Poller,
    interval: Duration,
    background: Mutex<JoinSet<()>>,
}

pub(crate) fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

impl EncryptionConfig {
    /// Create an unmounted controller. Maps start empty, stats unset, and
    /// the working password cache is a copy of `inputs.passwords`.
    pub fn new(services: Services, inputs: Inputs) -> Self {
        let state = State {
            passwords: inputs.passwords.clone(),
            ..State::default()
        };

        Self {
            services,
            inputs,
            state: Arc::new(Mutex::new(state)),
            live: Arc::new(AtomicBool::new(false)),
            lifecycle: Lifecycle::Created,
            poller: Poller::default(),
            interval: Duration::from_millis(constants::STATS_REFRESH_INTERVAL_MS),
            background: Mutex::new(JoinSet::new()),
        }
    }

    /// Override the stats refresh period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Verify passwords, refresh stats once, then start polling.
    ///
    /// Mounting is single-use: calling this again, or after
    /// [`on_unmount`](Self::on_unmount), does nothing.
    pub async fn on_mount(&mut self) {
        if self.lifecycle != Lifecycle::Created {
            warn!(lifecycle = ?self.lifecycle, "controller can only be mounted once");
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        self.live.store(true, Ordering::SeqCst);
        debug!(keys = self.inputs.master_keys.len(), "controller mounted");

        self.apply_update(None).await;
        self.refresh_stats().await;

        self.poller.arm(
            self.interval,
            self.services.stats.clone(),
            self.state.clone(),
            self.live.clone(),
        );
    }

    /// Swap in new host inputs.
    ///
    /// A changed password cache replaces the working copy; changed keys or
    /// passwords trigger a new verification pass.
    pub async fn on_update(&mut self, inputs: Inputs) {
        let previous = std::mem::replace(&mut self.inputs, inputs);
        self.apply_update(Some(&previous)).await;
    }

    async fn apply_update(&self, previous: Option<&Inputs>) {
        let passwords_changed = previous.is_some_and(|p| p.passwords != self.inputs.passwords);
        let keys_changed = previous.is_some_and(|p| p.master_keys != self.inputs.master_keys);

        if passwords_changed {
            debug!("password cache replaced from inputs");
            self.state().passwords = self.inputs.passwords.clone();
        }

        if previous.is_none() || keys_changed || passwords_changed {
            self.check_passwords().await;
        }
    }

    /// Stop polling. No refresh fires or lands afterwards.
    pub fn on_unmount(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        self.poller.disarm();
        if self.lifecycle == Lifecycle::Mounted {
            debug!("controller unmounted");
        }
        self.lifecycle = Lifecycle::Unmounted;
    }

    /// Wait for fire-and-forget background work (sync requests) to finish.
    pub async fn flush(&self) {
        let mut pending = std::mem::take(&mut *self.background.lock().unwrap_or_else(|e| e.into_inner()));
        while pending.join_next().await.is_some() {}
    }

    pub(crate) fn spawn_background<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.background
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .spawn(task);
    }

    // ------------------------------------------------------------------
    // Verification and stats
    // ------------------------------------------------------------------

    /// Run a verification pass over the current keys and replace both
    /// result maps at once.
    pub async fn check_passwords(&self) {
        let passwords = self.state().passwords.clone();

        let (checks, master_keys) = verify::verify_all(
            self.services.verifier.as_ref(),
            self.services.discovery.as_ref(),
            Pass {
                keys: &self.inputs.master_keys,
                passwords: &passwords,
                master_password: &self.inputs.master_password,
                active_key_id: self.inputs.active_master_key_id.as_deref(),
            },
        )
        .await;

        let mut state = self.state();
        state.password_checks = checks;
        state.master_password_keys = master_keys;
    }

    /// Check a master password candidate (default: the input master
    /// password) against the active key.
    pub async fn master_password_is_valid(&self, candidate: Option<&str>) -> bool {
        verify::master_password_is_valid(
            self.services.verifier.as_ref(),
            &self.inputs.master_keys,
            self.inputs.active_master_key_id.as_deref(),
            candidate.unwrap_or(&self.inputs.master_password),
        )
        .await
    }

    /// Fetch stats now and replace both counts. Failures are logged.
    pub async fn refresh_stats(&self) {
        if let Some(stats) = poller::fetch(self.services.stats.as_ref()).await {
            self.state().stats = stats;
        }
    }

    // ------------------------------------------------------------------
    // User edits
    // ------------------------------------------------------------------

    /// Edit the working password for a key. Nothing is persisted.
    pub fn on_password_change(&self, key_id: &str, password: &str) {
        self.state()
            .passwords
            .insert(key_id.to_string(), password.to_string());
    }

    /// Persist the working password for a key (an empty password removes
    /// the cache entry), then re-verify.
    pub async fn on_save_password(&self, key_id: &str) {
        let password = self.state().passwords.get(key_id).cloned().unwrap_or_default();
        let settings = &self.services.settings;

        let saved = if password.is_empty() {
            settings.delete_keyed(keys::PASSWORD_CACHE, key_id)
        } else {
            settings.set_keyed(keys::PASSWORD_CACHE, key_id, &password)
        };
        if let Err(e) = saved {
            warn!(error = %e, id = key_id, "failed to save password");
            self.services
                .prompt
                .alert(&format!("Could not save password: {}", e));
        }

        self.check_passwords().await;
    }

    pub fn on_master_password_change(&self, value: &str) {
        self.state().master_password_input = value.to_string();
    }

    /// Persist the master password field. Returns `false` after alerting
    /// if the setting could not be written.
    pub fn on_master_password_save(&self) -> bool {
        let value = self.state().master_password_input.clone();
        match self.services.settings.set(keys::MASTER_PASSWORD, &value) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save master password");
                self.services
                    .prompt
                    .alert(&format!("Could not save master password: {}", e));
                false
            }
        }
    }

    /// Flip a key's enabled flag and persist it.
    pub async fn on_toggle_enabled(&self, key: &MasterKey) {
        let toggled = key.toggled();
        match self.services.keys.save(&toggled).await {
            Ok(()) => debug!(id = %key.id, enabled = toggled.enabled, "master key toggled"),
            Err(e) => {
                warn!(error = %e, id = %key.id, "failed to toggle master key");
                self.services
                    .prompt
                    .alert(&format!("Could not update master key: {}", e));
            }
        }
    }

    pub fn toggle_show_disabled_master_keys(&self) {
        let mut state = self.state();
        state.show_disabled_master_keys = !state.show_disabled_master_keys;
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> State {
        let mut state = self.state().clone();
        state.mounted = self.live.load(Ordering::SeqCst);
        state.polling = self.poller.is_armed();
        state
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn is_mounted(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn decrypted_stat_text(&self) -> String {
        self.state().stats.decrypted_text()
    }

    pub fn master_password_status(&self) -> &'static str {
        if self.inputs.master_password.is_empty() {
            "Master password is not set"
        } else {
            "Master password is set"
        }
    }

    /// Messages shown before enabling encryption, mentioning `key` when given.
    pub fn enable_encryption_confirmation_messages(key: Option<&MasterKey>) -> Vec<String> {
        let mut messages = vec![
            "Enabling encryption means *all* your notes and attachments are going to be \
             re-synchronised and sent encrypted to the sync target. Do not lose the password \
             as, for security purposes, this will be the *only* way to decrypt the data! To \
             enable encryption, please enter your password below."
                .to_string(),
        ];
        if let Some(key) = key {
            messages.push(format!(
                "Encryption will be enabled using the master key created on {}",
                key.created_local()
            ));
        }
        messages
    }
}

impl Drop for EncryptionConfig {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }
}
