//! Master key commands.

use std::sync::Arc;

use serde::Serialize;

use crate::cli::prompt::{read_password, Terminal};
use crate::cli::{output, Host};
use crate::core::cipher::{self, Verifier};
use crate::core::constants::settings as setting;
use crate::core::controller::{EncryptionConfig, State};
use crate::core::domain::MasterKey;
use crate::core::settings::{self, Reencrypt, SettingsStore};
use crate::core::store::KeyStore;
use crate::error::{CipherError, Error, Result};

/// JSON view of one key.
#[derive(Serialize)]
struct KeyView<'a> {
    id: &'a str,
    created_time: i64,
    updated_time: i64,
    enabled: bool,
    active: bool,
    work_factor: u8,
    fingerprint: String,
    password_valid: bool,
    uses_master_password: bool,
    needs_upgrade: bool,
}

/// List keys with their password checks.
pub async fn list(host: &Host, all: bool, json: bool) -> Result<()> {
    let mut controller = host.controller(Arc::new(Terminal::default())).await?;
    controller.on_mount().await;
    if all {
        controller.toggle_show_disabled_master_keys();
    }
    let state = controller.snapshot();
    controller.on_unmount();

    let active = host.active_key_id();
    let keys = &controller.inputs().master_keys;

    if json {
        let views: Vec<KeyView> = keys
            .iter()
            .filter(|k| k.enabled || state.show_disabled_master_keys)
            .map(|k| KeyView {
                id: &k.id,
                created_time: k.created_time,
                updated_time: k.updated_time,
                enabled: k.enabled,
                active: active.as_deref() == Some(k.id.as_str()),
                work_factor: k.work_factor,
                fingerprint: cipher::fingerprint(k),
                password_valid: state.password_checks.is_valid(&k.id),
                uses_master_password: state.master_password_keys.get(&k.id).copied().unwrap_or(false),
                needs_upgrade: host.verifier.needs_upgrade(k),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    output::section("Master keys");
    print_keys(host, keys, &state, active.as_deref());
    Ok(())
}

/// Print one line per visible key.
pub(crate) fn print_keys(host: &Host, keys: &[MasterKey], state: &State, active: Option<&str>) {
    let visible: Vec<&MasterKey> = keys
        .iter()
        .filter(|k| k.enabled || state.show_disabled_master_keys)
        .collect();

    if visible.is_empty() {
        output::dimmed("  no master keys");
        let hidden = keys.len() - visible.len();
        if hidden > 0 {
            output::hint(&format!("{} disabled key(s) hidden, use --all", hidden));
        }
        return;
    }

    for key in visible {
        let mut tags = Vec::new();
        if active == Some(key.id.as_str()) {
            tags.push("active");
        }
        if state.master_password_keys.get(&key.id).copied().unwrap_or(false) {
            tags.push("master password");
        }
        if !key.enabled {
            tags.push("disabled");
        }
        if host.verifier.needs_upgrade(key) {
            tags.push("upgrade available");
        }

        println!(
            "  {} {}  {}  {}{}",
            output::check(state.password_checks.is_valid(&key.id)),
            output::key(&key.id),
            key.created_local(),
            cipher::fingerprint(key),
            if tags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", tags.join(", "))
            }
        );
    }
}

/// Create a master key, making it active if none is.
pub async fn new(host: &Host, password: Option<String>, activate: bool) -> Result<()> {
    let password = read_password(password, "Master key password", true)?;

    let verifier = *host.verifier;
    let pw = password.clone();
    let key = tokio::task::spawn_blocking(move || verifier.generate(&pw))
        .await
        .map_err(|e| CipherError::Task(e.to_string()))??;

    host.store.save(&key).await?;
    host.settings
        .set_keyed(setting::PASSWORD_CACHE, &key.id, &password)?;

    if host.active_key_id().is_none() || activate {
        host.settings.set(setting::ACTIVE_MASTER_KEY, &key.id)?;

        if host.settings.get(setting::ENABLED).as_deref() != Some("1") {
            output::blank();
            for message in EncryptionConfig::enable_encryption_confirmation_messages(Some(&key)) {
                output::dimmed(&message);
            }
            output::blank();
            host.settings.set(setting::ENABLED, "1")?;
            host.settings
                .set(setting::SHOULD_REENCRYPT, Reencrypt::Notify.as_setting())?;
        }
    }

    if settings::master_password(host.settings.as_ref()).is_empty() {
        host.settings.set(setting::MASTER_PASSWORD, &password)?;
    }

    output::success(&format!("master key created: {}", output::key(&key.id)));
    output::kv("work factor:", key.work_factor);
    output::kv("fingerprint:", cipher::fingerprint(&key));
    Ok(())
}

/// Save a password for a key and report whether it opens it.
pub async fn password(host: &Host, id: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password, "Password", false)?;

    let mut controller = host.controller(Arc::new(Terminal::default())).await?;
    let key = host.find_key(&controller.inputs().master_keys, id)?.clone();

    controller.on_mount().await;
    controller.on_password_change(&key.id, &password);
    controller.on_save_password(&key.id).await;
    let valid = controller.snapshot().password_checks.is_valid(&key.id);
    controller.on_unmount();

    if !valid {
        output::warn("password saved, but it does not open this key");
        return Err(CipherError::WrongPassword(key.id).into());
    }

    output::success(&format!("password verified for {}", output::key(&key.id)));
    Ok(())
}

/// Enable or disable a key.
pub async fn toggle(host: &Host, id: &str) -> Result<()> {
    let controller = host.controller(Arc::new(Terminal::default())).await?;
    let key = host.find_key(&controller.inputs().master_keys, id)?.clone();

    controller.on_toggle_enabled(&key).await;

    let stored = host.store.get(&key.id).await?;
    if stored.enabled == key.enabled {
        return Err(Error::Aborted("master key was not updated"));
    }

    let state = if stored.enabled { "enabled" } else { "disabled" };
    output::success(&format!("{} {}", output::key(&key.id), state));
    if !stored.enabled && host.active_key_id().as_deref() == Some(key.id.as_str()) {
        output::warn("this is the active master key");
    }
    Ok(())
}

/// Upgrade a key to the configured work factor.
pub async fn upgrade(host: &Host, id: &str) -> Result<()> {
    let mut controller = host.controller(Arc::new(Terminal::default())).await?;
    let key = host.find_key(&controller.inputs().master_keys, id)?.clone();

    if !host.verifier.needs_upgrade(&key) {
        output::success(&format!("{} is already up to date", output::key(&key.id)));
        return Ok(());
    }

    controller.on_mount().await;
    let upgraded = controller.upgrade_master_key(&key).await;
    controller.flush().await;
    controller.on_unmount();

    if !upgraded {
        return Err(Error::Aborted("master key upgrade failed"));
    }
    Ok(())
}
