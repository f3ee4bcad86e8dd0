//! Status command.
//!
//! Quick overview: encryption state, master password, key checks and
//! decryption progress.

use std::sync::Arc;

use crate::cli::prompt::Terminal;
use crate::cli::{keys, output, Host};
use crate::core::constants::settings as setting;
use crate::core::settings::{self, Reencrypt, SettingsStore};
use crate::core::sync::PendingSync;
use crate::error::Result;

/// Show status.
pub async fn execute(host: &Host) -> Result<()> {
    let mut controller = host.controller(Arc::new(Terminal::default())).await?;
    controller.on_mount().await;
    let state = controller.snapshot();
    controller.on_unmount();

    let enabled = host.settings.get(setting::ENABLED).as_deref() == Some("1");

    output::section("Encryption");
    output::kv("enabled:", if enabled { "yes" } else { "no" });
    output::kv("master password:", controller.master_password_status());
    if host.active_key_id().is_some() {
        output::kv(
            "master password opens active key:",
            output::check(state.password_checks.master()),
        );
    }
    output::kv("progress:", controller.decrypted_stat_text());

    let sync = PendingSync::new(host.settings.clone());
    if let Some(at) = sync.requested_at() {
        output::kv("sync requested:", at);
    }

    output::section("Master keys");
    keys::print_keys(
        host,
        &controller.inputs().master_keys,
        &state,
        host.active_key_id().as_deref(),
    );

    if settings::should_reencrypt(host.settings.as_ref()) != Reencrypt::No {
        output::blank();
        output::warn("your data should be re-encrypted");
        output::hint("run: keyward reencrypt (or keyward reencrypt --later)");
    }

    let unverified = controller
        .inputs()
        .master_keys
        .iter()
        .filter(|k| k.enabled && !state.password_checks.is_valid(&k.id))
        .count();
    if unverified > 0 {
        output::blank();
        output::hint("enter missing passwords: keyward keys password <id>");
    }

    Ok(())
}
