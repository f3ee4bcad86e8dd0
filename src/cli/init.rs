//! Init command.
//!
//! Creates the home directory with default config and empty settings.

use std::path::PathBuf;

use crate::cli::{output, Host};
use crate::core::config::Config;
use crate::core::constants::{self, settings as keys};
use crate::core::settings::{FileSettings, Reencrypt, SettingsStore};
use crate::error::Result;

/// Initialize the keyward home directory.
pub fn execute(home: Option<PathBuf>) -> Result<()> {
    let home = match home {
        Some(h) => h,
        None => Config::home_dir()?,
    };

    if Host::is_initialized(&home) {
        output::warn("already initialized");
        output::kv("home:", home.display());
        return Ok(());
    }

    std::fs::create_dir_all(home.join(constants::KEYS_DIR))?;
    if !home.join(constants::CONFIG_FILE).exists() {
        Config::default().save(&home)?;
    }

    let settings = FileSettings::open(&home)?;
    settings.set(keys::ENABLED, "0")?;
    settings.set(keys::SHOULD_REENCRYPT, Reencrypt::No.as_setting())?;

    output::success("initialized");
    output::kv("home:", home.display());
    output::blank();
    output::hint("create a master key: keyward keys new");
    Ok(())
}
