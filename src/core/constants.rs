//! Constants used throughout keyward.
//!
//! Centralizes file names, setting keys and default tuning values.

/// Home directory relative to the user's home (~/.keyward).
pub const HOME_DIR: &str = ".keyward";

/// Environment variable overriding the keyward home directory.
pub const HOME_ENV: &str = "KEYWARD_HOME";

/// Optional configuration file inside the home directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Persistent settings file inside the home directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Master key directory inside the home directory.
pub const KEYS_DIR: &str = "master_keys";

/// Local item index inside the home directory.
pub const ITEMS_FILE: &str = "items.json";

/// Reserved check id for the master password result.
pub const MASTER_CHECK_ID: &str = "master";

/// Default stats refresh interval in milliseconds.
pub const STATS_REFRESH_INTERVAL_MS: u64 = 3000;

/// Default scrypt work factor (log2 N) for new and upgraded keys.
pub const DEFAULT_WORK_FACTOR: u8 = 18;

/// Setting keys.
pub mod settings {
    pub const MASTER_PASSWORD: &str = "encryption.masterPassword";
    pub const PASSWORD_CACHE: &str = "encryption.passwordCache";
    pub const SHOULD_REENCRYPT: &str = "encryption.shouldReencrypt";
    pub const ACTIVE_MASTER_KEY: &str = "encryption.activeMasterKeyId";
    pub const ENABLED: &str = "encryption.enabled";
    pub const SYNC_REQUESTED_AT: &str = "sync.requestedAt";
}

/// Confirmation prompt shown before a full re-encryption.
pub const REENCRYPT_CONFIRM: &str =
    "Please confirm that you would like to re-encrypt your complete database.";

/// Alert shown once a re-encryption has been scheduled.
pub const REENCRYPT_DONE: &str = "Your data is going to be re-encrypted and synced again.";

/// Alert shown when an upgrade is attempted without a verified password.
pub const UPGRADE_NEEDS_PASSWORD: &str =
    "Please enter your password in the master key list below before upgrading the key.";

/// Alert shown after a successful upgrade.
pub const UPGRADE_DONE: &str = "The master key has been upgraded successfully!";
