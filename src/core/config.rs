//! Configuration file management.
//!
//! Handles locating the keyward home directory and reading the optional
//! `config.toml` inside it. Everything has a default, so a missing file is
//! not an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result, ValidationError};

/// Tool configuration stored in `<home>/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub kdf: KdfConfig,
}

/// Stats polling section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Milliseconds between stats refreshes
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

/// Key derivation section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfConfig {
    /// scrypt log2(N) for new and upgraded master keys
    #[serde(default = "default_work_factor")]
    pub work_factor: u8,
}

fn default_interval_ms() -> u64 {
    constants::STATS_REFRESH_INTERVAL_MS
}

fn default_work_factor() -> u8 {
    constants::DEFAULT_WORK_FACTOR
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            work_factor: default_work_factor(),
        }
    }
}

impl Config {
    /// Resolve the home directory: `KEYWARD_HOME`, else `~/.keyward`.
    pub fn home_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(constants::HOME_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(constants::HOME_DIR))
    }

    /// Load `config.toml` from `home`, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML is malformed, or a
    /// validation error if a value is out of range.
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(constants::CONFIG_FILE);
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        config.validate()?;

        debug!(
            interval_ms = config.poll.interval_ms,
            work_factor = config.kdf.work_factor,
            "config loaded"
        );
        Ok(config)
    }

    /// Write `config.toml` into `home`.
    pub fn save(&self, home: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(home.join(constants::CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_ms == 0 {
            return Err(ConfigError::Invalid("poll.interval_ms must be positive".to_string()).into());
        }
        if !(1..=30).contains(&self.kdf.work_factor) {
            return Err(ValidationError::WorkFactor(self.kdf.work_factor).into());
        }
        Ok(())
    }

    /// Stats refresh interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms)
    }
}
