//! Host wiring.
//!
//! Opens the keyward home directory and builds the production
//! collaborators the controller is bound to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::core::cipher::AgeVerifier;
use crate::core::config::Config;
use crate::core::constants::{self, settings as keys};
use crate::core::controller::{EncryptionConfig, Inputs, Services};
use crate::core::discovery::MasterPasswordDiscovery;
use crate::core::domain::MasterKey;
use crate::core::items::ItemIndex;
use crate::core::prompt::Prompt;
use crate::core::settings::{self, FileSettings, SettingsStore};
use crate::core::store::{Filesystem, KeyStore};
use crate::core::sync::PendingSync;
use crate::error::{ConfigError, Result};

/// An opened keyward home directory.
pub struct Host {
    pub home: PathBuf,
    pub config: Config,
    pub settings: Arc<FileSettings>,
    pub store: Arc<Filesystem>,
    pub verifier: Arc<AgeVerifier>,
    pub items: Arc<ItemIndex>,
}

impl Host {
    /// Open an initialized home directory (`home`, else the default).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if `keyward init` has not run.
    pub fn open(home: Option<PathBuf>) -> Result<Self> {
        let home = match home {
            Some(h) => h,
            None => Config::home_dir()?,
        };
        if !Self::is_initialized(&home) {
            return Err(ConfigError::NotInitialized.into());
        }
        debug!(home = %home.display(), "opening host");

        let config = Config::load(&home)?;
        let settings = Arc::new(FileSettings::open(&home)?);

        Ok(Self {
            store: Arc::new(Filesystem::new(&home)),
            verifier: Arc::new(AgeVerifier::new(config.kdf.work_factor)),
            items: Arc::new(ItemIndex::new(&home)),
            settings,
            config,
            home,
        })
    }

    pub fn is_initialized(home: &Path) -> bool {
        home.join(constants::SETTINGS_FILE).exists()
    }

    /// Collaborators for a controller, with `prompt` for user interaction.
    pub fn services(&self, prompt: Arc<dyn Prompt>) -> Services {
        let settings: Arc<dyn SettingsStore> = self.settings.clone();
        Services {
            verifier: self.verifier.clone(),
            keys: self.store.clone(),
            stats: self.items.clone(),
            sync: Arc::new(PendingSync::new(settings.clone())),
            discovery: Arc::new(MasterPasswordDiscovery::new(settings.clone())),
            settings,
            prompt,
        }
    }

    /// Current inputs read from the key store and settings.
    pub async fn inputs(&self) -> Result<Inputs> {
        Ok(Inputs {
            master_keys: self.store.list().await?,
            passwords: settings::password_cache(self.settings.as_ref()),
            master_password: settings::master_password(self.settings.as_ref()),
            active_master_key_id: self.settings.get(keys::ACTIVE_MASTER_KEY),
        })
    }

    /// An unmounted controller over the current inputs.
    pub async fn controller(&self, prompt: Arc<dyn Prompt>) -> Result<EncryptionConfig> {
        let inputs = self.inputs().await?;
        Ok(EncryptionConfig::new(self.services(prompt), inputs)
            .with_interval(self.config.poll_interval()))
    }

    /// Look up a key by id or unique id prefix.
    pub fn find_key<'a>(&self, keys: &'a [MasterKey], id: &str) -> Result<&'a MasterKey> {
        if let Some(key) = keys.iter().find(|k| k.id == id) {
            return Ok(key);
        }
        let mut matches = keys.iter().filter(|k| !id.is_empty() && k.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(key), None) => Ok(key),
            _ => Err(crate::error::StoreError::KeyNotFound(id.to_string()).into()),
        }
    }

    pub fn active_key_id(&self) -> Option<String> {
        self.settings.get(keys::ACTIVE_MASTER_KEY)
    }
}
