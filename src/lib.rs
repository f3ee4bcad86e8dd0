//! Keyward - end-to-end encryption master key manager.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line host
//! └── core/             # Core library components
//!     ├── controller/   # EncryptionConfig: state, verification, polling, workflows
//!     ├── cipher/       # Verifier trait + age/scrypt implementation
//!     ├── store/        # KeyStore trait + filesystem implementation
//!     ├── items         # StatsSource trait + item index
//!     ├── sync          # SyncTrigger trait + pending-request marker
//!     ├── settings      # SettingsStore trait + settings.toml
//!     ├── discovery     # PasswordDiscovery trait + master/cache lookup
//!     ├── prompt        # Prompt trait (confirm/alert)
//!     ├── config        # config.toml and home directory
//!     └── domain        # MasterKey, Stats, PasswordChecks
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut config = EncryptionConfig::new(services, inputs);
//! config.on_mount().await;
//! config.on_password_change(&key.id, "secret");
//! config.on_save_password(&key.id).await;
//! if config.snapshot().password_checks.is_valid(&key.id) {
//!     config.upgrade_master_key(&key).await;
//! }
//! config.on_unmount();
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::controller::{EncryptionConfig, Inputs, Reencryption, Services, State};
pub use crate::core::domain::{MasterKey, PasswordChecks, Stats};
