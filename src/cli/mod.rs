//! Command-line interface.
//!
//! Each command opens a [`Host`], binds one controller, drives it and
//! unmounts it before returning.

pub mod completions;
pub mod host;
pub mod init;
pub mod keys;
pub mod master;
pub mod output;
pub mod prompt;
pub mod reencrypt;
pub mod status;
pub mod watch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use host::Host;

/// Keyward - end-to-end encryption master key manager.
#[derive(Parser)]
#[command(
    name = "keyward",
    about = "Manage end-to-end encryption master keys",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Keyward home directory (default: ~/.keyward)
    #[arg(long, global = true, env = "KEYWARD_HOME")]
    pub home: Option<PathBuf>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create the keyward home directory
    Init,

    /// Show encryption status, key checks and decryption progress
    Status,

    /// Manage master keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Set the master password
    MasterPassword {
        /// Password (prompted when omitted)
        #[arg(long, env = "KEYWARD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Re-encrypt and re-sync all local items
    Reencrypt {
        /// Dismiss the pending re-encryption reminder instead
        #[arg(long, conflicts_with = "yes")]
        later: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print decryption progress as it refreshes
    Watch {
        /// Stop after this many refreshes (default: until Ctrl-C)
        #[arg(long)]
        ticks: Option<u32>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Master key subcommands.
#[derive(Subcommand)]
pub enum KeysAction {
    /// List master keys and their password checks
    List {
        /// Include disabled keys
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new master key
    New {
        /// Password (prompted when omitted)
        #[arg(long, env = "KEYWARD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Make the new key the active one even if another is active
        #[arg(long)]
        activate: bool,
    },

    /// Save the password for a master key and check it
    Password {
        /// Master key id
        id: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "KEYWARD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Enable or disable a master key
    Toggle {
        /// Master key id
        id: String,
    },

    /// Re-wrap a master key with the current key derivation settings
    Upgrade {
        /// Master key id
        id: String,
    },
}

/// Execute a command.
pub async fn execute(command: Command, home: Option<PathBuf>) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Init => init::execute(home),
        Status => status::execute(&Host::open(home)?).await,
        Keys { action } => {
            let host = Host::open(home)?;
            match action {
                KeysAction::List { all, json } => keys::list(&host, all, json).await,
                KeysAction::New { password, activate } => keys::new(&host, password, activate).await,
                KeysAction::Password { id, password } => keys::password(&host, &id, password).await,
                KeysAction::Toggle { id } => keys::toggle(&host, &id).await,
                KeysAction::Upgrade { id } => keys::upgrade(&host, &id).await,
            }
        }
        MasterPassword { password } => master::execute(&Host::open(home)?, password).await,
        Reencrypt { later, yes } => reencrypt::execute(&Host::open(home)?, later, yes).await,
        Watch { ticks } => watch::execute(&Host::open(home)?, ticks).await,
        Completions { shell } => completions::execute(shell),
    }
}
