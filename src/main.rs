//! Keyward - end-to-end encryption master key manager.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keyward::cli::output;
use keyward::cli::{execute, Cli};
use keyward::error::{ConfigError, Error, StoreError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("KEYWARD_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("keyward=debug")
        } else {
            EnvFilter::new("keyward=warn")
        }
    });

    let json = cli.log_json.then(|| {
        fmt::layer()
            .json()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let text = (!cli.log_json).then(|| {
        fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();

    if let Err(e) = execute(cli.command, cli.home).await {
        let suggestion = match &e {
            Error::Config(ConfigError::NotInitialized) => Some("run: keyward init"),
            Error::Store(StoreError::KeyNotFound(_)) => Some("run: keyward keys list --all"),
            Error::Cipher(_) => Some("check the password, or run: keyward keys password <id>"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
