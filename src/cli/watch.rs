//! Watch command.
//!
//! Mounts a controller and prints decryption progress each time the
//! refresh period elapses, until Ctrl-C or the requested tick count.

use std::sync::Arc;

use tracing::debug;

use crate::cli::prompt::Terminal;
use crate::cli::{output, Host};
use crate::error::Result;

/// Watch decryption progress.
pub async fn execute(host: &Host, ticks: Option<u32>) -> Result<()> {
    let mut controller = host.controller(Arc::new(Terminal::default())).await?;
    controller.on_mount().await;

    output::dimmed(&format!(
        "refreshing every {} ms, Ctrl-C to stop",
        host.config.poll.interval_ms
    ));

    let mut interval = tokio::time::interval(host.config.poll_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut printed = 0u32;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                println!("{}", controller.decrypted_stat_text());
                printed += 1;
                if ticks.is_some_and(|n| printed >= n) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                debug!("interrupted");
                break;
            }
        }
    }

    controller.on_unmount();
    Ok(())
}
