//! Re-encrypt command.

use std::sync::Arc;

use crate::cli::prompt::Terminal;
use crate::cli::{output, Host};
use crate::core::controller::Reencryption;
use crate::error::{Error, Result};

/// Re-encrypt everything, or dismiss the reminder with `later`.
pub async fn execute(host: &Host, later: bool, yes: bool) -> Result<()> {
    let controller = host.controller(Arc::new(Terminal::assume_yes(yes))).await?;

    if later {
        if !controller.dont_reencrypt_data() {
            return Err(Error::Aborted("re-encryption reminder was not dismissed"));
        }
        output::success("re-encryption reminder dismissed");
        return Ok(());
    }

    match controller.reencrypt_data().await {
        Reencryption::Scheduled => {
            controller.flush().await;
            Ok(())
        }
        Reencryption::Declined => {
            output::dimmed("nothing was changed");
            Ok(())
        }
        Reencryption::Failed => Err(Error::Aborted("re-encryption failed")),
    }
}
