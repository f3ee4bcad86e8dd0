//! Master password command.

use std::sync::Arc;

use crate::cli::prompt::{read_password, Terminal};
use crate::cli::{output, Host};
use crate::error::{Error, Result};

/// Save the master password and check it against the active key.
pub async fn execute(host: &Host, password: Option<String>) -> Result<()> {
    let password = read_password(password, "Master password", true)?;

    let controller = host.controller(Arc::new(Terminal::default())).await?;
    controller.on_master_password_change(&password);
    if !controller.on_master_password_save() {
        return Err(Error::Aborted("master password was not saved"));
    }
    output::success("master password saved");

    if host.active_key_id().is_none() {
        output::hint("no active master key yet: keyward keys new");
        return Ok(());
    }

    if controller.master_password_is_valid(Some(password.as_str())).await {
        output::success("master password opens the active master key");
    } else {
        output::warn("master password does not open the active master key");
    }
    Ok(())
}
