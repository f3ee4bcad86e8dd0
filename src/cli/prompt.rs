//! Terminal prompts.

use tracing::warn;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::prompt::Prompt;
use crate::error::{Result, ValidationError};

/// Prompt on the controlling terminal.
///
/// Without a terminal every confirmation is declined unless `assume_yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Terminal {
    pub assume_yes: bool,
}

impl Terminal {
    pub fn assume_yes(yes: bool) -> Self {
        Self { assume_yes: yes }
    }
}

impl Prompt for Terminal {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        if !console::user_attended() {
            warn!("no terminal attached, declining confirmation");
            output::alert(message);
            output::hint("re-run with --yes to confirm");
            return false;
        }

        dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        output::alert(message);
    }
}

/// Use `given` or prompt for a password, optionally asking twice.
///
/// # Errors
///
/// Returns `ValidationError::EmptyPassword` for an empty password, or a
/// prompt error if the terminal cannot be read.
pub fn read_password(given: Option<String>, label: &str, confirm: bool) -> Result<Zeroizing<String>> {
    let password = match given {
        Some(p) => Zeroizing::new(p),
        None => {
            let mut input = dialoguer::Password::new().with_prompt(label);
            if confirm {
                input = input.with_confirmation("Repeat password", "passwords do not match");
            }
            Zeroizing::new(input.interact()?)
        }
    };

    if password.is_empty() {
        return Err(ValidationError::EmptyPassword.into());
    }
    Ok(password)
}
