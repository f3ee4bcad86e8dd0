//! Domain types.

mod checks;
mod master_key;
mod stats;

pub use checks::PasswordChecks;
pub use master_key::MasterKey;
pub use stats::{ItemStats, Stats};
