//! Password verification engine.
//!
//! Keys are checked one at a time, in input order. Each check may run a
//! full key derivation, so passes are never parallelized and calls into the
//! verifier never overlap within a pass.

use tracing::{debug, trace};

use crate::core::cipher::Verifier;
use crate::core::constants::MASTER_CHECK_ID;
use crate::core::discovery::PasswordDiscovery;
use crate::core::domain::{MasterKey, PasswordChecks};
use crate::core::types::{MasterPasswordKeys, PasswordCache};

/// Everything a verification pass reads.
pub struct Pass<'a> {
    pub keys: &'a [MasterKey],
    pub passwords: &'a PasswordCache,
    pub master_password: &'a str,
    pub active_key_id: Option<&'a str>,
}

/// Run a full pass: one entry per key plus `master`.
pub async fn verify_all(
    verifier: &dyn Verifier,
    discovery: &dyn PasswordDiscovery,
    pass: Pass<'_>,
) -> (PasswordChecks, MasterPasswordKeys) {
    let mut checks = PasswordChecks::new();
    let mut master_keys = MasterPasswordKeys::new();

    for key in pass.keys {
        let password = resolve_password(verifier, discovery, key, pass.passwords).await;

        let ok = match &password {
            Some(p) => verifier.check(key, p).await,
            None => false,
        };
        trace!(id = %key.id, ok, resolved = password.is_some(), "key checked");

        checks.insert(key.id.clone(), ok);
        master_keys.insert(
            key.id.clone(),
            password.as_deref() == Some(pass.master_password),
        );
    }

    let master_ok = master_password_is_valid(
        verifier,
        pass.keys,
        pass.active_key_id,
        pass.master_password,
    )
    .await;
    checks.insert(MASTER_CHECK_ID, master_ok);

    debug!(keys = pass.keys.len(), master = master_ok, "verification pass complete");
    (checks, master_keys)
}

/// Cached password for the key, else whatever discovery finds.
pub async fn resolve_password(
    verifier: &dyn Verifier,
    discovery: &dyn PasswordDiscovery,
    key: &MasterKey,
    passwords: &PasswordCache,
) -> Option<String> {
    match passwords.get(&key.id) {
        Some(p) if !p.is_empty() => Some(p.clone()),
        _ => discovery.resolve(verifier, key).await,
    }
}

/// Check `master_password` against the active key.
///
/// `false` when there is no active key, it is not among `keys`, or the
/// master password is empty.
pub async fn master_password_is_valid(
    verifier: &dyn Verifier,
    keys: &[MasterKey],
    active_key_id: Option<&str>,
    master_password: &str,
) -> bool {
    let active = active_key_id.and_then(|id| keys.iter().find(|k| k.id == id));
    match active {
        Some(key) if !master_password.is_empty() => verifier.check(key, master_password).await,
        _ => false,
    }
}
