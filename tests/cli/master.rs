//! Tests for `keyward master-password`.

use crate::support::*;

#[test]
fn test_master_password_without_active_key() {
    let t = Test::init();

    let output = t.run(&["master-password", "--password", "pw"]);
    assert_success(&output);
    assert_stdout_contains(&output, "master password saved");
    assert_stdout_contains(&output, "no active master key");
    assert_eq!(t.setting("encryption.masterPassword").as_deref(), Some("pw"));
}

#[test]
fn test_master_password_checked_against_active_key() {
    let t = Test::with_key();

    let output = t.run(&["master-password", "--password", "different"]);
    assert_success(&output);
    assert_stdout_contains(&output, "does not open the active master key");

    let output = t.run(&["master-password", "--password", PASSWORD]);
    assert_success(&output);
    assert_stdout_contains(&output, "opens the active master key");
}

#[test]
fn test_master_password_from_env() {
    let t = Test::with_key();

    let output = t
        .cmd()
        .env("KEYWARD_PASSWORD", PASSWORD)
        .arg("master-password")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_excludes(&output, "does not open");
}

#[test]
fn test_master_password_write_failure_is_reported() {
    let t = Test::with_key();
    // A directory in place of the temp file makes the settings write fail.
    std::fs::create_dir(t.home.path().join("settings.toml.tmp")).unwrap();

    let output = t.run(&["master-password", "--password", "pw"]);
    assert_failure(&output);
    assert_stdout_contains(&output, "Could not save master password");
    assert_stdout_excludes(&output, "master password saved");
}
