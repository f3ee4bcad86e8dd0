//! Tests for `keyward status` and `keyward watch`.

use crate::support::*;

#[test]
fn test_status_without_keys() {
    let t = Test::init();

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "enabled:  no");
    assert_stdout_contains(&output, "Master password is not set");
    assert_stdout_contains(&output, "Decrypted items: 0 / 0");
    assert_stdout_contains(&output, "no master keys");
    assert_stdout_excludes(&output, "re-encrypted");
}

#[test]
fn test_status_with_key_and_items() {
    let t = Test::with_key();
    t.write_items(&[("a", true), ("b", true), ("c", false)]);

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "enabled:  yes");
    assert_stdout_contains(&output, "Master password is set");
    assert_stdout_contains(&output, "Decrypted items: 1 / 3");
    assert_stdout_contains(&output, "[active, master password]");
    assert_stdout_contains(&output, "your data should be re-encrypted");
}

#[test]
fn test_status_reports_sync_request() {
    let t = Test::with_key();
    assert_success(&t.run(&["reencrypt", "--yes"]));

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "sync requested:");
    assert_stdout_excludes(&output, "your data should be re-encrypted");
}

#[test]
fn test_status_hints_missing_password() {
    let t = Test::with_key();
    let id = t.list_json()[0]["id"].as_str().unwrap().to_string();
    assert_failure(&t.run(&["keys", "password", &id, "--password", "wrong"]));
    assert_success(&t.run(&["master-password", "--password", "wrong too"]));

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "keyward keys password <id>");
}

#[test]
fn test_watch_prints_each_refresh() {
    let t = Test::init();
    t.write_items(&[("a", false), ("b", true)]);

    let output = t.run(&["watch", "--ticks", "2"]);
    assert_success(&output);
    assert_eq!(stdout(&output).matches("Decrypted items: 1 / 2").count(), 2);
}
