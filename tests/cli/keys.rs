//! Tests for `keyward keys`.

use crate::support::*;

fn first_id(t: &Test) -> String {
    t.list_json()[0]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_first_key_becomes_active() {
    let t = Test::init();

    let output = t.new_key();
    assert_success(&output);
    assert_stdout_contains(&output, "master key created");
    assert_stdout_contains(&output, "Enabling encryption means");

    let keys = t.list_json();
    let keys = keys.as_array().unwrap();
    assert_eq!(keys.len(), 1);
    let key = &keys[0];
    assert_eq!(key["active"], true);
    assert_eq!(key["enabled"], true);
    assert_eq!(key["password_valid"], true);
    assert_eq!(key["uses_master_password"], true);
    assert_eq!(key["needs_upgrade"], false);
    assert_eq!(key["work_factor"], TEST_WORK_FACTOR);

    assert_eq!(t.setting("encryption.enabled").as_deref(), Some("1"));
    assert_eq!(t.setting("encryption.shouldReencrypt").as_deref(), Some("2"));
    assert_eq!(
        t.setting("encryption.activeMasterKeyId"),
        key["id"].as_str().map(str::to_string)
    );
    assert_eq!(t.setting("encryption.masterPassword").as_deref(), Some(PASSWORD));
}

#[test]
fn test_second_key_is_not_activated() {
    let t = Test::with_key();
    let first = first_id(&t);

    let output = t.new_key_with("another password");
    assert_success(&output);
    assert_stdout_excludes(&output, "Enabling encryption means");

    let keys = t.list_json();
    assert_eq!(keys.as_array().unwrap().len(), 2);
    assert_eq!(keys[0]["id"], first.as_str());
    assert_eq!(keys[0]["active"], true);
    assert_eq!(keys[1]["active"], false);
    assert_eq!(keys[1]["password_valid"], true);
    assert_eq!(keys[1]["uses_master_password"], false);
}

#[test]
fn test_activate_flag_switches_active_key() {
    let t = Test::with_key();

    let output = t.run(&["keys", "new", "--password", "second", "--activate"]);
    assert_success(&output);

    let keys = t.list_json();
    assert_eq!(keys[0]["active"], false);
    assert_eq!(keys[1]["active"], true);
}

#[test]
fn test_password_is_checked() {
    let t = Test::with_key();
    let id = first_id(&t);

    let output = t.run(&["keys", "password", &id, "--password", "wrong"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid password");
    assert_eq!(t.list_json()[0]["password_valid"], false);

    let output = t.run(&["keys", "password", &id, "--password", PASSWORD]);
    assert_success(&output);
    assert_stdout_contains(&output, "password verified");
    assert_eq!(t.list_json()[0]["password_valid"], true);
}

#[test]
fn test_master_password_recovers_missing_cache() {
    let t = Test::with_key();
    let settings = t.settings();
    let cleared: String = settings
        .lines()
        .filter(|line| !line.contains("correct horse") || line.contains("encryption.masterPassword"))
        .map(|line| format!("{}\n", line))
        .collect();
    std::fs::write(t.home.path().join("settings.toml"), cleared).unwrap();

    assert_eq!(t.list_json()[0]["password_valid"], true);
}

#[test]
fn test_toggle_hides_key() {
    let t = Test::with_key();
    let id = first_id(&t);

    let output = t.run(&["keys", "toggle", &id]);
    assert_success(&output);
    assert_stdout_contains(&output, "disabled");
    assert_stdout_contains(&output, "active master key");

    let output = t.run(&["keys", "list", "--json"]);
    assert_success(&output);
    let visible: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(visible.as_array().unwrap().is_empty());

    let output = t.run(&["keys", "list"]);
    assert_stdout_contains(&output, "disabled key(s) hidden");

    assert_eq!(t.list_json()[0]["enabled"], false);

    let output = t.run(&["keys", "toggle", &id]);
    assert_success(&output);
    assert_stdout_contains(&output, "enabled");
    assert_eq!(t.list_json()[0]["enabled"], true);
}

#[test]
fn test_key_prefix_lookup() {
    let t = Test::with_key();
    let id = first_id(&t);

    let output = t.run(&["keys", "toggle", &id[..6]]);
    assert_success(&output);
    assert_eq!(t.list_json()[0]["enabled"], false);
}

#[test]
fn test_upgrade_when_current() {
    let t = Test::with_key();
    let id = first_id(&t);

    let output = t.run(&["keys", "upgrade", &id]);
    assert_success(&output);
    assert_stdout_contains(&output, "already up to date");
}

#[test]
fn test_upgrade_rewraps_in_place() {
    let t = Test::with_key();
    let before = t.list_json()[0].clone();
    let id = before["id"].as_str().unwrap().to_string();

    t.set_work_factor(TEST_WORK_FACTOR + 1);
    assert_eq!(t.list_json()[0]["needs_upgrade"], true);

    let output = t.run(&["keys", "upgrade", &id]);
    assert_success(&output);
    assert_stdout_contains(&output, "upgraded successfully");

    let after = t.list_json()[0].clone();
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["work_factor"], TEST_WORK_FACTOR + 1);
    assert_eq!(after["created_time"], before["created_time"]);
    assert_ne!(after["fingerprint"], before["fingerprint"]);
    assert_eq!(after["password_valid"], true);
    assert_eq!(after["needs_upgrade"], false);
    assert!(t.setting("sync.requestedAt").is_some());
}

#[test]
fn test_upgrade_without_password_is_refused() {
    let t = Test::with_key();
    let id = first_id(&t);
    let output = t.run(&["keys", "password", &id, "--password", "wrong"]);
    assert_failure(&output);
    t.run(&["master-password", "--password", "also wrong"]);
    t.set_work_factor(TEST_WORK_FACTOR + 1);

    let output = t.run(&["keys", "upgrade", &id]);
    assert_failure(&output);
    assert_stdout_contains(&output, "Please enter your password");
    assert_eq!(t.list_json()[0]["work_factor"], TEST_WORK_FACTOR);
}
