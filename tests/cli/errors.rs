//! Error reporting and ambient behavior.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_commands_require_init() {
    let t = Test::new();

    for args in [&["status"][..], &["keys", "list"], &["reencrypt", "--later"]] {
        let output = t.run(args);
        assert_failure(&output);
        assert_stderr_contains(&output, "not initialized");
        assert_stdout_contains(&output, "run: keyward init");
    }
}

#[test]
fn test_unknown_key_id() {
    let t = Test::with_key();

    let output = t.run(&["keys", "toggle", "does-not-exist"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "master key not found: does-not-exist");
    assert_stdout_contains(&output, "keyward keys list");
}

#[test]
fn test_empty_password_rejected() {
    let t = Test::init();

    let output = t.new_key_with("");
    assert_failure(&output);
    assert_stderr_contains(&output, "password cannot be empty");
}

#[test]
fn test_invalid_config_rejected() {
    let t = Test::init();
    t.set_work_factor(0);

    let output = t.status();
    assert_failure(&output);
    assert_stderr_contains(&output, "work factor");
}

#[test]
fn test_later_conflicts_with_yes() {
    let t = Test::init();

    let output = t.run(&["reencrypt", "--later", "--yes"]);
    assert_failure(&output);
}

#[test]
fn test_debug_logs_go_to_stderr() {
    let t = Test::with_key();

    let output = t
        .cmd()
        .env("KEYWARD_LOG", "keyward=debug")
        .args(["keys", "list", "--json"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stderr_contains(&output, "controller mounted");
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed.is_array());
}

#[test]
fn test_log_json_writes_structured_lines() {
    let t = Test::with_key();

    let output = t
        .cmd()
        .env("KEYWARD_LOG", "keyward=debug")
        .args(["--log-json", "keys", "list", "--json"])
        .output()
        .unwrap();
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    let mounted = stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .any(|event| event["fields"]["message"] == "controller mounted");
    assert!(mounted, "no JSON event for mount in:\n{}", stderr);
}

#[test]
fn test_completions() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keyward"))
        .stdout(predicate::str::contains("master-password"));
}
