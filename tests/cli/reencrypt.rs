//! Tests for `keyward reencrypt`.

use crate::support::*;

fn all_forced(t: &Test) -> bool {
    t.read_items().iter().all(|item| item["force_sync"] == true)
}

#[test]
fn test_reencrypt_without_terminal_is_declined() {
    let t = Test::with_key();
    t.write_items(&[("a", false), ("b", false)]);

    let output = t.run(&["reencrypt"]);
    assert_success(&output);
    assert_stdout_contains(&output, "re-encrypt your complete database");
    assert_stdout_contains(&output, "--yes");
    assert_stdout_contains(&output, "nothing was changed");

    assert!(t.read_items().iter().all(|item| item["force_sync"] == false));
    assert!(t.setting("sync.requestedAt").is_none());
    assert_eq!(t.setting("encryption.shouldReencrypt").as_deref(), Some("2"));
}

#[test]
fn test_reencrypt_confirmed() {
    let t = Test::with_key();
    t.write_items(&[("a", false), ("b", true)]);

    let output = t.run(&["reencrypt", "--yes"]);
    assert_success(&output);
    assert_stdout_contains(&output, "re-encrypted and synced again");

    assert!(all_forced(&t));
    assert!(t.setting("sync.requestedAt").is_some());
    assert_eq!(t.setting("encryption.shouldReencrypt").as_deref(), Some("0"));
}

#[test]
fn test_reencrypt_later_only_clears_reminder() {
    let t = Test::with_key();
    t.write_items(&[("a", false)]);

    let output = t.run(&["reencrypt", "--later"]);
    assert_success(&output);
    assert_stdout_contains(&output, "dismissed");

    assert!(!all_forced(&t));
    assert!(t.setting("sync.requestedAt").is_none());
    assert_eq!(t.setting("encryption.shouldReencrypt").as_deref(), Some("0"));
}

#[test]
fn test_reencrypt_with_corrupt_index_alerts() {
    let t = Test::with_key();
    std::fs::write(t.home.path().join("items.json"), "{not json").unwrap();

    let output = t.run(&["reencrypt", "--yes"]);
    assert_failure(&output);
    assert_stdout_contains(&output, "Could not re-encrypt data");
    assert_stdout_excludes(&output, "nothing was changed");
    assert!(t.setting("sync.requestedAt").is_none());
}
