//! Tests for `keyward init`.

use crate::support::*;

#[test]
fn test_init_creates_home() {
    let t = Test::new();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "initialized");
    assert_stdout_contains(&output, "keyward keys new");

    assert!(t.home.path().join("settings.toml").exists());
    assert!(t.home.path().join("master_keys").is_dir());
    assert_eq!(t.setting("encryption.enabled").as_deref(), Some("0"));
    assert_eq!(t.setting("encryption.shouldReencrypt").as_deref(), Some("0"));
}

#[test]
fn test_init_keeps_existing_config() {
    let t = Test::init();

    let config = std::fs::read_to_string(t.home.path().join("config.toml")).unwrap();
    assert!(config.contains(&format!("work_factor = {}", TEST_WORK_FACTOR)));
}

#[test]
fn test_init_twice_is_harmless() {
    let t = Test::init();
    let before = t.settings();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "already initialized");
    assert_eq!(t.settings(), before);
}
