//! Test support utilities for keyward integration tests.
//!
//! [`Test`] drives the binary against a temporary home directory.
//! [`mocks`] provides in-memory collaborators for driving the controller
//! directly.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mocks::*;

use tempfile::TempDir;

/// Test environment with an isolated home directory.
///
/// Child processes get `KEYWARD_HOME`, so tests can run in parallel.
pub struct Test {
    pub home: TempDir,
}

impl Test {
    /// Create an empty home with a fast key derivation config.
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        let t = Self { home };
        t.set_work_factor(TEST_WORK_FACTOR);
        t
    }

    /// Create an initialized home.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create an initialized home with one active master key.
    pub fn with_key() -> Self {
        let t = Self::init();
        let output = t.new_key();
        assert!(
            output.status.success(),
            "Failed to create key: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Write `items.json` with `(id, encrypted)` entries.
    pub fn write_items(&self, items: &[(&str, bool)]) {
        let items: Vec<serde_json::Value> = items
            .iter()
            .map(|(id, encrypted)| {
                serde_json::json!({ "id": id, "encryption_applied": encrypted, "force_sync": false })
            })
            .collect();
        std::fs::write(
            self.home.path().join("items.json"),
            serde_json::to_string(&items).unwrap(),
        )
        .expect("failed to write items");
    }

    /// Parsed `items.json`.
    pub fn read_items(&self) -> Vec<serde_json::Value> {
        let contents = std::fs::read_to_string(self.home.path().join("items.json")).unwrap();
        serde_json::from_str(&contents).unwrap()
    }

    /// Raw `settings.toml`.
    pub fn settings(&self) -> String {
        std::fs::read_to_string(self.home.path().join("settings.toml")).unwrap_or_default()
    }
}

impl Test {
    /// One scalar value from `settings.toml`.
    pub fn setting(&self, key: &str) -> Option<String> {
        let parsed: toml::Value = toml::from_str(&self.settings()).ok()?;
        parsed
            .get("values")?
            .get(key)?
            .as_str()
            .map(str::to_string)
    }

    /// Overwrite the work factor in `config.toml`.
    pub fn set_work_factor(&self, work_factor: u8) {
        std::fs::write(
            self.home.path().join("config.toml"),
            format!("[poll]\ninterval_ms = 100\n\n[kdf]\nwork_factor = {}\n", work_factor),
        )
        .expect("failed to write config");
    }
}
