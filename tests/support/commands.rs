//! Command helper methods for Test.

use super::{fixtures::PASSWORD, Test};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a keyward command bound to the test home.
    ///
    /// `KEYWARD_LOG` is cleared so log lines never mix into assertions.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("keyward").expect("failed to find keyward binary");
        cmd.env("KEYWARD_HOME", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("KEYWARD_LOG");
        cmd.env_remove("KEYWARD_PASSWORD");
        cmd
    }

    /// Run keyward with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run keyward")
    }

    /// Shortcut for `keyward init`.
    pub fn init_cmd(&self) -> Output {
        self.run(&["init"])
    }

    /// Shortcut for `keyward keys new` with the default test password.
    pub fn new_key(&self) -> Output {
        self.new_key_with(PASSWORD)
    }

    /// Shortcut for `keyward keys new` with `password`.
    pub fn new_key_with(&self, password: &str) -> Output {
        self.run(&["keys", "new", "--password", password])
    }

    /// Shortcut for `keyward keys list --all --json`.
    pub fn list_json(&self) -> serde_json::Value {
        let output = self.run(&["keys", "list", "--all", "--json"]);
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("keys list output is not JSON")
    }

    /// Shortcut for `keyward status`.
    pub fn status(&self) -> Output {
        self.run(&["status"])
    }
}
