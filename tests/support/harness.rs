use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Polling settings that keep CLI tests fast.
pub const FAST_POLLING: &str = r#"---
polling:
  interval_ms: 0
  empty_response_delay_ms: 0
  max_attempts: 3
---

# Test Config
"#;

/// TestHarness runs the face-relations binary in an isolated temp directory.
///
/// HOME and XDG_CONFIG_HOME point inside the temp dir so a developer's global
/// config never leaks into a test run.
pub struct TestHarness {
    pub dir: TempDir,
    pub config_path: PathBuf,
    pub binary: PathBuf,
}

impl TestHarness {
    /// Creates a harness with no project config.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = dir.path().join(".face-relations/config.md");

        TestHarness {
            dir,
            config_path,
            binary: PathBuf::from(env!("CARGO_BIN_EXE_face-relations")),
        }
    }

    /// Creates a harness with the given project config content.
    pub fn with_config(content: &str) -> Self {
        let harness = Self::new();
        harness.write_config(content);
        harness
    }

    /// Creates a harness whose project config disables polling delays.
    pub fn fast() -> Self {
        Self::with_config(FAST_POLLING)
    }

    pub fn write_config(&self, content: &str) {
        let parent = self.config_path.parent().expect("config path has parent");
        fs::create_dir_all(parent).expect("Failed to create config dir");
        fs::write(&self.config_path, content).expect("Failed to write config");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let home = self.path().join("home");
        Command::new(&self.binary)
            .args(args)
            .current_dir(self.path())
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to run face-relations")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
