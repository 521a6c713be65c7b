//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builders isolated from the caller's environment
//! - Fixture configuration files

use assert_cmd::Command;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that change devconf's behaviour.
const DEVCONF_VARS: &[&str] = &[
    "HOST",
    "PORT",
    "DEVCONF_NOTIFY_ON_ERRORS",
    "DEVCONF_ERROR_OVERLAY",
    "DEVCONF_AUTO_OPEN_BROWSER",
    "DEVCONF_POLL",
    "DEVCONF_LOG_MODE",
];

/// A small base configuration.
#[allow(dead_code)]
pub const BASE_YAML: &str = "\
entry:
  app: ./src/main.js
module:
  rules:
    - test: \"\\\\.vue$\"
      loader: vue-loader
plugins:
  - name: vueLoader
";

/// Test environment with an isolated working directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a command builder for the devconf binary.
    ///
    /// The command runs in the temp directory with every devconf-related
    /// environment variable removed.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("devconf").expect("Failed to find devconf binary");
        cmd.current_dir(&self.temp_path);
        for var in DEVCONF_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file into the test environment and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Write the fixture base configuration as `base.yaml`.
    pub fn write_base(&self) -> PathBuf {
        self.write("base.yaml", BASE_YAML)
    }

    /// Run `devconf publish` with the given extra arguments and parse the
    /// JSON it prints.
    ///
    /// # Panics
    /// Panics if the command fails or prints something other than JSON.
    pub fn publish_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .command()
            .arg("publish")
            .args(args)
            .output()
            .expect("Failed to run publish command");

        assert!(
            output.status.success(),
            "Publish failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        serde_json::from_slice(&output.stdout).expect("Output is not valid JSON")
    }
}

/// Bind a loopback listener on an OS-assigned port.
///
/// The port stays taken until the listener is dropped.
#[allow(dead_code)]
pub fn occupy_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
    let port = listener.local_addr().expect("No local address").port();
    (listener, port)
}
