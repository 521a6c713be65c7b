//! Common test utilities for integration tests.
//!
//! This module provides fixture files and helpers shared by the devconf
//! integration suites.

use std::fs;
use std::path::{Path, PathBuf};

use devconf::ConfigFragment;
use serde_json::Value;
use tempfile::TempDir;

/// A base configuration in the shape a project would share between its
/// development and production builds.
#[allow(dead_code)]
pub const BASE_YAML: &str = r#"
entry:
  app: ./src/main.js
output:
  path: /project/dist
  filename: "[name].js"
  publicPath: /
resolve:
  extensions: [".js", ".vue", ".json"]
module:
  rules:
    - test: "\\.vue$"
      loader: vue-loader
    - test: "\\.js$"
      loader: babel-loader
plugins:
  - name: vueLoader
"#;

/// A temporary project directory holding configuration files.
///
/// The directory is removed when the fixture is dropped.
#[allow(dead_code)]
pub struct ProjectFixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl ProjectFixture {
    /// Creates an empty project directory.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Creates a project with `base.yaml` already written.
    pub fn with_base() -> Self {
        let fixture = Self::new();
        fixture.write("base.yaml", BASE_YAML);
        fixture
    }

    /// The project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `name` under the project root.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }
}

/// Converts a JSON literal into a fragment.
#[allow(dead_code)]
pub fn fragment(value: Value) -> ConfigFragment {
    ConfigFragment::try_from(value).expect("fixture must be a JSON object")
}
