//! Integration tests for loading, overriding, validating and merging
//! configuration.
//!
//! Tests that modify environment variables are marked with `#[serial]`;
//! environment variables are process-global, so they must not run
//! concurrently with each other.

mod common;

use common::{fragment, ProjectFixture};
use devconf::config::environment::{AUTO_OPEN_BROWSER_VAR, HOST_VAR, PORT_VAR, POLL_VAR};
use devconf::config::{
    ConfigLoader, ConfigMerger, ConfigValidator, DevOverlay, DevSettings, EnvOverrides,
};
use devconf::Error;
use serial_test::serial;
use serde_json::json;
use std::env;

/// RAII guard for setting and restoring an environment variable.
struct EnvGuard {
    key: &'static str,
    old_value: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self { key, old_value }
    }

    fn remove(key: &'static str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self { key, old_value }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(value) => env::set_var(self.key, value),
            None => env::remove_var(self.key),
        }
    }
}

// ============================================================================
// Loading and merging
// ============================================================================

#[test]
fn test_merge_base_with_overlay_file() {
    let project = ProjectFixture::with_base();
    project.write(
        "dev.json",
        r#"{"devtool": "eval", "output": {"filename": "app.js"}, "plugins": [{"name": "extra"}]}"#,
    );

    let sources = ConfigLoader::load_fragments(&[
        project.path().join("base.yaml"),
        project.path().join("dev.json"),
    ])
    .unwrap();
    let merged = ConfigMerger::merge_all(sources.iter().map(|s| &s.fragment));

    assert_eq!(merged.get("devtool"), Some(&json!("eval")));
    assert_eq!(
        merged.get("output"),
        Some(&json!({"path": "/project/dist", "filename": "app.js", "publicPath": "/"}))
    );
    assert_eq!(
        merged.get("plugins"),
        Some(&json!([{"name": "vueLoader"}, {"name": "extra"}]))
    );
}

#[test]
fn test_merge_leaves_inputs_untouched() {
    let project = ProjectFixture::with_base();
    let base = ConfigLoader::load_fragment(&project.path().join("base.yaml"))
        .unwrap()
        .fragment;
    let snapshot = base.clone();

    let overlay = DevOverlay::build(&DevSettings::default(), &EnvOverrides::default());
    let _ = ConfigMerger::merge(&base, &overlay);
    let _ = ConfigMerger::merge(&base, &fragment(json!({"entry": null})));

    assert_eq!(base, snapshot);
}

#[test]
fn test_type_mismatch_overlay_wins() {
    let base = fragment(json!({"devServer": {"proxy": {"/api": "x"}}, "externals": ["a"]}));
    let overlay = fragment(json!({"devServer": {"proxy": false}, "externals": {"b": "B"}}));

    let merged = ConfigMerger::merge(&base, &overlay);
    assert_eq!(merged.get_path(&["devServer", "proxy"]), Some(&json!(false)));
    assert_eq!(merged.get("externals"), Some(&json!({"b": "B"})));
}

// ============================================================================
// Settings files and validation
// ============================================================================

#[test]
fn test_settings_file_validates() {
    let project = ProjectFixture::new();
    let path = project.write(
        "dev.yaml",
        "assetsPublicPath: /app/\nenv:\n  NODE_ENV: '\"development\"'\n  API_URL: '\"/api\"'\n",
    );

    let settings = ConfigLoader::load_settings(&path).unwrap();
    ConfigValidator::validate(&settings).unwrap();
    assert_eq!(settings.env.len(), 2);
}

#[test]
fn test_invalid_settings_file_rejected() {
    let project = ProjectFixture::new();
    let path = project.write("dev.yaml", "assetsPublicPath: app/\n");

    let settings = ConfigLoader::load_settings(&path).unwrap();
    assert!(matches!(
        ConfigValidator::validate(&settings),
        Err(Error::Validation { .. })
    ));
}

// ============================================================================
// Environment overrides
// ============================================================================

#[test]
#[serial]
fn test_env_overrides_from_process() {
    let _host = EnvGuard::set(HOST_VAR, "0.0.0.0");
    let _port = EnvGuard::set(PORT_VAR, "3000");
    let _open = EnvGuard::set(AUTO_OPEN_BROWSER_VAR, "yes");
    let _poll = EnvGuard::remove(POLL_VAR);

    let env = EnvOverrides::from_env().unwrap();
    assert_eq!(env.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(env.port, Some(3000));
    assert_eq!(env.auto_open_browser, Some(true));
    assert_eq!(env.poll, None);

    let mut settings = DevSettings::default();
    env.apply_to(&mut settings);
    let overlay = DevOverlay::build(&settings, &env);
    assert_eq!(overlay.get_path(&["devServer", "host"]), Some(&json!("0.0.0.0")));
    assert_eq!(overlay.get_path(&["devServer", "port"]), Some(&json!(3000)));
    assert_eq!(overlay.get_path(&["devServer", "open"]), Some(&json!(true)));
}

#[test]
#[serial]
fn test_invalid_port_env_rejected() {
    let _port = EnvGuard::set(PORT_VAR, "eighty");

    assert!(matches!(
        EnvOverrides::from_env(),
        Err(Error::InvalidPort { .. })
    ));
}

#[test]
#[serial]
fn test_empty_env_values_ignored() {
    let _host = EnvGuard::set(HOST_VAR, "");
    let _port = EnvGuard::set(PORT_VAR, "  ");

    let env = EnvOverrides::from_env().unwrap();
    assert_eq!(env.host, None);
    assert_eq!(env.port, None);
}
