//! Development settings schema.
//!
//! These are the typed knobs the development overlay is derived from: where
//! to serve, which port to prefer, how errors are surfaced, and where static
//! assets live.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default host the dev server binds.
pub const DEFAULT_HOST: &str = "localhost";

/// Default preferred port.
pub const DEFAULT_PORT: u16 = 8080;

/// Development settings.
///
/// Every field has a default, so an empty document is a valid configuration.
///
/// # Examples
///
/// ```
/// use devconf::config::DevSettings;
///
/// let settings: DevSettings = serde_yaml::from_str("port: 3000\nnotifyOnErrors: false").unwrap();
/// assert_eq!(settings.port, 3000);
/// assert!(!settings.notify_on_errors);
/// assert_eq!(settings.host, "localhost");
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DevSettings {
    /// Host the dev server binds.
    pub host: String,

    /// Preferred port; negotiation starts here.
    pub port: u16,

    /// Open a browser once the server is up.
    pub auto_open_browser: bool,

    /// Show compile errors in a browser overlay.
    pub error_overlay: bool,

    /// Raise desktop notifications on compile errors.
    pub notify_on_errors: bool,

    /// Use polling instead of filesystem events for watching.
    pub poll: bool,

    /// Source map style.
    pub devtool: String,

    /// Emit source maps for stylesheets.
    pub css_source_map: bool,

    /// Run stylesheets through PostCSS.
    pub use_post_css: bool,

    /// Sub-directory static assets are copied into.
    pub assets_sub_directory: String,

    /// Public URL path assets are served from.
    pub assets_public_path: String,

    /// Proxy table: request path prefix to proxy options.
    pub proxy_table: BTreeMap<String, ProxyTarget>,

    /// Directory holding static assets to copy verbatim.
    pub static_dir: String,

    /// HTML template the bundle is injected into.
    pub index_template: String,

    /// Favicon added to the generated page.
    pub favicon: Option<String>,

    /// Definitions injected as `process.env.*`.
    ///
    /// Values are source text, so string values carry their own quotes.
    pub env: BTreeMap<String, String>,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            auto_open_browser: false,
            error_overlay: true,
            notify_on_errors: true,
            poll: false,
            devtool: "cheap-module-eval-source-map".to_string(),
            css_source_map: true,
            use_post_css: true,
            assets_sub_directory: "static".to_string(),
            assets_public_path: "/".to_string(),
            proxy_table: BTreeMap::new(),
            static_dir: "static".to_string(),
            index_template: "index.html".to_string(),
            favicon: Some("favicon.ico".to_string()),
            env: BTreeMap::from([("NODE_ENV".to_string(), "\"development\"".to_string())]),
        }
    }
}

/// A proxy table entry.
///
/// Either a bare target URL or a full options object. Options other than
/// `changeOrigin` and `pathRewrite` are kept as-is.
///
/// # Examples
///
/// ```
/// use devconf::config::ProxyTarget;
///
/// let short: ProxyTarget = serde_yaml::from_str("http://localhost:3000").unwrap();
/// assert_eq!(short.target(), "http://localhost:3000");
///
/// let full: ProxyTarget =
///     serde_yaml::from_str("target: http://api\nchangeOrigin: true").unwrap();
/// assert_eq!(full.target(), "http://api");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProxyTarget {
    /// Just the upstream URL.
    Url(String),
    /// Upstream URL plus options.
    Options {
        /// Upstream URL.
        target: String,
        /// Rewrite the `Host` header to the target.
        #[serde(
            default,
            rename = "changeOrigin",
            skip_serializing_if = "Option::is_none"
        )]
        change_origin: Option<bool>,
        /// Path rewrite rules, regex to replacement.
        #[serde(
            default,
            rename = "pathRewrite",
            skip_serializing_if = "Option::is_none"
        )]
        path_rewrite: Option<BTreeMap<String, String>>,
        /// Any other proxy option, passed through untouched.
        #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
        extra: BTreeMap<String, serde_json::Value>,
    },
}

impl ProxyTarget {
    /// The upstream URL.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Options { target, .. } => target,
        }
    }
}

/// Capability for desktop error notifications.
///
/// Supplied by the caller; when absent, compile errors are only reported on
/// the console.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotifierSpec {
    /// Notification title, usually the package name.
    pub title: String,
    /// Optional icon shown with the notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NotifierSpec {
    /// Notifier titled `title` without an icon.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: None,
        }
    }
}
