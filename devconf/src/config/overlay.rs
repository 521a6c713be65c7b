//! Development overlay construction.
//!
//! Turns [`DevSettings`] and [`EnvOverrides`] into the fragment that gets
//! merged on top of the shared base: stylesheet loader rules, the source map
//! style, and the `devServer` block.

use serde_json::{json, Map, Value};

use crate::config::environment::EnvOverrides;
use crate::config::fragment::ConfigFragment;
use crate::config::schema::DevSettings;

/// Stylesheet dialects that get a loader rule, with the preprocessor they
/// need (if any) and its extra options.
const STYLE_DIALECTS: &[(&str, Option<&str>, bool)] = &[
    ("css", None, false),
    ("postcss", None, false),
    ("less", Some("less"), false),
    ("sass", Some("sass"), true),
    ("scss", Some("sass"), false),
    ("stylus", Some("stylus"), false),
    ("styl", Some("stylus"), false),
];

/// Builds the development overlay.
///
/// # Examples
///
/// ```
/// use devconf::config::{DevOverlay, DevSettings, EnvOverrides};
/// use serde_json::json;
///
/// let overlay = DevOverlay::build(&DevSettings::default(), &EnvOverrides::default());
/// assert_eq!(overlay.get_path(&["devServer", "port"]), Some(&json!(8080)));
/// assert_eq!(overlay.get_path(&["devServer", "hot"]), Some(&json!(true)));
/// ```
pub struct DevOverlay;

impl DevOverlay {
    /// Build the overlay fragment.
    ///
    /// `devServer.port` holds the preferred port; the publisher replaces it
    /// with the negotiated one.
    #[must_use]
    pub fn build(settings: &DevSettings, env: &EnvOverrides) -> ConfigFragment {
        let mut overlay = ConfigFragment::new();
        overlay.insert(
            "module",
            json!({ "rules": Self::style_rules(settings.css_source_map, settings.use_post_css) }),
        );
        overlay.insert("devtool", Value::String(settings.devtool.clone()));
        overlay.insert("devServer", Self::dev_server(settings, env));
        overlay
    }

    fn dev_server(settings: &DevSettings, env: &EnvOverrides) -> Value {
        let overlay = if settings.error_overlay {
            json!({ "warnings": false, "errors": true })
        } else {
            Value::Bool(false)
        };

        json!({
            "clientLogLevel": "warning",
            "historyApiFallback": {
                "rewrites": [
                    { "from": ".*", "to": Self::index_path(&settings.assets_public_path) }
                ]
            },
            "hot": true,
            "contentBase": false,
            "compress": true,
            "host": env.host_or(settings),
            "port": env.port.unwrap_or(settings.port),
            "open": settings.auto_open_browser,
            "overlay": overlay,
            "publicPath": settings.assets_public_path,
            "proxy": settings.proxy_table,
            "quiet": true,
            "watchOptions": { "poll": settings.poll }
        })
    }

    /// Loader rules for every stylesheet dialect.
    ///
    /// Each rule runs `vue-style-loader`, then `css-loader`, then optionally
    /// `postcss-loader`, then the dialect's own preprocessor.
    ///
    /// # Examples
    ///
    /// ```
    /// use devconf::config::DevOverlay;
    ///
    /// let rules = DevOverlay::style_rules(true, false);
    /// assert_eq!(rules.len(), 7);
    /// assert_eq!(rules[0]["test"], "\\.css$");
    /// ```
    #[must_use]
    pub fn style_rules(source_map: bool, use_post_css: bool) -> Vec<Value> {
        STYLE_DIALECTS
            .iter()
            .map(|(ext, preprocessor, indented)| {
                json!({
                    "test": format!("\\.{ext}$"),
                    "use": Self::loader_chain(source_map, use_post_css, *preprocessor, *indented),
                })
            })
            .collect()
    }

    fn loader_chain(
        source_map: bool,
        use_post_css: bool,
        preprocessor: Option<&str>,
        indented: bool,
    ) -> Vec<Value> {
        let mut chain = vec![
            Value::String("vue-style-loader".into()),
            Self::loader("css", Map::new(), source_map),
        ];
        if use_post_css {
            chain.push(Self::loader("postcss", Map::new(), source_map));
        }
        if let Some(name) = preprocessor {
            let mut options = Map::new();
            if indented {
                options.insert("indentedSyntax".into(), Value::Bool(true));
            }
            chain.push(Self::loader(name, options, source_map));
        }
        chain
    }

    fn loader(name: &str, mut options: Map<String, Value>, source_map: bool) -> Value {
        options.insert("sourceMap".into(), Value::Bool(source_map));
        json!({ "loader": format!("{name}-loader"), "options": options })
    }

    /// `index.html` under the public path, POSIX-style.
    fn index_path(public_path: &str) -> String {
        format!("{}/index.html", public_path.trim_end_matches('/'))
    }
}
