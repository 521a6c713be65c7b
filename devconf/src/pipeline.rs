//! Plugin pipeline construction.
//!
//! The pipeline is the ordered list of build/serve extensions activated for a
//! development build. Each entry is a [`PluginSpec`] descriptor; the engine
//! instantiates the real plugins from them. Order matters: later plugins see
//! what earlier ones produced, and the summary reporter always comes last so
//! it can report the final bound address.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{DevSettings, MergedConfig, NotifierSpec};
use crate::port::ResolvedPort;

/// Where compile errors go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorChannel {
    /// The reporter's own console output.
    Console,
    /// A desktop notification through the [`PluginSpec::ErrorNotifier`] entry.
    Notifier,
}

/// One pipeline entry.
///
/// Serialized with a `name` tag, e.g. `{"name": "hotModuleReplacement"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PluginSpec {
    /// Injects `process.env.*` definitions into the bundle.
    DefineEnv {
        /// Variable name to source text.
        process_env: BTreeMap<String, String>,
    },
    /// Enables hot module replacement.
    HotModuleReplacement,
    /// Names modules by their relative path in HMR output.
    NamedModules,
    /// Keeps the dev server running without emitting on compile errors.
    NoEmitOnErrors,
    /// Generates the HTML page and injects the bundle into it.
    HtmlTemplate {
        /// Output file name.
        filename: String,
        /// Template to start from.
        template: String,
        /// Inject script tags.
        inject: bool,
        /// Favicon to reference.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        favicon: Option<String>,
    },
    /// Copies static assets verbatim.
    CopyStatic {
        /// Source directory.
        from: String,
        /// Destination sub-directory.
        to: String,
        /// Glob patterns to skip.
        ignore: Vec<String>,
    },
    /// Raises desktop notifications for compile errors.
    ErrorNotifier {
        /// The notifier capability supplied by the caller.
        notifier: NotifierSpec,
    },
    /// Prints the summary once compilation succeeds.
    Summary {
        /// Address the server is reachable at.
        address: String,
        /// Messages shown on successful compilation.
        messages: Vec<String>,
        /// Where errors are reported.
        on_errors: ErrorChannel,
    },
}

impl PluginSpec {
    /// The descriptor's tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DefineEnv { .. } => "defineEnv",
            Self::HotModuleReplacement => "hotModuleReplacement",
            Self::NamedModules => "namedModules",
            Self::NoEmitOnErrors => "noEmitOnErrors",
            Self::HtmlTemplate { .. } => "htmlTemplate",
            Self::CopyStatic { .. } => "copyStatic",
            Self::ErrorNotifier { .. } => "errorNotifier",
            Self::Summary { .. } => "summary",
        }
    }
}

impl fmt::Display for PluginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the development pipeline.
///
/// # Examples
///
/// ```
/// use devconf::config::{ConfigFragment, ConfigMerger, DevSettings};
/// use devconf::pipeline::{PipelineBuilder, PluginSpec};
/// use devconf::{Port, ResolvedPort};
///
/// let settings = DevSettings::default();
/// let merged = ConfigMerger::merge(&ConfigFragment::new(), &ConfigFragment::new());
/// let port = ResolvedPort::new(Port::try_from(8081).unwrap());
///
/// let pipeline = PipelineBuilder::new(&settings, None).build(&merged, port);
/// match pipeline.last() {
///     Some(PluginSpec::Summary { address, .. }) => assert_eq!(address, "http://localhost:8081"),
///     other => panic!("unexpected last plugin: {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PipelineBuilder<'a> {
    settings: &'a DevSettings,
    notifier: Option<&'a NotifierSpec>,
}

impl<'a> PipelineBuilder<'a> {
    /// Creates a builder for `settings`, with an optional notifier capability.
    #[must_use]
    pub fn new(settings: &'a DevSettings, notifier: Option<&'a NotifierSpec>) -> Self {
        Self { settings, notifier }
    }

    /// Build the ordered pipeline for `config` served on `port`.
    ///
    /// The same inputs always produce the same sequence.
    #[must_use]
    pub fn build(&self, config: &MergedConfig, port: ResolvedPort) -> Vec<PluginSpec> {
        let settings = self.settings;
        let notifier = self.error_notifier();

        let mut pipeline = vec![
            PluginSpec::DefineEnv {
                process_env: settings.env.clone(),
            },
            PluginSpec::HotModuleReplacement,
            PluginSpec::NamedModules,
            PluginSpec::NoEmitOnErrors,
            PluginSpec::HtmlTemplate {
                filename: "index.html".to_string(),
                template: settings.index_template.clone(),
                inject: true,
                favicon: settings.favicon.clone(),
            },
            PluginSpec::CopyStatic {
                from: settings.static_dir.clone(),
                to: settings.assets_sub_directory.clone(),
                ignore: vec![".*".to_string()],
            },
        ];

        let on_errors = match notifier {
            Some(notifier) => {
                pipeline.push(PluginSpec::ErrorNotifier {
                    notifier: notifier.clone(),
                });
                ErrorChannel::Notifier
            }
            None => ErrorChannel::Console,
        };

        let address = format!("http://{}:{port}", self.host(config));
        pipeline.push(PluginSpec::Summary {
            messages: vec![format!("Your application is running here: {address}")],
            address,
            on_errors,
        });

        pipeline
    }

    /// The notifier to wire up, if notifications are on and one was supplied.
    #[must_use]
    pub fn error_notifier(&self) -> Option<&'a NotifierSpec> {
        if self.settings.notify_on_errors {
            self.notifier
        } else {
            None
        }
    }

    /// The host as it ended up in the merged `devServer` block.
    fn host<'c>(&self, config: &'c MergedConfig) -> &'c str
    where
        'a: 'c,
    {
        config
            .get_path(&["devServer", "host"])
            .and_then(serde_json::Value::as_str)
            .unwrap_or(&self.settings.host)
    }
}
