//! Command to publish a development configuration.

use crate::error::CliError;
use crate::utils::{emit, load_merged, load_settings, render, GlobalOptions, OutputFormat};
use clap::Args;
use devconf::config::{ConfigMerger, EnvOverrides, NotifierSpec};
use devconf::{ConfigPublisher, Port, SystemPortProber};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Publish a development configuration.
///
/// The base files are merged, the development overlay derived from the
/// settings is merged on top, a free port is negotiated starting from the
/// preferred one, and the finished configuration is written out.
#[derive(Args)]
pub struct PublishCommand {
    /// Base configuration files, lowest precedence first
    #[arg(long, value_name = "PATH", required = true)]
    pub base: Vec<PathBuf>,

    /// Extra overlay files merged on top of the development overlay; a
    /// `devServer.host` set here is also the host probed for a free port
    #[arg(long, value_name = "PATH")]
    pub overlay: Vec<PathBuf>,

    /// Development settings file (YAML or JSON)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Host to serve on (takes precedence over HOST and the settings)
    #[arg(long)]
    pub host: Option<String>,

    /// Preferred port; 0 lets the OS pick (takes precedence over PORT and the settings)
    #[arg(long)]
    pub port: Option<u16>,

    /// Highest port to try
    #[arg(long, value_name = "PORT", default_value_t = Port::MAX)]
    pub max_port: u16,

    /// Give up negotiating after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Title for desktop error notifications; enables the notifier
    #[arg(long, value_name = "TITLE")]
    pub notifier_title: Option<String>,

    /// Icon for desktop error notifications
    #[arg(long, value_name = "PATH", requires = "notifier_title")]
    pub notifier_icon: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write the configuration to a file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl PublishCommand {
    pub async fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Settings, environment, and explicit flags, in rising precedence
        let settings = load_settings(self.settings.as_deref())?;
        let mut env = EnvOverrides::from_env()?;
        if self.host.is_some() {
            env.host = self.host;
        }
        if self.port.is_some() {
            env.port = self.port;
        }

        // 2. Base configuration and extra overlays
        let base = load_merged(&self.base)?;
        let extra = if self.overlay.is_empty() {
            None
        } else {
            Some(load_merged(&self.overlay)?)
        };

        // 3. Publisher, probing the host the summary will advertise
        let host = extra
            .as_ref()
            .and_then(|extra| extra.get_path(&["devServer", "host"]))
            .and_then(Value::as_str)
            .unwrap_or_else(|| env.host_or(&settings))
            .to_owned();
        let mut prober = SystemPortProber::new(host).with_highest_port(self.max_port);
        if let Some(seconds) = self.timeout {
            prober = prober.with_timeout(Duration::from_secs(seconds));
        }
        let mut publisher = ConfigPublisher::new(prober, settings, env);
        if let Some(title) = self.notifier_title {
            publisher = publisher.with_notifier(NotifierSpec {
                title,
                icon: self.notifier_icon,
            });
        }

        // 4. Publish
        let published = match extra {
            None => publisher.publish_dev(&base).await?,
            Some(extra) => {
                let overlay = ConfigMerger::merge(&publisher.dev_overlay(), &extra).into_fragment();
                publisher
                    .publish(&base, &overlay, publisher.preference())
                    .await?
            }
        };

        if !global.quiet {
            eprintln!(
                "Publishing on {}:{} with {} plugins",
                published.host().unwrap_or("localhost"),
                published.port(),
                published.pipeline().len()
            );
        }

        // 5. Output
        emit(&render(&published, self.format)?, self.output.as_deref())
    }
}
