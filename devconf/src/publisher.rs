//! Configuration publishing.
//!
//! Publishing is all-or-nothing: either the merged configuration comes back
//! with the negotiated port and the full plugin pipeline applied, or the
//! negotiation failure comes back and nothing else does.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::config::{
    ConfigFragment, ConfigMerger, DevOverlay, DevSettings, EnvOverrides, MergedConfig,
    NotifierSpec,
};
use crate::error::Result;
use crate::pipeline::{PipelineBuilder, PluginSpec};
use crate::port::negotiator::PortNegotiator;
use crate::port::probe::PortProber;
use crate::port::{PortPreference, ResolvedPort};

/// Where a publish cycle is.
///
/// `Idle -> Negotiating -> Publishing` on success,
/// `Idle -> Negotiating -> Failed` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    /// Nothing started yet.
    Idle,
    /// Waiting on the port probe.
    Negotiating,
    /// Port resolved; finishing the configuration.
    Publishing,
    /// Negotiation failed. Terminal.
    Failed,
}

impl PublishState {
    /// Returns `true` for states a cycle cannot leave.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Publishing | Self::Failed)
    }

    fn enter(self, next: Self) -> Self {
        log::debug!("publish: {self} -> {next}");
        next
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Negotiating => write!(f, "negotiating"),
            Self::Publishing => write!(f, "publishing"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A finished configuration.
///
/// Serializes as the single nested mapping the build/serve engine consumes:
/// the merged options, `devServer.port` set to the negotiated port, and the
/// pipeline appended to `plugins`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PublishedConfig {
    config: MergedConfig,
    #[serde(skip)]
    pipeline: Vec<PluginSpec>,
    #[serde(skip)]
    port: ResolvedPort,
}

impl PublishedConfig {
    /// The finished configuration.
    #[must_use]
    pub fn config(&self) -> &MergedConfig {
        &self.config
    }

    /// The pipeline that was appended to `plugins`, in order.
    #[must_use]
    pub fn pipeline(&self) -> &[PluginSpec] {
        &self.pipeline
    }

    /// The negotiated port.
    #[must_use]
    pub fn port(&self) -> ResolvedPort {
        self.port
    }

    /// The configured `devServer.host`, if any.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.config
            .get_path(&["devServer", "host"])
            .and_then(Value::as_str)
    }

    /// The configuration as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.config.as_fragment().clone().into_value()
    }

    /// Consumes into the finished fragment.
    #[must_use]
    pub fn into_fragment(self) -> ConfigFragment {
        self.config.into_fragment()
    }
}

/// Produces development configurations.
///
/// Holds everything a publish cycle needs up front: the prober, the settings,
/// the environment overrides read at startup, and the optional notifier
/// capability. Publishing itself keeps no state between calls, so concurrent
/// publishes are independent (they may still race for the same ports).
///
/// # Examples
///
/// ```
/// use devconf::config::{ConfigFragment, DevSettings, EnvOverrides};
/// use devconf::port::probe::MockPortProber;
/// use devconf::ConfigPublisher;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let publisher = ConfigPublisher::new(
///     MockPortProber::with_occupied([8080]),
///     DevSettings::default(),
///     EnvOverrides::default(),
/// );
///
/// let published = publisher.publish_dev(&ConfigFragment::new()).await.unwrap();
/// assert_eq!(published.port().value(), 8081);
/// # });
/// ```
#[derive(Debug)]
pub struct ConfigPublisher<P: PortProber> {
    negotiator: PortNegotiator<P>,
    settings: DevSettings,
    env: EnvOverrides,
    notifier: Option<NotifierSpec>,
}

impl<P: PortProber> ConfigPublisher<P> {
    /// Creates a publisher.
    ///
    /// Boolean environment overrides are folded into `settings` here, once.
    #[must_use]
    pub fn new(prober: P, mut settings: DevSettings, env: EnvOverrides) -> Self {
        env.apply_to(&mut settings);
        Self {
            negotiator: PortNegotiator::new(prober),
            settings,
            env,
            notifier: None,
        }
    }

    /// Supplies the desktop notifier capability.
    #[must_use]
    pub fn with_notifier(mut self, notifier: NotifierSpec) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The effective settings.
    #[must_use]
    pub fn settings(&self) -> &DevSettings {
        &self.settings
    }

    /// The environment overrides.
    #[must_use]
    pub fn env(&self) -> &EnvOverrides {
        &self.env
    }

    /// The prober behind the negotiator.
    #[must_use]
    pub fn prober(&self) -> &P {
        self.negotiator.prober()
    }

    /// Preferred port: `PORT` override first, then the configured port.
    #[must_use]
    pub fn preference(&self) -> PortPreference {
        PortPreference {
            override_port: self.env.port,
            default_port: self.settings.port,
        }
    }

    /// The development overlay for these settings.
    #[must_use]
    pub fn dev_overlay(&self) -> ConfigFragment {
        DevOverlay::build(&self.settings, &self.env)
    }

    /// Publish `overlay` merged on top of `base`.
    ///
    /// The merge and the port negotiation are driven together; the pipeline
    /// is built only once the port is known. A `plugins` value in the merged
    /// options that is not a sequence is replaced by the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Negotiation`] when no port could be
    /// negotiated. No configuration is returned in that case.
    pub async fn publish(
        &self,
        base: &ConfigFragment,
        overlay: &ConfigFragment,
        preference: PortPreference,
    ) -> Result<PublishedConfig> {
        let request = preference.resolve();
        let state = PublishState::Idle.enter(PublishState::Negotiating);

        let (merged, negotiated) = tokio::join!(
            async { ConfigMerger::merge(base, overlay) },
            self.negotiator.negotiate(request),
        );

        let port = match negotiated {
            Ok(port) => port,
            Err(failure) => {
                state.enter(PublishState::Failed);
                return Err(failure.into());
            }
        };
        let state = state.enter(PublishState::Publishing);

        let published = self.finish(merged, port)?;
        log::info!(
            "published configuration on port {port} with {} plugins ({state})",
            published.pipeline.len()
        );
        Ok(published)
    }

    /// Publish the development overlay derived from the settings on top of
    /// `base`, starting negotiation from [`ConfigPublisher::preference`].
    ///
    /// # Errors
    ///
    /// Same as [`ConfigPublisher::publish`].
    pub async fn publish_dev(&self, base: &ConfigFragment) -> Result<PublishedConfig> {
        let overlay = self.dev_overlay();
        self.publish(base, &overlay, self.preference()).await
    }

    fn finish(&self, mut merged: MergedConfig, port: ResolvedPort) -> Result<PublishedConfig> {
        merged
            .fragment_mut()
            .set_path(&["devServer", "port"], Value::from(port.value()));

        let pipeline =
            PipelineBuilder::new(&self.settings, self.notifier.as_ref()).build(&merged, port);
        let rendered = pipeline
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        merged.fragment_mut().extend_list("plugins", rendered);

        Ok(PublishedConfig {
            config: merged,
            pipeline,
            port,
        })
    }
}
