#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # devconf
//!
//! A library for composing development-server build configurations.
//!
//! A shared base configuration is merged with a development overlay, a free
//! port is negotiated asynchronously starting from a preferred one, the
//! development plugin pipeline is built, and exactly one finished
//! configuration is published.
//!
//! ## Core Types
//!
//! - [`ConfigFragment`] and [`MergedConfig`]: untyped option mappings
//! - [`ConfigMerger`]: deep merge of fragments
//! - [`Port`], [`PortRequest`] and [`ResolvedPort`]: port negotiation types
//! - [`PluginSpec`]: one entry of the plugin pipeline
//! - [`ConfigPublisher`] and [`PublishedConfig`]: the publishing cycle
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use devconf::config::{ConfigFragment, DevSettings, EnvOverrides};
//! use devconf::port::probe::MockPortProber;
//! use devconf::ConfigPublisher;
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let base = ConfigFragment::try_from(json!({"entry": {"app": "./src/main.js"}})).unwrap();
//!
//! // 8080 is taken, so the next free port is used.
//! let publisher = ConfigPublisher::new(
//!     MockPortProber::with_occupied([8080]),
//!     DevSettings::default(),
//!     EnvOverrides::default(),
//! );
//! let published = publisher.publish_dev(&base).await.unwrap();
//!
//! assert_eq!(published.port().value(), 8081);
//! assert_eq!(
//!     published.config().get_path(&["devServer", "port"]),
//!     Some(&json!(8081))
//! );
//! # });
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod port;
pub mod publisher;

// Re-export key types at crate root for convenience
pub use config::{
    ConfigFragment, ConfigLoader, ConfigMerger, ConfigValidator, DevOverlay, DevSettings,
    EnvOverrides, MergedConfig, NotifierSpec,
};
pub use error::{Error, NegotiationFailure, ProbeError, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use pipeline::{ErrorChannel, PipelineBuilder, PluginSpec};
pub use port::negotiator::PortNegotiator;
pub use port::probe::{MockPortProber, PortProber, SystemPortProber};
pub use port::{Port, PortPreference, PortRequest, ResolvedPort};
pub use publisher::{ConfigPublisher, PublishState, PublishedConfig};
