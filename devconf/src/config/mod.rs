//! Configuration fragments, settings, and their composition.
//!
//! A build configuration is composed from fragments: a shared base is loaded
//! from disk and a development overlay is derived from [`DevSettings`] plus
//! [`EnvOverrides`]. [`ConfigMerger`] combines them into a [`MergedConfig`].
//!
//! # Merge Rules
//!
//! When a key is present on both sides:
//!
//! 1. Two mappings are merged recursively
//! 2. Two sequences are concatenated, base entries first
//! 3. Anything else takes the overlay's value
//!
//! Keys present on one side only are kept as they are.
//!
//! # Examples
//!
//! ```
//! use devconf::config::{ConfigFragment, ConfigMerger, DevOverlay, DevSettings, EnvOverrides};
//! use serde_json::json;
//!
//! let base = ConfigFragment::try_from(json!({
//!     "entry": {"app": "./src/main.js"},
//!     "module": {"rules": [{"test": "\\.vue$"}]}
//! }))
//! .unwrap();
//!
//! let overlay = DevOverlay::build(&DevSettings::default(), &EnvOverrides::default());
//! let merged = ConfigMerger::merge(&base, &overlay);
//!
//! assert_eq!(merged.get_path(&["entry", "app"]), Some(&json!("./src/main.js")));
//! // base rule first, then the seven stylesheet rules
//! assert_eq!(merged.get_path(&["module", "rules"]).unwrap().as_array().unwrap().len(), 8);
//! ```

pub mod environment;
pub mod fragment;
pub mod loader;
pub mod merger;
pub mod overlay;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use environment::EnvOverrides;
pub use fragment::{ConfigFragment, MergedConfig};
pub use loader::{ConfigLoader, ConfigSource, FileFormat};
pub use merger::ConfigMerger;
pub use overlay::DevOverlay;
pub use schema::{DevSettings, NotifierSpec, ProxyTarget};
pub use validator::ConfigValidator;
