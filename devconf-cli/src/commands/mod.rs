//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `publish`: Publish a development configuration with a negotiated port
//! - `merge`: Merge configuration files
//! - `probe`: Find a free port
//! - `validate`: Validate a development settings file
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod merge;
pub mod probe;
pub mod publish;
pub mod validate;

pub use completions::CompletionsCommand;
pub use merge::MergeCommand;
pub use probe::ProbeCommand;
pub use publish::PublishCommand;
pub use validate::ValidateCommand;
