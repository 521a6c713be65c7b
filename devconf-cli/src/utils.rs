//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading and output rendering.

use crate::error::CliError;
use clap::ValueEnum;
use devconf::config::{ConfigFragment, ConfigLoader, ConfigMerger, ConfigValidator, DevSettings};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

/// Output format for rendered configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML document
    Yaml,
}

/// Load development settings, falling back to the defaults.
///
/// Loaded settings are validated before they are returned.
pub fn load_settings(path: Option<&Path>) -> Result<DevSettings, CliError> {
    let settings = match path {
        Some(path) => ConfigLoader::load_settings(path)?,
        None => DevSettings::default(),
    };
    ConfigValidator::validate(&settings)?;
    Ok(settings)
}

/// Load fragment files and merge them, lowest precedence first.
pub fn load_merged(paths: &[PathBuf]) -> Result<ConfigFragment, CliError> {
    let sources = ConfigLoader::load_fragments(paths)?;
    Ok(ConfigMerger::merge_all(sources.iter().map(|s| &s.fragment)).into_fragment())
}

/// Render `value` in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value).map_err(devconf::Error::from)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(devconf::Error::from)?,
    };
    Ok(rendered)
}

/// Write rendered output to `path`, or to stdout when no path is given.
pub fn emit(rendered: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, rendered)?,
        None => io::stdout().lock().write_all(rendered.as_bytes())?,
    }
    Ok(())
}
