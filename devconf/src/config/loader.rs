//! Configuration file loading.
//!
//! Fragments and settings are read from YAML (`.yaml`, `.yml`) or JSON
//! (`.json`) files, picked by extension.

use crate::config::fragment::ConfigFragment;
use crate::config::schema::DevSettings;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl FileFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use devconf::config::FileFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(FileFormat::from_path(Path::new("base.yml")).unwrap(), FileFormat::Yaml);
    /// assert_eq!(FileFormat::from_path(Path::new("base.json")).unwrap(), FileFormat::Json);
    /// assert!(FileFormat::from_path(Path::new("base.toml")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A fragment together with the file it came from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Parsed fragment.
    pub fragment: ConfigFragment,
}

/// Loads configuration files.
///
/// # Examples
///
/// ```no_run
/// use devconf::config::ConfigLoader;
/// use std::path::Path;
///
/// let base = ConfigLoader::load_fragment(Path::new("build/base.yaml")).unwrap();
/// println!("{} top-level options", base.fragment.len());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a fragment file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or its
    /// top level is not a mapping. An empty YAML file is an empty fragment.
    pub fn load_fragment(path: &Path) -> Result<ConfigSource> {
        let contents = fs::read_to_string(path)?;
        let value: serde_json::Value = if contents.trim().is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            Self::parse(path, &contents)?
        };

        let fragment = ConfigFragment::try_from(value).map_err(|_| Error::NotAMapping {
            path: path.to_path_buf(),
        })?;

        Ok(ConfigSource {
            path: path.to_path_buf(),
            fragment,
        })
    }

    /// Load several fragment files, keeping the given order.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be loaded.
    pub fn load_fragments<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ConfigSource>> {
        paths
            .iter()
            .map(|p| Self::load_fragment(p.as_ref()))
            .collect()
    }

    /// Load development settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains unknown or
    /// ill-typed fields.
    pub fn load_settings(path: &Path) -> Result<DevSettings> {
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(DevSettings::default());
        }
        Self::parse(path, &contents)
    }

    fn parse<T: DeserializeOwned>(path: &Path, contents: &str) -> Result<T> {
        match FileFormat::from_path(path)? {
            FileFormat::Yaml => Ok(serde_yaml::from_str(contents)?),
            FileFormat::Json => Ok(serde_json::from_str(contents)?),
        }
    }
}
