//! Environment variable overrides.
//!
//! The environment is read exactly once, into an [`EnvOverrides`] value that
//! is then passed around explicitly. Nothing else in the crate looks at
//! process-wide variables.

use crate::config::schema::DevSettings;
use crate::error::{Error, Result};
use crate::port::Port;
use std::env;

/// Host override.
pub const HOST_VAR: &str = "HOST";
/// Port override.
pub const PORT_VAR: &str = "PORT";
/// Override for [`DevSettings::notify_on_errors`].
pub const NOTIFY_ON_ERRORS_VAR: &str = "DEVCONF_NOTIFY_ON_ERRORS";
/// Override for [`DevSettings::error_overlay`].
pub const ERROR_OVERLAY_VAR: &str = "DEVCONF_ERROR_OVERLAY";
/// Override for [`DevSettings::auto_open_browser`].
pub const AUTO_OPEN_BROWSER_VAR: &str = "DEVCONF_AUTO_OPEN_BROWSER";
/// Override for [`DevSettings::poll`].
pub const POLL_VAR: &str = "DEVCONF_POLL";

/// Values read from the environment.
///
/// `host` and `port` take precedence over the matching settings; the boolean
/// overrides are folded into settings with [`EnvOverrides::apply_to`].
///
/// # Examples
///
/// ```
/// use devconf::config::EnvOverrides;
///
/// let env = EnvOverrides::from_lookup(|key| match key {
///     "HOST" => Some("0.0.0.0".to_string()),
///     "PORT" => Some("3000".to_string()),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(env.host.as_deref(), Some("0.0.0.0"));
/// assert_eq!(env.port, Some(3000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Host override from `HOST`.
    pub host: Option<String>,
    /// Port override from `PORT`.
    pub port: Option<u16>,
    /// From `DEVCONF_NOTIFY_ON_ERRORS`.
    pub notify_on_errors: Option<bool>,
    /// From `DEVCONF_ERROR_OVERLAY`.
    pub error_overlay: Option<bool>,
    /// From `DEVCONF_AUTO_OPEN_BROWSER`.
    pub auto_open_browser: Option<bool>,
    /// From `DEVCONF_POLL`.
    pub poll: Option<bool>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number or a boolean
    /// override is not a recognised boolean.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through `lookup`.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`EnvOverrides::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get(PORT_VAR) {
            Some(raw) => Some(Self::parse_port(&raw)?),
            None => None,
        };

        let parse_flag = |key: &str| -> Result<Option<bool>> {
            get(key).map(|v| Self::parse_bool(key, &v)).transpose()
        };

        Ok(Self {
            host: get(HOST_VAR),
            port,
            notify_on_errors: parse_flag(NOTIFY_ON_ERRORS_VAR)?,
            error_overlay: parse_flag(ERROR_OVERLAY_VAR)?,
            auto_open_browser: parse_flag(AUTO_OPEN_BROWSER_VAR)?,
            poll: parse_flag(POLL_VAR)?,
        })
    }

    /// Fold the boolean overrides into `settings`.
    ///
    /// `host` and `port` are left alone here; they are applied when the
    /// overlay is built and when the port preference is resolved.
    pub fn apply_to(&self, settings: &mut DevSettings) {
        if let Some(v) = self.notify_on_errors {
            settings.notify_on_errors = v;
        }
        if let Some(v) = self.error_overlay {
            settings.error_overlay = v;
        }
        if let Some(v) = self.auto_open_browser {
            settings.auto_open_browser = v;
        }
        if let Some(v) = self.poll {
            settings.poll = v;
        }
    }

    /// The host to serve on: override first, then the setting.
    #[must_use]
    pub fn host_or<'a>(&'a self, settings: &'a DevSettings) -> &'a str {
        self.host.as_deref().unwrap_or(&settings.host)
    }

    /// `PORT` may be `0` (any free port); anything else must be a real port.
    fn parse_port(raw: &str) -> Result<u16> {
        if raw.trim() == "0" {
            return Ok(0);
        }
        let port: Port = raw.parse()?;
        Ok(port.value())
    }

    /// Accepts true/1/yes/on and false/0/no/off (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_no_overrides() {
        let env = EnvOverrides::from_lookup(lookup(&[])).unwrap();
        assert_eq!(env, EnvOverrides::default());
    }

    #[test]
    fn test_host_and_port() {
        let env = EnvOverrides::from_lookup(lookup(&[("HOST", "0.0.0.0"), ("PORT", "9000")]))
            .unwrap();
        assert_eq!(env.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(env.port, Some(9000));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = EnvOverrides::from_lookup(lookup(&[("HOST", ""), ("PORT", "  ")])).unwrap();
        assert_eq!(env.host, None);
        assert_eq!(env.port, None);
    }

    #[test]
    fn test_port_zero_allowed() {
        let env = EnvOverrides::from_lookup(lookup(&[("PORT", "0")])).unwrap();
        assert_eq!(env.port, Some(0));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = EnvOverrides::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, Error::InvalidPort { ref value, .. } if value == "eighty"));

        assert!(EnvOverrides::from_lookup(lookup(&[("PORT", "65536")])).is_err());
    }

    #[test]
    fn test_bool_variants() {
        assert!(EnvOverrides::parse_bool("x", "TRUE").unwrap());
        assert!(EnvOverrides::parse_bool("x", "on").unwrap());
        assert!(EnvOverrides::parse_bool("x", "1").unwrap());
        assert!(!EnvOverrides::parse_bool("x", "No").unwrap());
        assert!(!EnvOverrides::parse_bool("x", "off").unwrap());
        assert!(EnvOverrides::parse_bool("x", "maybe").is_err());
    }

    #[test]
    fn test_invalid_bool_names_field() {
        let err =
            EnvOverrides::from_lookup(lookup(&[(NOTIFY_ON_ERRORS_VAR, "sometimes")])).unwrap_err();
        assert!(
            matches!(err, Error::Validation { ref field, .. } if field == NOTIFY_ON_ERRORS_VAR)
        );
    }

    #[test]
    fn test_apply_to_settings() {
        let env = EnvOverrides::from_lookup(lookup(&[
            (NOTIFY_ON_ERRORS_VAR, "false"),
            (POLL_VAR, "yes"),
        ]))
        .unwrap();

        let mut settings = DevSettings::default();
        env.apply_to(&mut settings);
        assert!(!settings.notify_on_errors);
        assert!(settings.poll);
        assert!(settings.error_overlay);
    }

    #[test]
    fn test_host_or() {
        let settings = DevSettings::default();
        assert_eq!(EnvOverrides::default().host_or(&settings), "localhost");

        let env = EnvOverrides {
            host: Some("0.0.0.0".into()),
            ..Default::default()
        };
        assert_eq!(env.host_or(&settings), "0.0.0.0");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        let saved = env::var(PORT_VAR).ok();
        env::set_var(PORT_VAR, "4321");

        let overrides = EnvOverrides::from_env().unwrap();
        assert_eq!(overrides.port, Some(4321));

        match saved {
            Some(v) => env::set_var(PORT_VAR, v),
            None => env::remove_var(PORT_VAR),
        }
    }
}
