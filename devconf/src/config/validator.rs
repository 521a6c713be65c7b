//! Settings validation.

use crate::config::schema::DevSettings;
use crate::error::{Error, Result};

/// Validates development settings before they are turned into an overlay.
///
/// # Examples
///
/// ```
/// use devconf::config::{ConfigValidator, DevSettings};
///
/// ConfigValidator::validate(&DevSettings::default()).unwrap();
///
/// let bad = DevSettings { host: String::new(), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate all settings.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(settings: &DevSettings) -> Result<()> {
        Self::validate_host(&settings.host)?;
        Self::validate_public_path(&settings.assets_public_path)?;
        Self::require_non_empty("devtool", &settings.devtool)?;
        Self::require_non_empty("indexTemplate", &settings.index_template)?;
        Self::require_non_empty("staticDir", &settings.static_dir)?;

        for (prefix, target) in &settings.proxy_table {
            if prefix.trim().is_empty() {
                return Err(Self::error("proxyTable", "proxy path prefix must not be empty"));
            }
            if target.target().trim().is_empty() {
                return Err(Self::error(
                    "proxyTable",
                    &format!("proxy target for '{prefix}' must not be empty"),
                ));
            }
        }

        for key in settings.env.keys() {
            Self::validate_env_name(key)?;
        }

        Ok(())
    }

    fn validate_host(host: &str) -> Result<()> {
        if host.trim().is_empty() {
            return Err(Self::error("host", "host must not be empty"));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(Self::error("host", "host must not contain whitespace"));
        }
        Ok(())
    }

    fn validate_public_path(path: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(Self::error(
                "assetsPublicPath",
                "public path must start with '/'",
            ));
        }
        Ok(())
    }

    /// Env definitions become `process.env.<NAME>`, so names must be identifiers.
    fn validate_env_name(name: &str) -> Result<()> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Self::error(
                "env",
                &format!("'{name}' is not a valid environment variable name"),
            ));
        }
        Ok(())
    }

    fn require_non_empty(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(Self::error(field, &format!("{field} must not be empty")));
        }
        Ok(())
    }

    fn error(field: &str, message: &str) -> Error {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ProxyTarget;

    fn field_of(result: Result<()>) -> String {
        match result {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ConfigValidator::validate(&DevSettings::default()).is_ok());
    }

    #[test]
    fn test_host_whitespace_rejected() {
        let settings = DevSettings {
            host: "local host".into(),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&settings)), "host");
    }

    #[test]
    fn test_public_path_must_be_absolute() {
        let settings = DevSettings {
            assets_public_path: "static/".into(),
            ..Default::default()
        };
        assert_eq!(
            field_of(ConfigValidator::validate(&settings)),
            "assetsPublicPath"
        );
    }

    #[test]
    fn test_empty_devtool_rejected() {
        let settings = DevSettings {
            devtool: " ".into(),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&settings)), "devtool");
    }

    #[test]
    fn test_empty_proxy_target_rejected() {
        let mut settings = DevSettings::default();
        settings
            .proxy_table
            .insert("/api".into(), ProxyTarget::Url(String::new()));
        assert_eq!(field_of(ConfigValidator::validate(&settings)), "proxyTable");
    }

    #[test]
    fn test_env_names() {
        assert!(ConfigValidator::validate_env_name("NODE_ENV").is_ok());
        assert!(ConfigValidator::validate_env_name("_PRIVATE").is_ok());
        assert!(ConfigValidator::validate_env_name("9LIVES").is_err());
        assert!(ConfigValidator::validate_env_name("API-URL").is_err());
        assert!(ConfigValidator::validate_env_name("").is_err());
    }
}
