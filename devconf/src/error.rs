//! Error types for the devconf library.
//!
//! Merging and pipeline construction cannot fail; everything here comes either
//! from port negotiation or from reading and validating configuration input.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::port::negotiator::NegotiationFailure;
pub use crate::port::probe::ProbeError;

/// Result type alias for operations that may fail with a devconf error.
///
/// # Examples
///
/// ```
/// use devconf::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the devconf library.
#[derive(Debug, Error)]
pub enum Error {
    /// Port negotiation failed; publishing stops here.
    #[error(transparent)]
    Negotiation(#[from] NegotiationFailure),

    /// An invalid port value was supplied.
    #[error("invalid port {value}: {reason}")]
    InvalidPort {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A setting or override failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A YAML configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A JSON configuration file could not be parsed or rendered.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file had an extension we do not read.
    #[error("unsupported configuration format: {}", path.display())]
    UnsupportedFormat {
        /// The offending file.
        path: PathBuf,
    },

    /// A top-level configuration document was not a mapping.
    #[error("expected a mapping at the top of {}", path.display())]
    NotAMapping {
        /// The offending file.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::port::InvalidPortError> for Error {
    fn from(err: crate::port::InvalidPortError) -> Self {
        Self::InvalidPort {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl Error {
    /// Check if the error came from port negotiation.
    ///
    /// # Examples
    ///
    /// ```
    /// use devconf::Error;
    ///
    /// let err = Error::Validation { field: "host".into(), message: "empty".into() };
    /// assert!(!err.is_negotiation_failure());
    /// ```
    #[must_use]
    pub fn is_negotiation_failure(&self) -> bool {
        matches!(self, Self::Negotiation(_))
    }
}
