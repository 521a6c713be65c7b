//! Port types used during negotiation.
//!
//! A [`PortRequest`] carries the preferred starting point of a scan, a
//! [`ResolvedPort`] is what a successful negotiation hands back, and
//! [`PortPreference`] decides which preferred port a publish cycle starts from.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod negotiator;
pub mod probe;

/// A bindable network port number (1-65535).
///
/// Port 0 is rejected here: it asks the OS to pick a port and can never be
/// the result of a negotiation.
///
/// # Examples
///
/// ```
/// use devconf::Port;
///
/// let port = Port::try_from(8080).unwrap();
/// assert_eq!(port.value(), 8080);
///
/// assert!(Port::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// The minimum valid port number.
    pub const MIN: u16 = 1;

    /// The maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Returns the underlying port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the next port number, or `None` at the top of the range.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Returns `true` if this is a privileged port (< 1024).
    ///
    /// Binding a privileged port usually needs elevated permissions, which is
    /// why probes starting there tend to fail with a permission error.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        self.0 < 1024
    }
}

impl TryFrom<u16> for Port {
    type Error = InvalidPortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidPortError {
                value: value.to_string(),
                reason: "port 0 cannot be bound explicitly".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl std::str::FromStr for Port {
    type Err = InvalidPortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s.trim().parse().map_err(|_| InvalidPortError {
            value: s.to_string(),
            reason: format!("expected an integer between {} and {}", Self::MIN, Self::MAX),
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid port numbers.
///
/// The raw value is kept as text since it often comes straight from an
/// environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortError {
    /// The rejected value.
    pub value: String,
    /// The reason the value was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidPortError {}

/// A single negotiation request.
///
/// `preferred` is where the upward scan starts. A value of `0` means "any
/// free port", which the system prober delegates to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRequest {
    /// The port to try first.
    pub preferred: u16,
}

impl PortRequest {
    /// Creates a request starting at `preferred`.
    #[must_use]
    pub const fn new(preferred: u16) -> Self {
        Self { preferred }
    }

    /// Returns `true` when the request leaves the choice to the OS.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        self.preferred == 0
    }
}

/// A port that a negotiation found unbound.
///
/// # Examples
///
/// ```
/// use devconf::{Port, ResolvedPort};
///
/// let resolved = ResolvedPort::new(Port::try_from(8081).unwrap());
/// assert_eq!(resolved.value(), 8081);
/// assert_eq!(resolved.to_string(), "8081");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedPort(Port);

impl ResolvedPort {
    /// Wraps a port reported free by a prober.
    #[must_use]
    pub const fn new(port: Port) -> Self {
        Self(port)
    }

    /// Returns the resolved port.
    #[must_use]
    pub const fn port(self) -> Port {
        self.0
    }

    /// Returns the resolved port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0.value()
    }
}

impl fmt::Display for ResolvedPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where the preferred port of a publish cycle comes from.
///
/// An explicit override (usually the `PORT` environment variable) beats the
/// configured default.
///
/// # Examples
///
/// ```
/// use devconf::PortPreference;
///
/// let pref = PortPreference { override_port: Some(3000), default_port: 8080 };
/// assert_eq!(pref.resolve().preferred, 3000);
///
/// let pref = PortPreference { override_port: None, default_port: 8080 };
/// assert_eq!(pref.resolve().preferred, 8080);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPreference {
    /// Explicit override, if one was given.
    pub override_port: Option<u16>,
    /// Default from configuration.
    pub default_port: u16,
}

impl PortPreference {
    /// Preference that only carries a configured default.
    #[must_use]
    pub const fn from_default(default_port: u16) -> Self {
        Self {
            override_port: None,
            default_port,
        }
    }

    /// Resolves the precedence into the request to negotiate.
    #[must_use]
    pub fn resolve(&self) -> PortRequest {
        PortRequest::new(self.override_port.unwrap_or(self.default_port))
    }
}
