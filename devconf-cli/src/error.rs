//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use devconf::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: No port could be negotiated
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err {
                LibError::Negotiation(_) => 1,
                LibError::InvalidPort { .. } => 4,
                LibError::Io(_) => 5,
                LibError::Validation { .. }
                | LibError::Configuration(_)
                | LibError::UnsupportedFormat { .. }
                | LibError::NotAMapping { .. } => 7,
                LibError::Json(_) => 6,
            },
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devconf::{NegotiationFailure, ProbeError};

    #[test]
    fn test_exit_codes() {
        let negotiation = CliError::from(LibError::Negotiation(NegotiationFailure {
            preferred: 8080,
            cause: ProbeError::Exhausted {
                start: 8080,
                highest: 8080,
            },
        }));
        assert_eq!(negotiation.exit_code(), 1);

        let invalid_port = CliError::from(LibError::InvalidPort {
            value: "x".into(),
            reason: "not a number".into(),
        });
        assert_eq!(invalid_port.exit_code(), 4);

        let validation = CliError::from(LibError::Validation {
            field: "host".into(),
            message: "empty".into(),
        });
        assert_eq!(validation.exit_code(), 7);

        assert_eq!(CliError::InvalidArguments("x".into()).exit_code(), 4);
        assert_eq!(
            CliError::Io(std::io::Error::other("disk full")).exit_code(),
            5
        );
    }

    #[test]
    fn test_display_passes_library_message_through() {
        let err = CliError::from(LibError::Validation {
            field: "host".into(),
            message: "host must not be empty".into(),
        });
        assert!(err.to_string().contains("host must not be empty"));
    }
}
