//! Command to find a free port.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use devconf::config::schema::{DEFAULT_HOST, DEFAULT_PORT};
use devconf::{Port, PortNegotiator, PortRequest, SystemPortProber};
use std::time::Duration;

/// Find the first free port at or above a preferred one.
///
/// Prints the port number on stdout.
#[derive(Args)]
pub struct ProbeCommand {
    /// Preferred port; 0 lets the OS pick
    #[arg(value_name = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to probe
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Highest port to try
    #[arg(long, value_name = "PORT", default_value_t = Port::MAX)]
    pub max_port: u16,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl ProbeCommand {
    pub async fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut prober = SystemPortProber::new(self.host).with_highest_port(self.max_port);
        if let Some(seconds) = self.timeout {
            prober = prober.with_timeout(Duration::from_secs(seconds));
        }

        let resolved = PortNegotiator::new(prober)
            .negotiate(PortRequest::new(self.port))
            .await
            .map_err(devconf::Error::from)?;

        if global.verbose && resolved.value() != self.port {
            eprintln!("Port {} is in use; using {resolved}", self.port);
        }
        println!("{resolved}");
        Ok(())
    }
}
