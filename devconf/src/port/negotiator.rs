//! Single-attempt port negotiation.

use thiserror::Error;

use super::probe::{PortProber, ProbeError};
use crate::port::{PortRequest, ResolvedPort};

/// A negotiation that did not produce a port.
///
/// The probe error is attached unchanged as the source.
#[derive(Debug, Error)]
#[error("could not negotiate a port starting at {preferred}: {cause}")]
pub struct NegotiationFailure {
    /// The port the scan started from.
    pub preferred: u16,
    /// What the prober reported.
    #[source]
    pub cause: ProbeError,
}

/// Negotiates one port per call through a [`PortProber`].
///
/// The negotiator never retries and never masks errors: one request means
/// exactly one probe call.
///
/// # Examples
///
/// ```
/// use devconf::port::negotiator::PortNegotiator;
/// use devconf::port::probe::MockPortProber;
/// use devconf::PortRequest;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let negotiator = PortNegotiator::new(MockPortProber::with_occupied([8080]));
/// let resolved = negotiator.negotiate(PortRequest::new(8080)).await.unwrap();
/// assert_eq!(resolved.value(), 8081);
/// # });
/// ```
#[derive(Debug)]
pub struct PortNegotiator<P: PortProber> {
    prober: P,
}

impl<P: PortProber> PortNegotiator<P> {
    /// Creates a negotiator backed by `prober`.
    #[must_use]
    pub fn new(prober: P) -> Self {
        Self { prober }
    }

    /// The underlying prober.
    #[must_use]
    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Asks the prober for a free port at or above `request.preferred`.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationFailure`] with the probe error attached when the
    /// prober fails for any reason.
    pub async fn negotiate(
        &self,
        request: PortRequest,
    ) -> std::result::Result<ResolvedPort, NegotiationFailure> {
        log::debug!("negotiating port from {}", request.preferred);

        match self.prober.probe(request).await {
            Ok(port) => {
                if port.value() != request.preferred {
                    log::info!(
                        "port {} is unavailable, using {port} instead",
                        request.preferred
                    );
                }
                Ok(ResolvedPort::new(port))
            }
            Err(cause) => {
                log::debug!("negotiation from {} failed: {cause}", request.preferred);
                Err(NegotiationFailure {
                    preferred: request.preferred,
                    cause,
                })
            }
        }
    }
}
