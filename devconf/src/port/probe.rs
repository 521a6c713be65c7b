//! Port probing: finding the first unbound port at or above a starting point.
//!
//! Probing is abstracted behind the [`PortProber`] trait so the negotiator can
//! be driven by a real socket-binding prober or by a deterministic mock in
//! tests.

use std::collections::HashSet;
use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::net::{lookup_host, TcpListener};

use crate::port::{Port, PortRequest};

/// Why a probe could not produce a port.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Every port between the start and the ceiling is bound.
    #[error("no free port between {start} and {highest}")]
    Exhausted {
        /// First port tried.
        start: u16,
        /// Highest port the prober was allowed to try.
        highest: u16,
    },

    /// The preferred port lies above the prober's ceiling.
    #[error("preferred port {preferred} is above the highest allowed port {highest}")]
    OutOfRange {
        /// The preferred port.
        preferred: u16,
        /// The ceiling.
        highest: u16,
    },

    /// The OS refused to let us bind the port.
    #[error("permission denied binding port {port}")]
    PermissionDenied {
        /// The port that could not be bound.
        port: u16,
    },

    /// The scan did not finish in time.
    #[error("probe timed out after {}ms", after.as_millis())]
    Timeout {
        /// How long the probe ran.
        after: Duration,
    },

    /// Any other socket-level failure.
    #[error("probe of port {port} failed: {source}")]
    Io {
        /// The port being probed when the error happened.
        port: u16,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Capability for finding an unbound port.
///
/// Implementations scan upward from `request.preferred` and return the first
/// port not currently bound. A single call is a single attempt; retry policy
/// belongs to the implementation, never to the caller.
#[async_trait]
pub trait PortProber: Send + Sync {
    /// Finds the first free port at or above the requested one.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] when no port is free, the OS refuses access,
    /// the probe times out, or a socket operation fails.
    async fn probe(&self, request: PortRequest) -> Result<Port, ProbeError>;
}

/// Prober that binds real TCP listeners.
///
/// A candidate counts as free only if it can be bound on every address the
/// host resolves to (so `localhost` covers both IPv4 and IPv6 loopback where
/// both exist). Listeners are dropped before the port is returned.
///
/// # Examples
///
/// ```no_run
/// use devconf::port::probe::{PortProber, SystemPortProber};
/// use devconf::PortRequest;
///
/// # async fn run() {
/// let prober = SystemPortProber::new("127.0.0.1");
/// let port = prober.probe(PortRequest::new(8080)).await.unwrap();
/// println!("free port: {port}");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SystemPortProber {
    host: String,
    highest_port: u16,
    timeout: Option<Duration>,
}

impl SystemPortProber {
    /// Creates a prober for `host` scanning up to port 65535 without a timeout.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            highest_port: Port::MAX,
            timeout: None,
        }
    }

    /// Caps the scan at `highest_port`.
    #[must_use]
    pub fn with_highest_port(mut self, highest_port: u16) -> Self {
        self.highest_port = highest_port;
        self
    }

    /// Bounds the whole scan by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The host probed.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    async fn scan(&self, request: PortRequest) -> Result<Port, ProbeError> {
        if request.is_any() {
            return self.bind_ephemeral().await;
        }

        if request.preferred > self.highest_port {
            return Err(ProbeError::OutOfRange {
                preferred: request.preferred,
                highest: self.highest_port,
            });
        }

        let mut candidate = Port::try_from(request.preferred).ok();
        while let Some(port) = candidate {
            if port.value() > self.highest_port {
                break;
            }
            if self.is_free(port).await? {
                return Ok(port);
            }
            log::debug!("port {port} on {} is in use", self.host);
            candidate = port.next();
        }

        Err(ProbeError::Exhausted {
            start: request.preferred,
            highest: self.highest_port,
        })
    }

    async fn is_free(&self, port: Port) -> Result<bool, ProbeError> {
        let addrs = lookup_host((self.host.as_str(), port.value()))
            .await
            .map_err(|source| ProbeError::Io {
                port: port.value(),
                source,
            })?;

        let mut bound_any = false;
        for addr in addrs {
            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    bound_any = true;
                    drop(listener);
                }
                Err(e) if e.kind() == io::ErrorKind::AddrInUse => return Ok(false),
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    return Err(ProbeError::PermissionDenied { port: port.value() });
                }
                // Address family not configured on this machine (e.g. no IPv6).
                Err(e) if e.kind() == io::ErrorKind::AddrNotAvailable => {}
                Err(source) => {
                    return Err(ProbeError::Io {
                        port: port.value(),
                        source,
                    })
                }
            }
        }

        if bound_any {
            Ok(true)
        } else {
            Err(ProbeError::Io {
                port: port.value(),
                source: io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("host '{}' has no bindable address", self.host),
                ),
            })
        }
    }

    async fn bind_ephemeral(&self) -> Result<Port, ProbeError> {
        let io_err = |source| ProbeError::Io { port: 0, source };

        let addr = lookup_host((self.host.as_str(), 0))
            .await
            .map_err(io_err)?
            .next()
            .ok_or_else(|| {
                io_err(io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("host '{}' resolved to no addresses", self.host),
                ))
            })?;

        let listener = TcpListener::bind(addr).await.map_err(io_err)?;
        let assigned = listener.local_addr().map_err(io_err)?.port();
        drop(listener);

        Port::try_from(assigned).map_err(|e| {
            io_err(io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
        })
    }
}

#[async_trait]
impl PortProber for SystemPortProber {
    async fn probe(&self, request: PortRequest) -> Result<Port, ProbeError> {
        bounded(self.timeout, self.scan(request)).await
    }
}

/// Runs `scan` to completion, or fails with [`ProbeError::Timeout`] once
/// `limit` has elapsed.
pub(crate) async fn bounded<F>(limit: Option<Duration>, scan: F) -> Result<Port, ProbeError>
where
    F: Future<Output = Result<Port, ProbeError>>,
{
    match limit {
        Some(after) => tokio::time::timeout(after, scan)
            .await
            .map_err(|_| ProbeError::Timeout { after })?,
        None => scan.await,
    }
}

/// Deterministic prober for tests.
///
/// Ports in the occupied set are skipped, ports in the denied set fail with
/// [`ProbeError::PermissionDenied`], and the scan stops at the configured
/// ceiling. Every call is counted so tests can assert the number of attempts.
///
/// # Examples
///
/// ```
/// use devconf::port::probe::{MockPortProber, PortProber};
/// use devconf::PortRequest;
///
/// # tokio_test_block_on(async {
/// let prober = MockPortProber::with_occupied([8080]);
/// let port = prober.probe(PortRequest::new(8080)).await.unwrap();
/// assert_eq!(port.value(), 8081);
/// assert_eq!(prober.calls(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockPortProber {
    occupied: HashSet<u16>,
    denied: HashSet<u16>,
    highest_port: Option<u16>,
    calls: AtomicUsize,
}

impl MockPortProber {
    /// A prober on which every port is free.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A prober treating `ports` as bound.
    #[must_use]
    pub fn with_occupied(ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            occupied: ports.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Caps the scan at `highest_port`.
    #[must_use]
    pub fn with_highest_port(mut self, highest_port: u16) -> Self {
        self.highest_port = Some(highest_port);
        self
    }

    /// Marks `port` as one the OS refuses to bind.
    #[must_use]
    pub fn deny(mut self, port: u16) -> Self {
        self.denied.insert(port);
        self
    }

    /// Marks `port` as bound.
    pub fn mark_occupied(&mut self, port: u16) {
        self.occupied.insert(port);
    }

    /// Marks `port` as free again.
    pub fn mark_free(&mut self, port: u16) {
        self.occupied.remove(&port);
    }

    /// Number of probe calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortProber for MockPortProber {
    async fn probe(&self, request: PortRequest) -> Result<Port, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let highest = self.highest_port.unwrap_or(Port::MAX);
        // 0 means "any"; the mock hands out the lowest free port.
        let start = request.preferred.max(Port::MIN);
        if start > highest {
            return Err(ProbeError::OutOfRange {
                preferred: request.preferred,
                highest,
            });
        }

        for value in start..=highest {
            if self.denied.contains(&value) {
                return Err(ProbeError::PermissionDenied { port: value });
            }
            if !self.occupied.contains(&value) {
                return Port::try_from(value).map_err(|e| ProbeError::Io {
                    port: value,
                    source: io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
                });
            }
        }

        Err(ProbeError::Exhausted {
            start: request.preferred,
            highest,
        })
    }
}
