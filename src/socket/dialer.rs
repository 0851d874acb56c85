//! TCP dialers.
//!
//! A dialer turns the `(host, port)` the transport wants into a connected
//! `TcpStream`. Three strategies exist:
//!
//! - [`Dialer::system`]: resolve with the operating system
//! - [`Dialer::with_dns_server`]: resolve every host through one DNS server
//! - [`DomainDialer`]: ignore the requested host and port, re-resolve one
//!   fixed domain on every dial and connect to it on port 80

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::dns::{self, parse_ip_literal, GaiResolver, Name, Resolve, ServerResolver};
use crate::socket::select::{AddressSelector, FirstAddress};
use socket2::{SockRef, TcpKeepalive};
use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

/// Default timeout for establishing one TCP connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default TCP keep-alive probe interval.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Port a [`DomainDialer`] connects to unless told otherwise.
pub const DOMAIN_DIAL_PORT: u16 = 80;

/// Alias for the `Future` type returned by a dialer.
pub type Dialing = Pin<Box<dyn Future<Output = Result<TcpStream, NetError>> + Send>>;

/// Trait for opening TCP connections on behalf of the transport.
pub trait Dial: Send + Sync + fmt::Debug {
    /// Connects to `host:port`, resolving `host` as the strategy dictates.
    fn dial(&self, host: &str, port: u16) -> Dialing;
}

impl<D: Dial + ?Sized> Dial for Arc<D> {
    fn dial(&self, host: &str, port: u16) -> Dialing {
        (**self).dial(host, port)
    }
}

/// Socket-level settings shared by all dialers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialerConfig {
    /// Timeout for a single connection attempt.
    pub connect_timeout: Duration,
    /// TCP keep-alive probe interval; `None` disables keep-alive probes.
    pub keep_alive: Option<Duration>,
}

impl Default for DialerConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            keep_alive: Some(DEFAULT_KEEP_ALIVE),
        }
    }
}

/// Connects to one address with the configured timeout and socket options.
pub(crate) async fn connect_addr(
    addr: SocketAddr,
    host: &str,
    config: &DialerConfig,
) -> Result<TcpStream, NetError> {
    tracing::debug!(host = %host, addr = %addr, "connecting");

    let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| NetError::ConnectionTimedOut {
            host: host.to_string(),
            port: addr.port(),
        })?
        .connection_context(host, addr.port())?;

    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(addr = %addr, error = %e, "failed to set TCP_NODELAY");
    }
    if let Some(interval) = config.keep_alive {
        set_keep_alive(&stream, interval);
    }

    Ok(stream)
}

fn set_keep_alive(stream: &TcpStream, interval: Duration) {
    let keepalive = TcpKeepalive::new().with_time(interval);
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "windows"
    ))]
    let keepalive = keepalive.with_interval(interval);

    if let Err(e) = SockRef::from(stream).set_tcp_keepalive(&keepalive) {
        tracing::debug!(error = %e, "failed to enable TCP keep-alive");
    }
}

/// General purpose dialer: resolve the requested host, then try each
/// address in order until one connects.
#[derive(Clone)]
pub struct Dialer {
    resolver: Arc<dyn Resolve>,
    config: DialerConfig,
}

impl Dialer {
    /// Creates a dialer over any resolver.
    pub fn new(resolver: Arc<dyn Resolve>, config: DialerConfig) -> Self {
        Self { resolver, config }
    }

    /// Dialer using the operating system resolver.
    pub fn system(config: DialerConfig) -> Self {
        Self::new(Arc::new(GaiResolver::new()), config)
    }

    /// Dialer whose name resolution is redirected to `server` (`host:port`)
    /// for every connection it opens.
    pub fn with_dns_server(server: &str, config: DialerConfig) -> Self {
        Self::new(Arc::new(ServerResolver::new(server)), config)
    }
}

impl fmt::Debug for Dialer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dial for Dialer {
    fn dial(&self, host: &str, port: u16) -> Dialing {
        let resolver = self.resolver.clone();
        let config = self.config;
        let host = host.to_string();

        Box::pin(async move {
            let addrs: Vec<SocketAddr> = match parse_ip_literal(&host) {
                Some(ip) => vec![SocketAddr::new(ip, port)],
                None => resolver
                    .resolve(Name::new(host.as_str()))
                    .await?
                    .map(|addr| SocketAddr::new(addr.ip(), port))
                    .collect(),
            };

            let mut last_err = None;
            for addr in addrs {
                match connect_addr(addr, &host, &config).await {
                    Ok(stream) => return Ok(stream),
                    Err(e) => {
                        tracing::warn!(host = %host, addr = %addr, error = %e, "connect attempt failed");
                        last_err = Some(e);
                    }
                }
            }

            Err(last_err.unwrap_or(NetError::NoAddressesResolved { domain: host }))
        })
    }
}

/// Dialer bound to one domain.
///
/// Whatever host and port the transport asks for, every dial re-resolves
/// `domain` through `server` (empty for the system resolver), lets the
/// selector pick one address and connects to it on port 80.
#[derive(Debug, Clone)]
pub struct DomainDialer {
    server: Arc<str>,
    domain: Arc<str>,
    port: u16,
    selector: Arc<dyn AddressSelector>,
    config: DialerConfig,
}

impl DomainDialer {
    /// Creates a dialer pinned to `domain`, resolved through `server`.
    pub fn new(server: &str, domain: &str, config: DialerConfig) -> Self {
        Self {
            server: server.into(),
            domain: domain.into(),
            port: DOMAIN_DIAL_PORT,
            selector: Arc::new(FirstAddress),
            config,
        }
    }

    /// Overrides the port dialed on the resolved address.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replaces the address selection policy.
    pub fn with_selector(mut self, selector: impl AddressSelector + 'static) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    /// The domain every dial connects to.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The port every dial connects to.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Dial for DomainDialer {
    fn dial(&self, host: &str, port: u16) -> Dialing {
        let this = self.clone();
        let requested = format!("{host}:{port}");

        Box::pin(async move {
            let domain = this.domain.as_ref();
            tracing::debug!(requested = %requested, domain = %domain, "dialing pinned domain");

            let addrs = dns::lookup(&this.server, domain).await?;
            let ip = this
                .selector
                .select(&addrs)
                .ok_or_else(|| NetError::NoAddressesResolved {
                    domain: domain.to_string(),
                })?;

            connect_addr(SocketAddr::new(ip, this.port), domain, &this.config).await
        })
    }
}
