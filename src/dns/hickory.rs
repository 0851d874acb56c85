//! Resolution through one explicit name server using hickory-dns.
//!
//! Every name handed to [`ServerResolver`] is resolved by the configured
//! server only. The system configuration (`/etc/resolv.conf`, hosts file)
//! is never consulted, and nothing is cached: each call builds a fresh
//! resolver on the current runtime and queries the server again.

use super::{server::server_addr, Addrs, Name, Resolve, Resolving, DNS_TIMEOUT};
use crate::base::neterror::NetError;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Async DNS resolver bound to a single DNS server address.
///
/// # Example
///
/// ```rust,ignore
/// use simplenet::dns::{Name, Resolve, ServerResolver};
///
/// let resolver = ServerResolver::new("1.1.1.1:53");
/// let addrs = resolver.resolve(Name::new("example.com")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ServerResolver {
    server: Arc<str>,
    timeout: Duration,
}

impl ServerResolver {
    /// Creates a resolver that sends every query to `server` (`host:port`).
    pub fn new(server: impl Into<Arc<str>>) -> Self {
        Self {
            server: server.into(),
            timeout: DNS_TIMEOUT,
        }
    }

    /// Overrides the per-query timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured DNS server address.
    pub fn server(&self) -> &str {
        &self.server
    }

    fn build(&self, addr: SocketAddr) -> TokioAsyncResolver {
        let group = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
        let config = ResolverConfig::from_parts(None, vec![], group);

        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.use_hosts_file = false;

        TokioAsyncResolver::tokio(config, opts)
    }
}

impl Resolve for ServerResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let this = self.clone();
        Box::pin(async move {
            let domain = name.as_str();
            let addr = server_addr(&this.server).await?;
            tracing::debug!(domain = %domain, server = %addr, "resolving via custom DNS server");

            let lookup = match this.build(addr).lookup_ip(domain).await {
                Ok(lookup) => lookup,
                Err(e) => {
                    return match e.kind() {
                        ResolveErrorKind::NoRecordsFound { .. } => {
                            tracing::debug!(domain = %domain, "custom DNS server returned no records");
                            Ok(Box::new(std::iter::empty()) as Addrs)
                        }
                        ResolveErrorKind::Timeout => Err(NetError::DnsTimedOut),
                        _ => {
                            tracing::debug!(domain = %domain, error = %e, "custom DNS lookup failed");
                            Err(NetError::NameNotResolvedFor {
                                domain: domain.to_string(),
                                source: Arc::new(std::io::Error::other(e.to_string())),
                            })
                        }
                    };
                }
            };

            let addrs: Vec<SocketAddr> = lookup.iter().map(|ip| SocketAddr::new(ip, 0)).collect();
            tracing::debug!(domain = %domain, count = addrs.len(), "custom DNS resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}
