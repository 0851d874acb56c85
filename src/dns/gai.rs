//! System DNS resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native DNS resolution via
//! `getaddrinfo` (through `tokio::net::lookup_host`), bounded by a lookup
//! timeout.
//!
//! # When to Use
//!
//! - When no custom DNS server is configured
//! - When you need to respect system DNS configuration (/etc/resolv.conf,
//!   /etc/hosts, etc.)

use super::{Addrs, Name, Resolve, Resolving, DNS_TIMEOUT};
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::net::SocketAddr;
use std::time::Duration;

/// System DNS resolver using `getaddrinfo` in tokio's blocking pool.
#[derive(Clone, Debug)]
pub struct GaiResolver {
    timeout: Duration,
}

impl GaiResolver {
    /// Creates a new `GaiResolver` with the default 5 second lookup timeout.
    pub fn new() -> Self {
        Self::with_timeout(DNS_TIMEOUT)
    }

    /// Creates a `GaiResolver` with a custom lookup timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for GaiResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let timeout = self.timeout;
        Box::pin(async move {
            let domain = name.as_str();
            tracing::debug!(domain = %domain, "resolving via getaddrinfo");

            let found = tokio::time::timeout(timeout, tokio::net::lookup_host((domain, 0u16)))
                .await
                .map_err(|_| {
                    tracing::debug!(domain = %domain, "getaddrinfo timed out");
                    NetError::DnsTimedOut
                })?
                .dns_context(domain)?;

            let mut addrs: Vec<SocketAddr> = Vec::new();
            for addr in found {
                if !addrs.iter().any(|a| a.ip() == addr.ip()) {
                    addrs.push(addr);
                }
            }

            tracing::debug!(domain = %domain, count = addrs.len(), "DNS resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}
