//! Transport configuration and the process-wide default.
//!
//! A [`TransportConfig`] says how a transport resolves and dials. Clients
//! built with [`Client::new`](crate::Client::new) copy the process-wide
//! default at construction; [`set_custom_dns`] replaces that default.

use crate::socket::dialer::{Dial, Dialer, DialerConfig, DomainDialer};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// How outbound connections resolve host names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DnsMode {
    /// Operating system resolver.
    #[default]
    System,
    /// Every host resolved through this DNS server (`host:port`).
    Server(String),
    /// Every connection goes to `domain`, resolved through `server`, on
    /// port 80, whatever the request URL says.
    Domain { server: String, domain: String },
}

/// Complete description of a transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportConfig {
    pub dns: DnsMode,
    pub dialer: DialerConfig,
}

impl TransportConfig {
    /// System resolution with default socket settings.
    pub fn system() -> Self {
        Self::default()
    }

    /// Resolution through `server`, or system resolution when `server` is
    /// empty.
    pub fn with_dns_server(server: &str) -> Self {
        let dns = if server.is_empty() {
            DnsMode::System
        } else {
            DnsMode::Server(server.to_string())
        };
        Self {
            dns,
            dialer: DialerConfig::default(),
        }
    }

    /// Single-domain dialing.
    pub fn with_domain(server: &str, domain: &str) -> Self {
        Self {
            dns: DnsMode::Domain {
                server: server.to_string(),
                domain: domain.to_string(),
            },
            dialer: DialerConfig::default(),
        }
    }

    /// Builds the dialer this configuration describes.
    pub fn dialer(&self) -> Arc<dyn Dial> {
        match &self.dns {
            DnsMode::System => Arc::new(Dialer::system(self.dialer)),
            DnsMode::Server(server) => Arc::new(Dialer::with_dns_server(server, self.dialer)),
            DnsMode::Domain { server, domain } => {
                Arc::new(DomainDialer::new(server, domain, self.dialer))
            }
        }
    }
}

static DEFAULT_CONFIG: LazyLock<RwLock<TransportConfig>> =
    LazyLock::new(|| RwLock::new(TransportConfig::default()));

/// Snapshot of the process-wide default transport configuration.
pub fn default_config() -> TransportConfig {
    DEFAULT_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the process-wide default transport configuration.
pub fn set_default_config(config: TransportConfig) {
    tracing::debug!(dns = ?config.dns, "replacing default transport");
    *DEFAULT_CONFIG
        .write()
        .unwrap_or_else(PoisonError::into_inner) = config;
}

/// Sends all host resolution of subsequently built default clients through
/// `addr` (`host:port`). An empty `addr` restores system resolution.
///
/// Last writer wins. Clients that already exist keep the transport they
/// were built with.
pub fn set_custom_dns(addr: &str) {
    set_default_config(TransportConfig::with_dns_server(addr));
}
