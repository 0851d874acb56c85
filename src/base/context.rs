//! Attaching context to `io::Error`s.
//!
//! Socket calls fail with bare `io::Error`s that do not say what was being
//! contacted. These helpers wrap them into the `NetError` variant for the
//! operation at hand, carrying the host, domain or DNS server involved.

use crate::base::neterror::NetError;
use std::io;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Wrap a failed TCP connect to `host:port`.
    ///
    /// ```ignore
    /// let stream = TcpStream::connect(addr)
    ///     .await
    ///     .connection_context("example.com", 80)?;
    /// // "Connection to example.com:80 failed: connection refused"
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Wrap a failed system lookup of `domain`.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;

    /// Wrap a socket error raised while querying the DNS `server`.
    fn dns_server_context(self, server: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(host, port, e))
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }

    fn dns_server_context(self, server: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_query_failed(server, e))
    }
}
