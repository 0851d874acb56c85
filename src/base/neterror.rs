use std::io;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum NetError {
    // DNS Errors
    #[error("Name not resolved: {domain}: {source}")]
    NameNotResolvedFor {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("No addresses resolved for {domain}")]
    NoAddressesResolved { domain: String },
    #[error("DNS query to {server} failed: {source}")]
    DnsQueryFailed {
        server: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("DNS query timed out")]
    DnsTimedOut,
    #[error("DNS protocol error: {0}")]
    DnsProtocol(String),
    #[error("Invalid DNS server address: {0}")]
    InvalidDnsServer(String),

    // Connection Errors
    #[error("Connection to {host}:{port} failed: {source}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Connection to {host}:{port} timed out")]
    ConnectionTimedOut { host: String, port: u16 },
    #[error("SSL protocol error: {0}")]
    SslProtocolError(String),

    // HTTP Errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    #[error("HTTP error: {0}")]
    Http(#[source] Arc<hyper::Error>),
    #[error("Request timed out")]
    RequestTimedOut,
    #[error("Failed to read response body: {0}")]
    HttpBody(#[source] Arc<hyper::Error>),
    #[error("Response body is not valid UTF-8")]
    InvalidUtf8,
    #[cfg(feature = "json")]
    #[error("Failed to parse JSON body: {0}")]
    JsonParseError(String),

    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] Arc<io::Error>),
}

impl NetError {
    pub(crate) fn dns_failed(domain: &str, source: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.to_string(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn connection_failed_to(host: &str, port: u16, source: io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.to_string(),
            port,
            source: Arc::new(source),
        }
    }

    pub(crate) fn dns_query_failed(server: &str, source: io::Error) -> Self {
        NetError::DnsQueryFailed {
            server: server.to_string(),
            source: Arc::new(source),
        }
    }

    /// Returns true for every variant produced by an expired deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            NetError::DnsTimedOut | NetError::ConnectionTimedOut { .. } | NetError::RequestTimedOut
        )
    }

    /// Returns true for resolution failures, including empty answers.
    pub fn is_dns(&self) -> bool {
        matches!(
            self,
            NetError::NameNotResolvedFor { .. }
                | NetError::NoAddressesResolved { .. }
                | NetError::DnsQueryFailed { .. }
                | NetError::DnsTimedOut
                | NetError::DnsProtocol(_)
                | NetError::InvalidDnsServer(_)
        )
    }
}

impl From<hyper::Error> for NetError {
    fn from(e: hyper::Error) -> Self {
        NetError::Http(Arc::new(e))
    }
}
