use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use crate::socket::dialer::Dial;
#[cfg(feature = "tls")]
use boring::ssl::{SslConnector, SslMethod};
use url::Url;

/// Where a request needs a connection to: scheme, host and port taken from
/// its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub secure: bool,
    pub host: String,
    pub port: u16,
}

impl Target {
    /// Extracts the connection target from an absolute `http`/`https` URL.
    pub fn from_url(url: &Url) -> Result<Self, NetError> {
        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            other => return Err(NetError::UnsupportedScheme(other.to_string())),
        };
        let host = url
            .host_str()
            .ok_or_else(|| NetError::InvalidUrl(format!("{url}: missing host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| NetError::InvalidUrl(format!("{url}: missing port")))?;

        Ok(Self {
            secure,
            host: host.to_string(),
            port,
        })
    }

    /// `host[:port]` as sent in the `Host` header; the port is omitted when it
    /// is the scheme default.
    pub fn authority(&self) -> String {
        let default_port = if self.secure { 443 } else { 80 };
        if self.port == default_port {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Manages the connection process: dial -> TLS.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(dialer: &dyn Dial, target: &Target) -> Result<SocketType, NetError> {
        #[cfg(not(feature = "tls"))]
        if target.secure {
            return Err(NetError::UnsupportedScheme(
                "https (built without the `tls` feature)".into(),
            ));
        }

        let stream = dialer.dial(&target.host, target.port).await?;

        #[cfg(feature = "tls")]
        if target.secure {
            return Self::handshake(stream, &target.host).await;
        }

        Ok(SocketType::Tcp(stream))
    }

    #[cfg(feature = "tls")]
    async fn handshake(stream: tokio::net::TcpStream, host: &str) -> Result<SocketType, NetError> {
        let mut builder = SslConnector::builder(SslMethod::tls())
            .map_err(|e| NetError::SslProtocolError(e.to_string()))?;

        // Exchanges are HTTP/1.1 only.
        builder
            .set_alpn_protos(b"\x08http/1.1")
            .map_err(|e| NetError::SslProtocolError(e.to_string()))?;

        let config = builder
            .build()
            .configure()
            .map_err(|e| NetError::SslProtocolError(e.to_string()))?;

        let tls_stream = tokio_boring::connect(config, host, stream).await.map_err(|e| {
            tracing::debug!(host = %host, error = ?e, "TLS handshake failed");
            NetError::SslProtocolError(format!("{e:?}"))
        })?;

        Ok(SocketType::Ssl(tls_stream))
    }
}
