//! HTTP Client with builder pattern.
//!
//! Every request opens its own connection, reads the whole response body
//! into memory and closes the connection before returning. Callers get a
//! [`BufferedResponse`] and never manage a stream.
//!
//! # Example
//!
//! ```rust,no_run
//! use simplenet::Client;
//!
//! let client = Client::builder()
//!     .dns_server("1.1.1.1:53")
//!     .build();
//!
//! let resp = client.get("http://example.com/")?;
//! println!("{} ({} bytes)", resp.status(), resp.content_length());
//! # Ok::<(), simplenet::NetError>(())
//! ```

use crate::base::blocking::block_on;
use crate::base::neterror::NetError;
use crate::config::{default_config, DnsMode, TransportConfig};
use crate::http::{BufferedResponse, RequestBody, Transport};
use crate::socket::dialer::{Dial, DialerConfig};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, Request};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

/// Overall timeout of a request made through a configured client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect timeout of the client used when none is passed.
const GENERIC_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

static GENERIC_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    let config = TransportConfig {
        dns: DnsMode::System,
        dialer: DialerConfig {
            connect_timeout: GENERIC_CONNECT_TIMEOUT,
            ..DialerConfig::default()
        },
    };
    Client {
        transport: Transport::from_config(&config),
        timeout: None,
    }
});

/// HTTP Client for making requests.
///
/// Cheap to clone; clones share the same transport. Safe to use from many
/// threads at once.
#[derive(Clone, Debug)]
pub struct Client {
    transport: Transport,
    timeout: Option<Duration>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Client over the current process-wide default transport (see
    /// [`set_custom_dns`](crate::set_custom_dns)) with a 5 second timeout.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Client whose every connection goes to `domain`, resolved through
    /// `server`, on port 80. An empty `server` resolves `domain` with the
    /// system resolver.
    pub fn with_dns(server: &str, domain: &str) -> Self {
        Self::builder().dns_domain(server, domain).build()
    }

    /// Create a new client builder, starting from the process-wide default
    /// transport.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The overall request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Performs `req` and buffers the response.
    pub fn execute(&self, req: Request<RequestBody>) -> Result<BufferedResponse, NetError> {
        block_on(self.send(req))
    }

    /// GET `url`.
    pub fn get(&self, url: &str) -> Result<BufferedResponse, NetError> {
        self.execute(build_request(Method::GET, url, None, RequestBody::Empty)?)
    }

    /// HEAD `url`. The buffered body is empty.
    pub fn head(&self, url: &str) -> Result<BufferedResponse, NetError> {
        self.execute(build_request(Method::HEAD, url, None, RequestBody::Empty)?)
    }

    /// POST `body` to `url` with the given `Content-Type`.
    pub fn post(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<RequestBody>,
    ) -> Result<BufferedResponse, NetError> {
        self.execute(build_request(Method::POST, url, Some(content_type), body.into())?)
    }

    /// POST `data` to `url` as `application/x-www-form-urlencoded`.
    ///
    /// Pairs are encoded sorted by key; pairs sharing a key keep their
    /// relative order.
    pub fn post_form<I, K, V>(&self, url: &str, data: I) -> Result<BufferedResponse, NetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.post(url, FORM_CONTENT_TYPE, encode_form(data))
    }

    pub(crate) async fn send(&self, req: Request<RequestBody>) -> Result<BufferedResponse, NetError> {
        let round_trip = self.transport.round_trip(req);
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, round_trip)
                .await
                .map_err(|_| NetError::RequestTimedOut)?,
            None => round_trip.await,
        }
    }
}

/// Builder for creating a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: TransportConfig,
    dialer: Option<Arc<dyn Dial>>,
    timeout: Option<Duration>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            config: default_config(),
            dialer: None,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientBuilder {
    /// Resolve every host through `server` (`host:port`). Empty means the
    /// system resolver.
    pub fn dns_server(mut self, server: &str) -> Self {
        self.config.dns = TransportConfig::with_dns_server(server).dns;
        self
    }

    /// Send every connection to `domain`, resolved through `server`.
    pub fn dns_domain(mut self, server: &str, domain: &str) -> Self {
        self.config.dns = DnsMode::Domain {
            server: server.to_string(),
            domain: domain.to_string(),
        };
        self
    }

    /// Replace the whole transport configuration.
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Open connections with `dialer`, bypassing the DNS mode and socket
    /// settings of the transport configuration.
    pub fn dialer(mut self, dialer: impl Dial + 'static) -> Self {
        self.dialer = Some(Arc::new(dialer));
        self
    }

    /// Set the per-connection connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.dialer.connect_timeout = timeout;
        self
    }

    /// Set the TCP keep-alive interval; `None` disables keep-alive probes.
    pub fn keep_alive(mut self, interval: Option<Duration>) -> Self {
        self.config.dialer.keep_alive = interval;
        self
    }

    /// Set the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Let requests run without an overall deadline.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        let transport = match self.dialer {
            Some(dialer) => Transport::new(dialer),
            None => Transport::from_config(&self.config),
        };
        Client {
            transport,
            timeout: self.timeout,
        }
    }
}

fn client_or_generic(client: Option<&Client>) -> &Client {
    client.unwrap_or_else(|| &*GENERIC_CLIENT)
}

/// Performs `req` with `client`, or with the generic client when `None`.
///
/// The generic client resolves with the system resolver, allows 30 seconds
/// to connect and sets no overall deadline.
pub fn execute(
    client: Option<&Client>,
    req: Request<RequestBody>,
) -> Result<BufferedResponse, NetError> {
    client_or_generic(client).execute(req)
}

/// GET `url`. See [`execute`] for the `client` argument.
pub fn get(client: Option<&Client>, url: &str) -> Result<BufferedResponse, NetError> {
    client_or_generic(client).get(url)
}

/// HEAD `url`. See [`execute`] for the `client` argument.
pub fn head(client: Option<&Client>, url: &str) -> Result<BufferedResponse, NetError> {
    client_or_generic(client).head(url)
}

/// POST `body` to `url`. See [`execute`] for the `client` argument.
pub fn post(
    client: Option<&Client>,
    url: &str,
    content_type: &str,
    body: impl Into<RequestBody>,
) -> Result<BufferedResponse, NetError> {
    client_or_generic(client).post(url, content_type, body)
}

/// POST `data` as a form. See [`execute`] for the `client` argument.
pub fn post_form<I, K, V>(
    client: Option<&Client>,
    url: &str,
    data: I,
) -> Result<BufferedResponse, NetError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    client_or_generic(client).post_form(url, data)
}

/// Parses and checks an absolute `http`/`https` URL.
pub(crate) fn parse_url(url: &str) -> Result<Url, NetError> {
    let parsed = Url::parse(url).map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(NetError::UnsupportedScheme(other.to_string())),
    }
    if parsed.host_str().is_none() {
        return Err(NetError::InvalidUrl(format!("{url}: missing host")));
    }
    Ok(parsed)
}

fn build_request(
    method: Method,
    url: &str,
    content_type: Option<&str>,
    body: RequestBody,
) -> Result<Request<RequestBody>, NetError> {
    let url = parse_url(url)?;
    let mut req = Request::new(body);
    *req.method_mut() = method;
    *req.uri_mut() = url
        .as_str()
        .parse()
        .map_err(|e: http::uri::InvalidUri| NetError::InvalidUrl(e.to_string()))?;

    if let Some(content_type) = content_type {
        let value = HeaderValue::from_str(content_type)
            .map_err(|e| NetError::InvalidHeader(format!("content-type: {e}")))?;
        req.headers_mut().insert(CONTENT_TYPE, value);
    }
    Ok(req)
}

/// Encodes form pairs, sorted by key.
pub fn encode_form<I, K, V>(data: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = data.into_iter().collect();
    pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.finish()
}
