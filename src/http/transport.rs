//! One-shot HTTP/1.1 transport.
//!
//! Each round trip dials a fresh connection, performs the hyper handshake,
//! sends one request with `Connection: close`, drains the response body and
//! drops the connection. Nothing is pooled and nothing is spawned: the
//! connection driver runs alongside the exchange on the calling task.

use crate::base::neterror::NetError;
use crate::config::TransportConfig;
use crate::http::requestbody::RequestBody;
use crate::http::response::BufferedResponse;
use crate::socket::connectjob::{ConnectJob, Target};
use crate::socket::dialer::Dial;
use http::header::{HeaderValue, CONNECTION, HOST};
use http::{Request, Uri};
use http_body_util::BodyExt;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// HTTP transport over a dialer, with persistent connections disabled.
#[derive(Clone)]
pub struct Transport {
    dialer: Arc<dyn Dial>,
}

impl Transport {
    pub fn new(dialer: Arc<dyn Dial>) -> Self {
        Self { dialer }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.dialer())
    }

    /// Performs one request on a new connection and buffers the response.
    pub async fn round_trip(&self, req: Request<RequestBody>) -> Result<BufferedResponse, NetError> {
        let (mut parts, body) = req.into_parts();

        let url = Url::parse(&parts.uri.to_string())
            .map_err(|e| NetError::InvalidUrl(format!("{}: {e}", parts.uri)))?;
        let target = Target::from_url(&url)?;

        if !parts.headers.contains_key(HOST) {
            let host = HeaderValue::from_str(&target.authority())
                .map_err(|e| NetError::InvalidHeader(e.to_string()))?;
            parts.headers.insert(HOST, host);
        }
        if !parts.headers.contains_key(CONNECTION) {
            parts
                .headers
                .insert(CONNECTION, HeaderValue::from_static("close"));
        }
        parts.uri = origin_form(&parts.uri)?;

        let method = parts.method.clone();
        let req = Request::from_parts(parts, body.into_full());

        let socket = ConnectJob::connect(self.dialer.as_ref(), &target).await?;
        let (mut sender, conn) = http1::handshake(TokioIo::new(socket)).await?;

        let exchange = async move {
            let resp = sender.send_request(req).await?;
            let (parts, incoming) = resp.into_parts();
            let body = incoming
                .collect()
                .await
                .map_err(|e| NetError::HttpBody(Arc::new(e)))?
                .to_bytes();
            Ok::<_, NetError>(BufferedResponse::new(parts, body))
        };

        let (result, conn_result) = tokio::join!(exchange, conn);
        let resp = result?;
        if let Err(e) = conn_result {
            tracing::debug!(host = %target.host, error = %e, "connection ended with error after response");
        }

        tracing::debug!(
            method = %method,
            host = %target.host,
            status = resp.status().as_u16(),
            bytes = resp.content_length(),
            "request complete"
        );
        Ok(resp)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("dialer", &self.dialer)
            .finish()
    }
}

/// Strips scheme and authority, leaving the request-target HTTP/1.1 sends.
fn origin_form(uri: &Uri) -> Result<Uri, NetError> {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let path = if path.is_empty() { "/" } else { path };
    path.parse()
        .map_err(|e: http::uri::InvalidUri| NetError::InvalidUrl(e.to_string()))
}
