//! Fully buffered HTTP response.

use crate::base::neterror::NetError;
use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};

/// HTTP response whose body has already been read into memory.
///
/// The connection it arrived on is closed by the time a caller sees it, so
/// there is nothing to release: drop it whenever.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl BufferedResponse {
    /// Assembles a response from its head and the drained body.
    pub fn new(parts: http::response::Parts, body: Bytes) -> Self {
        Self {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Size of the buffered body. This is the number of bytes actually
    /// received, not the `Content-Length` header the server sent.
    pub fn content_length(&self) -> u64 {
        self.body.len() as u64
    }

    /// The full body. Cheap to call repeatedly; every call returns the same
    /// bytes.
    pub fn bytes(&self) -> Bytes {
        self.body.clone()
    }

    /// Consumes the response, returning the body.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String, NetError> {
        std::str::from_utf8(&self.body)
            .map(str::to_owned)
            .map_err(|_| NetError::InvalidUtf8)
    }

    /// Body deserialized as JSON.
    #[cfg(feature = "json")]
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        serde_json::from_slice(&self.body).map_err(|e| NetError::JsonParseError(e.to_string()))
    }
}

impl From<BufferedResponse> for http::Response<Bytes> {
    fn from(resp: BufferedResponse) -> Self {
        let mut out = http::Response::new(resp.body);
        *out.status_mut() = resp.status;
        *out.version_mut() = resp.version;
        *out.headers_mut() = resp.headers;
        out
    }
}
