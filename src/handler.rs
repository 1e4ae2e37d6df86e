//! Generic request/response handler abstraction.
//!
//! The filter is defined purely in terms of these traits: it wraps any
//! [`Handler`] and implements [`Handler`] itself, so filters can be chained
//! ahead of or behind other handlers independent of any specific host.

use crate::header::HeaderMap;
use async_trait::async_trait;

/// Error type for downstream handler failures.
///
/// The filter never inspects these; they propagate to the host unmodified.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// An inbound HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Create a request with no headers and an empty body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Append a request header.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }
}

/// Sink for one HTTP response: status, headers, body bytes.
///
/// Implementations are expected to buffer; the standard response-writer
/// discipline still applies (status and headers are set before body bytes
/// are written).
pub trait ResponseWriter {
    /// Set the response status code.
    fn set_status(&mut self, status: u16);

    /// Mutable access to the response headers.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Append body bytes.
    fn write(&mut self, chunk: &[u8]);
}

/// Receive a request, produce a response.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle one request/response exchange, writing the response into `rw`.
    async fn handle(
        &self,
        req: &mut Request,
        rw: &mut (dyn ResponseWriter + Send),
    ) -> Result<(), HandlerError>;
}
