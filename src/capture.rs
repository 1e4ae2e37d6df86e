//! In-memory response capture.

use crate::handler::ResponseWriter;
use crate::header::HeaderMap;

/// Buffers a complete response as the downstream handler writes it.
///
/// One capture is owned exclusively by a single in-flight request; nothing
/// reaches the real client until the filter flushes it. The status defaults
/// to 200 for handlers that never set one explicitly.
#[derive(Debug, Clone)]
pub struct ResponseCapture {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseCapture {
    /// Create an empty capture with the default 200 status.
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// The captured status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The captured headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The captured body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the capture, yielding `(status, headers, body)`.
    pub fn into_parts(self) -> (u16, HeaderMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

impl Default for ResponseCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter for ResponseCapture {
    fn set_status(&mut self, status: u16) {
        // Recorded, never forwarded early.
        self.status = status;
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status() {
        let capture = ResponseCapture::new();
        assert_eq!(capture.status(), 200);
        assert!(capture.headers().is_empty());
        assert!(capture.body().is_empty());
    }

    #[test]
    fn test_write_accumulates() {
        let mut capture = ResponseCapture::new();
        capture.write(b"Hello, ");
        capture.write(b"world!");
        assert_eq!(capture.body(), b"Hello, world!");
    }

    #[test]
    fn test_status_and_headers() {
        let mut capture = ResponseCapture::new();
        capture.set_status(404);
        capture.headers_mut().add("Content-Type", "text/plain");
        let (status, headers, body) = capture.into_parts();
        assert_eq!(status, 404);
        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert!(body.is_empty());
    }
}
