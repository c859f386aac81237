//! HTTP transport abstraction
//!
//! The client never talks to the network directly. It hands a fully built
//! `HttpRequest` to a `Transport` and gets back the status and the raw body
//! bytes. The default transport is `ReqwestTransport`; tests and callers
//! with special needs (proxies, custom TLS, recording) plug in their own.
//!
//! # Contract
//!
//! - `submit` sends the request once. No retries, no redirects handling
//!   beyond what the implementation does natively.
//! - Any failure to send, or to read the full body, is `Error::Transport`.
//! - A non-2xx status is *not* a failure at this layer; the status is
//!   returned alongside the body and the client decides what to do.
//!
//! # Examples
//!
//! A transport that answers every call with the same body:
//!
//! ```rust
//! use async_trait::async_trait;
//! use jroh_client::{HttpRequest, HttpResponse, Transport};
//!
//! struct Canned(&'static str);
//!
//! #[async_trait]
//! impl Transport for Canned {
//!     async fn submit(&self, _request: HttpRequest) -> jroh_core::Result<HttpResponse> {
//!         Ok(HttpResponse::new(200, self.0.as_bytes().to_vec()))
//!     }
//! }
//! ```

use async_trait::async_trait;
use jroh_core::{Error, Result};
use std::time::Duration;

/// An outbound HTTP request, fully assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method, always "POST" for JSON-RPC
    pub method: String,
    /// Endpoint URL
    pub url: String,
    /// Header name/value pairs in the order they were set
    pub headers: Vec<(String, String)>,
    /// Encoded JSON body
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a POST request with no headers
    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: "POST".to_string(),
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    /// Set a header, replacing any earlier header with the same name
    ///
    /// Header names are compared case-insensitively.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Look up a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response from a status code and body bytes
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// True for 2xx status codes
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to submit an HTTP request and collect the response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the complete response body
    async fn submit(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `Transport` backed by a `reqwest::Client`
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with reqwest's default settings (no overall timeout)
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing, caller-configured client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Transport whose requests fail with `Error::Transport` after `timeout`
    ///
    /// # Errors
    ///
    /// `Error::Internal` if reqwest cannot build the client (e.g. the TLS
    /// backend fails to initialize).
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn submit(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| Error::Transport(format!("invalid HTTP method: {}", e)))?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
