//! Common test utilities for jroh-client integration tests
//!
//! Two ways to stand in for a server:
//! - `RecordingTransport` answers from a script and keeps every request it
//!   was given, for asserting on exact bytes and headers
//! - `mockito` servers for going through the real reqwest transport

#![allow(dead_code)]

use async_trait::async_trait;
use jroh_client::{HttpRequest, HttpResponse, JrohClient, Transport};
use jroh_core::{Error, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// In-memory transport that records requests and replays scripted replies
///
/// When the script runs out every further submission gets a 200 with an
/// empty body.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    replies: Mutex<VecDeque<Result<HttpResponse>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 reply with `body`
    pub fn reply(&self, body: impl Into<String>) {
        self.reply_with_status(200, body);
    }

    /// Queue a reply with an arbitrary status
    pub fn reply_with_status(&self, status: u16, body: impl Into<String>) {
        let body: String = body.into();
        self.replies
            .lock()
            .push_back(Ok(HttpResponse::new(status, body.into_bytes())));
    }

    /// Queue a transport failure
    pub fn fail(&self, message: &str) {
        self.replies
            .lock()
            .push_back(Err(Error::Transport(message.to_string())));
    }

    /// Everything submitted so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Bodies of everything submitted so far, as text
    pub fn bodies(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn submit(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, Vec::new())))
    }
}

/// A client wired to a fresh `RecordingTransport`
pub fn recording_client() -> (JrohClient, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let client = JrohClient::with_transport("http://rpc.test/endpoint", transport.clone());
    (client, transport)
}

/// Helper to create a mock JSON-RPC response
pub fn mock_response(id: i64, result: serde_json::Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id
    })
    .to_string()
}

/// Helper to create a mock JSON-RPC error response
pub fn mock_error_response(id: i64, code: i32, message: &str) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": {
            "code": code,
            "message": message
        },
        "id": id
    })
    .to_string()
}
