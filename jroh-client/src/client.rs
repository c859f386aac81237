//! JSON-RPC client over HTTP
//!
//! This module provides `JrohClient`, which turns method calls into HTTP
//! POST requests against a single endpoint and decodes what comes back.
//!
//! # Call Paths
//!
//! - **call**: one request, one response. A response whose `error` member
//!   is set is still a successful call; the caller inspects it.
//! - **notify**: one notification, the response body is never read.
//! - **batch**: many requests and notifications in one POST, responses
//!   returned in the order the server sent them.
//!
//! Every outgoing POST carries, in this order: the custom headers, the
//! `Authorization` header if basic auth is set, then `Content-Type` and
//! `Accept`, both `application/json`. A later header replaces an earlier
//! one with the same name, so custom headers cannot override the JSON
//! content headers.
//!
//! The HTTP status is never interpreted. Servers often answer errors with
//! 4xx/5xx and a perfectly valid JSON-RPC error body, so the body is decoded
//! regardless and a non-2xx status is only logged.
//!
//! # Sharing
//!
//! The client is `Send + Sync`. Put it in an `Arc` to use it from several
//! tasks; id allocation stays unique across them. Configuration setters
//! that change headers or the transport take `&mut self` and are meant for
//! setup; id setters take `&self` and may be called at any time.

use crate::id::IdAllocator;
use crate::metrics::{ClientMetrics, STATUS_FAILED, STATUS_REMOTE_ERROR, STATUS_SUCCESS};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use base64::{engine::general_purpose::STANDARD, Engine};
use jroh_core::{
    codec, BatchEntry, Error, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, Result,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Metric label used for batch submissions
const BATCH_METHOD_LABEL: &str = "batch";

/// JSON-RPC client for one HTTP endpoint
pub struct JrohClient {
    /// URL every request is POSTed to
    pub(crate) endpoint: String,
    /// Submits the HTTP requests
    pub(crate) transport: Arc<dyn Transport>,
    /// Precomputed `Authorization` header value
    pub(crate) basic_auth: Option<String>,
    /// Extra headers sent with every request
    pub(crate) custom_headers: BTreeMap<String, String>,
    /// Source of request ids
    pub(crate) ids: IdAllocator,
    /// Metrics for observability
    pub(crate) metrics: Option<Arc<ClientMetrics>>,
}

impl JrohClient {
    /// Create a client for `endpoint` with the default reqwest transport
    ///
    /// Ids start at 0 and auto-increment. Use `ClientBuilder` for anything
    /// else.
    ///
    /// ```rust
    /// use jroh_client::JrohClient;
    ///
    /// let client = JrohClient::new("http://localhost:8545/rpc");
    /// assert_eq!(client.endpoint(), "http://localhost:8545/rpc");
    /// ```
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_transport(endpoint, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client for `endpoint` that submits through `transport`
    pub fn with_transport(endpoint: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            basic_auth: None,
            custom_headers: BTreeMap::new(),
            ids: IdAllocator::default(),
            metrics: None,
        }
    }

    /// The endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Headers added to every request, by name
    pub fn custom_headers(&self) -> &BTreeMap<String, String> {
        &self.custom_headers
    }

    /// The `Authorization` header value, if basic auth is configured
    pub fn basic_auth(&self) -> Option<&str> {
        self.basic_auth.as_deref()
    }

    /// The client's id allocator
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Replace the transport
    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    /// Submit through a caller-configured `reqwest::Client`
    ///
    /// Timeouts, proxies and TLS settings of that client apply to every
    /// call.
    pub fn set_http_client(&mut self, client: reqwest::Client) {
        self.transport = Arc::new(ReqwestTransport::from_client(client));
    }

    /// Add a header to every request, replacing a previous value for `name`
    pub fn set_custom_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.custom_headers.insert(name.into(), value.into());
    }

    /// Send `Authorization: Basic base64(username:password)` with every request
    ///
    /// An empty username or password clears basic auth instead.
    ///
    /// ```rust
    /// use jroh_client::JrohClient;
    ///
    /// let mut client = JrohClient::new("http://localhost:8080");
    /// client.set_basic_auth("alex", "secret");
    /// assert_eq!(client.basic_auth(), Some("Basic YWxleDpzZWNyZXQ="));
    ///
    /// client.set_basic_auth("", "");
    /// assert_eq!(client.basic_auth(), None);
    /// ```
    pub fn set_basic_auth(&mut self, username: &str, password: &str) {
        self.basic_auth = basic_auth_header(username, password);
    }

    /// Turn id auto-increment on or off for future requests
    pub fn set_auto_increment(&self, enabled: bool) {
        self.ids.set_auto_increment(enabled);
    }

    /// Set the id the next request will receive
    pub fn set_next_id(&self, id: u64) {
        self.ids.set_next_id(id);
    }

    /// Build a request with a freshly allocated id
    ///
    /// An empty `params` list leaves `params` off the wire.
    pub fn new_request(&self, method: impl Into<String>, params: Vec<Value>) -> JsonRpcRequest {
        JsonRpcRequest::new(method, params, self.ids.next_id())
    }

    /// Build a notification; the id allocator is not touched
    pub fn new_notification(
        &self,
        method: impl Into<String>,
        params: Vec<Value>,
    ) -> JsonRpcNotification {
        JsonRpcNotification::new(method, params)
    }

    /// Give an existing request a freshly allocated id
    ///
    /// Used to re-send a request built earlier without reusing its id.
    pub fn update_request_id(&self, request: &mut JsonRpcRequest) {
        request.id = self.ids.next_id();
    }

    /// Call a remote method and return its response
    ///
    /// # Errors
    ///
    /// - `Error::Serialization` if the params cannot be encoded
    /// - `Error::Transport` if the request cannot be submitted
    /// - `Error::Decode` if the body is not a JSON-RPC response
    ///
    /// A JSON-RPC error sent by the server is *not* an `Err`; check
    /// `response.error`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use jroh_client::{params, JrohClient};
    ///
    /// # async fn example() -> jroh_core::Result<()> {
    /// let client = JrohClient::new("http://localhost:8080/rpc");
    /// let response = client.call("sum", params![1, 2]).await?;
    ///
    /// match &response.error {
    ///     Some(error) => println!("remote error {}", error),
    ///     None => println!("sum = {}", response.get_int()?),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<JsonRpcResponse> {
        let request = self.new_request(method, params);
        self.call_request(&request).await
    }

    /// Send an already built request and return its response
    ///
    /// The request goes out exactly as given, id included.
    #[tracing::instrument(name = "call", skip(self, request), fields(method = %request.method, id = request.id))]
    pub async fn call_request(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let start = Instant::now();
        let outcome = self.exchange_single(request).await;
        let duration = start.elapsed().as_secs_f64();

        match &outcome {
            Ok(response) => match &response.error {
                Some(error) => {
                    tracing::debug!(code = error.code, duration_secs = duration, "Server returned an error");
                    if let Some(ref m) = self.metrics {
                        m.record_request(&request.method, STATUS_REMOTE_ERROR, duration);
                        m.record_remote_error(&request.method, error.code);
                    }
                }
                None => {
                    tracing::debug!(duration_secs = duration, "Call completed");
                    if let Some(ref m) = self.metrics {
                        m.record_request(&request.method, STATUS_SUCCESS, duration);
                    }
                }
            },
            Err(e) => self.record_failure(&request.method, e, duration),
        }

        outcome
    }

    async fn exchange_single(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let body = codec::encode(request)?;
        let response = self.submit(body).await?;

        codec::decode_response(&response.body).map_err(|e| {
            tracing::error!(status = response.status, error = %e, "Failed to decode response");
            e
        })
    }

    /// Call a remote method and decode its result into `T`
    ///
    /// Unlike `call`, a JSON-RPC error from the server becomes
    /// `Error::JsonRpc`.
    ///
    /// ```rust,no_run
    /// use jroh_client::{params, JrohClient};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Person { name: String, age: u32 }
    ///
    /// # async fn example(client: &JrohClient) -> jroh_core::Result<()> {
    /// let person: Person = client.call_typed("getPersonById", params![4711]).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call_typed<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let response = self.call(method, params).await?;
        if let Some(error) = &response.error {
            return Err(Error::JsonRpc(error.clone()));
        }
        response.get_object()
    }

    /// Send a notification
    ///
    /// Completes once the transport has the full HTTP response. The body is
    /// discarded without being decoded.
    ///
    /// # Errors
    ///
    /// - `Error::Serialization` if the params cannot be encoded
    /// - `Error::Transport` if the request cannot be submitted
    #[tracing::instrument(skip_all, fields(method = %method))]
    pub async fn notify(&self, method: &str, params: Vec<Value>) -> Result<()> {
        let start = Instant::now();
        let notification = self.new_notification(method, params);

        let outcome = match codec::encode(&notification) {
            Ok(body) => self.submit(body).await.map(|_| ()),
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(()) => {
                tracing::debug!("Notification sent");
                if let Some(ref m) = self.metrics {
                    m.record_notification(method);
                }
            }
            Err(e) => self.record_failure(method, e, start.elapsed().as_secs_f64()),
        }

        outcome
    }

    /// Send several requests and notifications in one HTTP request
    ///
    /// Entries are sent in the given order. Responses come back in the
    /// order the server wrote them, which need not match; wrap them in
    /// `BatchResponse` to look them up by id.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` if the batch is empty or an entry is not a
    ///   request or notification; nothing is sent in that case
    /// - `Error::Transport` if the request cannot be submitted
    /// - `Error::Decode` if the body is not an array of responses
    ///
    /// A batch made only of notifications yields an empty `Vec` when the
    /// server answers with an empty body.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use jroh_client::{params, JrohClient};
    ///
    /// # async fn example(client: &JrohClient) -> jroh_core::Result<()> {
    /// let responses = client
    ///     .batch(vec![
    ///         client.new_request("sum", params![1, 2]).into(),
    ///         client.new_notification("log", params!["summing"]).into(),
    ///     ])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn batch(&self, entries: Vec<JsonRpcMessage>) -> Result<Vec<JsonRpcResponse>> {
        let entries = entries
            .into_iter()
            .map(BatchEntry::try_from)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                tracing::error!(error = %e, "Rejected batch");
                if let Some(ref m) = self.metrics {
                    m.record_error(e.kind());
                }
                e
            })?;

        self.batch_entries(&entries).await
    }

    /// Send already validated batch entries in one HTTP request
    #[tracing::instrument(name = "batch", skip(self, entries), fields(batch_size = entries.len()))]
    pub async fn batch_entries(&self, entries: &[BatchEntry]) -> Result<Vec<JsonRpcResponse>> {
        if entries.is_empty() {
            let e = Error::InvalidArgument("Batch cannot be empty".to_string());
            self.record_failure(BATCH_METHOD_LABEL, &e, 0.0);
            return Err(e);
        }

        let start = Instant::now();
        let outcome = self.exchange_batch(entries).await;
        let duration = start.elapsed().as_secs_f64();

        match &outcome {
            Ok(responses) => {
                tracing::debug!(response_count = responses.len(), duration_secs = duration, "Batch completed");
                if let Some(ref m) = self.metrics {
                    m.record_batch(entries.len() as u64);
                    m.record_request(BATCH_METHOD_LABEL, STATUS_SUCCESS, duration);
                    for error in responses.iter().filter_map(|r| r.error.as_ref()) {
                        m.record_remote_error(BATCH_METHOD_LABEL, error.code);
                    }
                }
            }
            Err(e) => self.record_failure(BATCH_METHOD_LABEL, e, duration),
        }

        outcome
    }

    async fn exchange_batch(&self, entries: &[BatchEntry]) -> Result<Vec<JsonRpcResponse>> {
        let body = codec::encode_batch(entries)?;
        let response = self.submit(body).await?;

        let only_notifications = entries.iter().all(|entry| entry.id().is_none());
        if only_notifications && codec::is_empty_body(&response.body) {
            return Ok(Vec::new());
        }

        codec::decode_batch_responses(&response.body).map_err(|e| {
            tracing::error!(status = response.status, error = %e, "Failed to decode batch response");
            e
        })
    }

    /// Assemble the POST for `body` with the configured headers
    pub(crate) fn http_request(&self, body: Vec<u8>) -> HttpRequest {
        let mut request = HttpRequest::post(self.endpoint.clone(), body);

        for (name, value) in &self.custom_headers {
            request.set_header(name.clone(), value.clone());
        }
        if let Some(auth) = &self.basic_auth {
            request.set_header("Authorization", auth.clone());
        }
        request.set_header("Content-Type", JSON_CONTENT_TYPE);
        request.set_header("Accept", JSON_CONTENT_TYPE);

        request
    }

    async fn submit(&self, body: Vec<u8>) -> Result<HttpResponse> {
        let request = self.http_request(body);
        tracing::debug!(bytes = request.body.len(), "Sending request");

        let response = self.transport.submit(request).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to submit request");
            e
        })?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Non-success HTTP status, decoding body anyway");
        }
        tracing::debug!(status = response.status, bytes = response.body.len(), "Received response");

        Ok(response)
    }

    fn record_failure(&self, method: &str, error: &Error, duration: f64) {
        if let Some(ref m) = self.metrics {
            m.record_request(method, STATUS_FAILED, duration);
            m.record_error(error.kind());
        }
    }
}

impl std::fmt::Debug for JrohClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JrohClient")
            .field("endpoint", &self.endpoint)
            .field("custom_headers", &self.custom_headers.keys().collect::<Vec<_>>())
            .field("basic_auth", &self.basic_auth.as_ref().map(|_| "<redacted>"))
            .field("ids", &self.ids)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// `Basic base64(username:password)`, or `None` if either part is empty
pub(crate) fn basic_auth_header(username: &str, password: &str) -> Option<String> {
    if username.is_empty() || password.is_empty() {
        return None;
    }
    let credentials = STANDARD.encode(format!("{}:{}", username, password));
    Some(format!("Basic {}", credentials))
}
