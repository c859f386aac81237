//! JSON-RPC 2.0 message types as they travel over HTTP
//!
//! This module implements the wire-level shapes a client needs
//! (https://www.jsonrpc.org/specification):
//!
//! 1. **Request**: A call to a remote method that expects a response
//! 2. **Notification**: A call to a remote method with no response expected
//! 3. **Response**: The reply to a request (result or error)
//!
//! # Positional Parameters
//!
//! Parameters are always an ordered array of opaque JSON values. When the
//! caller supplies no parameters the `params` key is left out of the JSON
//! object entirely rather than being sent as `[]`.
//!
//! # Identifiers
//!
//! Requests carry an unsigned integer id handed out by the client's
//! allocator. Responses carry whatever integer the server echoed back, or
//! nothing when the server could not determine the id (e.g. parse errors).

use crate::error::{Error, JsonRpcErrorData};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version string carried by every outgoing message
pub const JSONRPC_VERSION: &str = "2.0";

/// Build a positional parameter list from heterogeneous values
///
/// Every argument is converted with `serde_json::json!`, so anything that
/// macro accepts works here, including nested object and array literals.
///
/// # Examples
///
/// ```rust
/// use jroh_core::params;
///
/// let params = params![1, "a", {"nested": true}, -2.5];
/// assert_eq!(params.len(), 4);
/// assert_eq!(params[1], "a");
///
/// let empty = params![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! params {
    ($($param:tt)*) => {
        match $crate::serde_json::json!([$($param)*]) {
            $crate::serde_json::Value::Array(params) => params,
            _ => ::std::vec::Vec::new(),
        }
    };
}

/// Turn a caller-supplied parameter list into the wire representation
///
/// An empty list means "no params" and maps to `None`, which is skipped
/// during serialization.
fn positional(params: Vec<Value>) -> Option<Vec<Value>> {
    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

/// JSON-RPC 2.0 request message
///
/// A request represents a call to a remote method that expects a response.
/// The server echoes `id` back so the caller can correlate the reply.
///
/// Requests are normally created through the client, which assigns the id.
/// `JsonRpcRequest::new` is available for callers that manage ids
/// themselves.
///
/// # Examples
///
/// ```rust
/// use jroh_core::{params, JsonRpcRequest};
///
/// let req = JsonRpcRequest::new("subtract", params![42, 23], 1);
/// let json = serde_json::to_string(&req).unwrap();
/// assert_eq!(json, r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#);
///
/// // No parameters: the key disappears
/// let req = JsonRpcRequest::new("getServerTime", vec![], 2);
/// let json = serde_json::to_string(&req).unwrap();
/// assert_eq!(json, r#"{"jsonrpc":"2.0","method":"getServerTime","id":2}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version - always "2.0"
    pub jsonrpc: String,
    /// Name of the remote method to invoke
    pub method: String,
    /// Positional parameters, `None` when the caller passed none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
    /// Identifier the server echoes back in its response
    pub id: u64,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request with an explicit id
    ///
    /// An empty `params` list is stored as `None`.
    pub fn new(method: impl Into<String>, params: Vec<Value>, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: positional(params),
            id,
        }
    }
}

/// JSON-RPC 2.0 notification message
///
/// A notification is a request without an `id`. The absence of the key
/// tells the server that no reply is expected, so the client never reads
/// the response body for notifications.
///
/// # Examples
///
/// ```rust
/// use jroh_core::{params, JsonRpcNotification};
///
/// let notif = JsonRpcNotification::new("log", params!["started"]);
/// let json = serde_json::to_string(&notif).unwrap();
/// assert!(!json.contains("\"id\""));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    /// JSON-RPC version - always "2.0"
    pub jsonrpc: String,
    /// Name of the method/event being notified
    pub method: String,
    /// Positional parameters, `None` when the caller passed none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl JsonRpcNotification {
    /// Create a new JSON-RPC 2.0 notification
    ///
    /// An empty `params` list is stored as `None`.
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: positional(params),
        }
    }
}

/// JSON-RPC 2.0 response message
///
/// A response carries either a `result` or an `error`. This type does not
/// enforce that exactly one is present: a server that sends both, or
/// neither, still decodes successfully and the caller decides what to do.
///
/// A remote error is ordinary data here. The HTTP exchange succeeded, so
/// the client returns the response and the caller checks `error`.
///
/// # Lenient Decoding
///
/// - A missing `jsonrpc` field decodes as an empty string
/// - A missing or `null` `id` decodes as `None`
/// - Unknown fields are ignored
///
/// # Examples
///
/// ```rust
/// use jroh_core::{JsonRpcResponse, JsonRpcErrorData};
/// use serde_json::json;
///
/// let success = JsonRpcResponse::success(json!({"value": 42}), 1);
/// assert!(success.is_success());
///
/// let error = JsonRpcResponse::error(JsonRpcErrorData::method_not_found("unknownMethod"), 2);
/// assert!(error.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version as sent by the server
    #[serde(default)]
    pub jsonrpc: String,
    /// The result of the method invocation (present only on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information (present only on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorData>,
    /// Id of the request this response answers
    #[serde(default)]
    pub id: Option<i64>,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(result: Value, id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    /// Create an error response
    pub fn error(error: JsonRpcErrorData, id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }
    }

    /// Returns true if `error` is absent
    ///
    /// A void reply (`"result": null`) decodes with `result` as `None` and
    /// still counts as a success.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns true if `error` is present
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Check whether this response answers the request with the given id
    ///
    /// Ids beyond `i64::MAX` never match because the response id is signed.
    pub fn answers(&self, request_id: u64) -> bool {
        match (self.id, i64::try_from(request_id)) {
            (Some(id), Ok(request_id)) => id == request_id,
            _ => false,
        }
    }

    /// Turn the response into a `Result`, surfacing a remote error as `Error::JsonRpc`
    ///
    /// A response without an error yields its result, or `Value::Null` if
    /// the server omitted it.
    pub fn into_result(self) -> Result<Value, Error> {
        match self.error {
            Some(error) => Err(Error::JsonRpc(error)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Any message shape the library models
///
/// This is the input type for batch submission. Only `Request` and
/// `Notification` are valid batch members; anything else is rejected with
/// `Error::InvalidArgument` before a single byte is sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// A request message (expects a response)
    Request(JsonRpcRequest),
    /// A notification message (no response expected)
    Notification(JsonRpcNotification),
    /// A response message
    Response(JsonRpcResponse),
}

impl JsonRpcMessage {
    /// Check if this message is a request
    pub fn is_request(&self) -> bool {
        matches!(self, JsonRpcMessage::Request(_))
    }

    /// Check if this message is a notification
    pub fn is_notification(&self) -> bool {
        matches!(self, JsonRpcMessage::Notification(_))
    }

    /// Check if this message is a response
    pub fn is_response(&self) -> bool {
        matches!(self, JsonRpcMessage::Response(_))
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            JsonRpcMessage::Request(_) => "request",
            JsonRpcMessage::Notification(_) => "notification",
            JsonRpcMessage::Response(_) => "response",
        }
    }
}

impl From<JsonRpcRequest> for JsonRpcMessage {
    fn from(request: JsonRpcRequest) -> Self {
        JsonRpcMessage::Request(request)
    }
}

impl From<JsonRpcNotification> for JsonRpcMessage {
    fn from(notification: JsonRpcNotification) -> Self {
        JsonRpcMessage::Notification(notification)
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        JsonRpcMessage::Response(response)
    }
}

/// A validated member of a batch
///
/// Serialized untagged, so a batch encodes as a plain JSON array of request
/// and notification objects in the order they were added.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    /// Expects a response carrying the same id
    Request(JsonRpcRequest),
    /// Produces no response entry
    Notification(JsonRpcNotification),
}

impl BatchEntry {
    /// The id of the request, or `None` for notifications
    pub fn id(&self) -> Option<u64> {
        match self {
            BatchEntry::Request(request) => Some(request.id),
            BatchEntry::Notification(_) => None,
        }
    }

    /// Name of the method this entry invokes
    pub fn method(&self) -> &str {
        match self {
            BatchEntry::Request(request) => &request.method,
            BatchEntry::Notification(notification) => &notification.method,
        }
    }
}

impl From<JsonRpcRequest> for BatchEntry {
    fn from(request: JsonRpcRequest) -> Self {
        BatchEntry::Request(request)
    }
}

impl From<JsonRpcNotification> for BatchEntry {
    fn from(notification: JsonRpcNotification) -> Self {
        BatchEntry::Notification(notification)
    }
}

impl TryFrom<JsonRpcMessage> for BatchEntry {
    type Error = Error;

    fn try_from(message: JsonRpcMessage) -> Result<Self, Self::Error> {
        match message {
            JsonRpcMessage::Request(request) => Ok(BatchEntry::Request(request)),
            JsonRpcMessage::Notification(notification) => {
                Ok(BatchEntry::Notification(notification))
            }
            other => Err(Error::InvalidArgument(format!(
                "batch entries must be requests or notifications, got a {}",
                other.kind()
            ))),
        }
    }
}
