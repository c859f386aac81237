//! Error types for jroh
//!
//! This module defines two error types:
//!
//! - **Error**: Local failures of a client operation (uses thiserror)
//! - **JsonRpcErrorData**: The wire-format error object a server puts in a response
//!
//! # Local vs Remote Errors
//!
//! A remote error (the `error` member of a response) is *not* a local
//! failure. The HTTP exchange worked and the server answered, so the client
//! hands the response back and the caller inspects it. Only the opt-in
//! helpers such as `JsonRpcResponse::into_result` turn a remote error into
//! `Error::JsonRpc`.
//!
//! # Standard Error Codes
//!
//! JSON-RPC 2.0 reserves these codes, which servers commonly return:
//! - `-32700`: Parse error (invalid JSON)
//! - `-32600`: Invalid request (missing required fields)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000 to -32099`: Server error (implementation-defined)
//!
//! # Examples
//!
//! ```rust
//! use jroh_core::{Error, JsonRpcErrorData};
//!
//! let error = Error::InvalidArgument("batch cannot be empty".into());
//! assert!(error.to_string().contains("batch cannot be empty"));
//!
//! let remote = JsonRpcErrorData::method_not_found("unknownMethod");
//! assert_eq!(remote.code, -32601);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type for jroh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Local failure of a jroh operation
///
/// # Error Categories
///
/// - **Exchange errors**: Transport, Decode
/// - **Caller errors**: InvalidArgument, TypeMismatch
/// - **Processing errors**: Serialization, Internal
/// - **Opt-in remote errors**: JsonRpc
///
/// None of these are retried internally. Retry policy belongs to the
/// transport or to the caller.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Remote JSON-RPC error surfaced by an opt-in helper
    ///
    /// Plain `call`/`batch` never produce this variant; they return the
    /// response with its `error` member set instead.
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcErrorData),

    /// Submitting the HTTP request failed
    ///
    /// Covers connection refused, DNS failures, TLS errors, timeouts
    /// configured on the transport and failures reading the body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body is not a valid response (or array of responses)
    ///
    /// Bytes were received but could not be interpreted, so the call is
    /// considered failed.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The caller passed something the operation cannot accept
    ///
    /// Raised before any network activity, e.g. for a batch entry that is
    /// neither a request nor a notification.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A result extractor was used on a value of the wrong kind
    ///
    /// `value` carries the offending result (`null` when the response had
    /// none) so it can be logged or inspected.
    #[error("Type mismatch: expected {expected}, got {value}")]
    TypeMismatch {
        /// The kind the extractor wanted
        expected: &'static str,
        /// The value actually present
        value: Value,
    },

    /// Serialization or deserialization error
    ///
    /// Raised when encoding an outgoing message fails or when the structured
    /// extractor cannot map a result onto the requested type.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    ///
    /// Misconfiguration and bookkeeping failures that are not the caller's
    /// input and not the network.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a `TypeMismatch` for an optional result value
    pub fn type_mismatch(expected: &'static str, value: Option<&Value>) -> Self {
        Error::TypeMismatch {
            expected,
            value: value.cloned().unwrap_or(Value::Null),
        }
    }

    /// Short label for the error kind, used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Error::JsonRpc(_) => "json_rpc",
            Error::Transport(_) => "transport",
            Error::Decode(_) => "decode",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::TypeMismatch { .. } => "type_mismatch",
            Error::Serialization(_) => "serialization",
            Error::Internal(_) => "internal",
        }
    }
}

/// JSON-RPC 2.0 error object
///
/// This is the exact wire format of the `error` member of a response.
///
/// # Wire Format
///
/// Error objects MUST contain:
/// - `code`: An integer error code
/// - `message`: A short description of the error
///
/// And MAY contain:
/// - `data`: Additional information about the error
///
/// Numbers inside `data` keep their original text, like results do.
///
/// # Examples
///
/// ```rust
/// use jroh_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// let error = JsonRpcErrorData::method_not_found("calculate");
/// assert_eq!(error.code, -32601);
///
/// let custom = JsonRpcErrorData::with_data(
///     1001,
///     "Insufficient funds",
///     json!({"balance": 50, "required": 100})
/// );
/// assert!(custom.data.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Numeric error code indicating the error type
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Optional additional error information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorData {
    /// Create a new JSON-RPC error with code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new JSON-RPC error with additional data
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a parse error (-32700)
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// Create an invalid request error (-32600)
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(-32600, msg)
    }

    /// Create a method not found error (-32601)
    ///
    /// ```rust
    /// use jroh_core::JsonRpcErrorData;
    ///
    /// let error = JsonRpcErrorData::method_not_found("calculateFoo");
    /// assert_eq!(error.message, "Method not found: calculateFoo");
    /// ```
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(-32601, format!("Method not found: {}", method.into()))
    }

    /// Create an invalid params error (-32602)
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(-32602, msg)
    }

    /// Create an internal error (-32603)
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(-32603, msg)
    }

    /// True for the codes JSON-RPC 2.0 reserves (-32768 to -32000)
    pub fn is_reserved(&self) -> bool {
        (-32768..=-32000).contains(&self.code)
    }
}

impl std::fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message", e.g. "[-32601] Method not found: foo"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}
