//! Core JSON-RPC 2.0 types and codec for jroh
//!
//! This crate holds everything about JSON-RPC that does not depend on how
//! bytes travel:
//!
//! - **Types**: Requests, notifications, responses and batch entries
//! - **Codec**: Encoding of outgoing messages, decoding of response bodies
//! - **Extraction**: Typed access to a response's result
//! - **Error handling**: The error taxonomy shared by every jroh crate
//! - **Observability**: OpenTelemetry pipeline setup
//!
//! # Architecture
//!
//! The `jroh-client` crate builds on these types to talk to a server over
//! HTTP. Keeping the message model here lets other transports, or tests,
//! produce and consume the exact same wire format.
//!
//! # Example
//!
//! ```rust
//! use jroh_core::{codec, params, JsonRpcRequest};
//!
//! let request = JsonRpcRequest::new("sum", params![1, 2], 5);
//! let body = codec::encode(&request).unwrap();
//! assert_eq!(
//!     String::from_utf8(body).unwrap(),
//!     r#"{"jsonrpc":"2.0","method":"sum","params":[1,2],"id":5}"#
//! );
//!
//! let response = codec::decode_response(br#"{"jsonrpc":"2.0","result":3,"id":5}"#).unwrap();
//! assert_eq!(response.get_int().unwrap(), 3);
//! ```

pub mod codec;
pub mod error;
pub mod extract;
pub mod observability;
pub mod types;

pub use error::{Error, JsonRpcErrorData, Result};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{
    BatchEntry, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    JSONRPC_VERSION,
};

// Used by the `params!` macro from downstream crates
#[doc(hidden)]
pub use serde_json;
