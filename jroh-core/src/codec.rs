//! Codec for JSON-RPC message serialization and deserialization
//!
//! Encoding produces the bytes that go into an HTTP request body; decoding
//! turns an HTTP response body back into responses.
//!
//! # Number Handling
//!
//! The workspace enables serde_json's `arbitrary_precision` feature, so
//! every number decoded here keeps its literal digits inside
//! `serde_json::Number`. Nothing is coerced to `i64` or `f64` until the
//! caller asks for it through the result extractors.
//!
//! # Error Mapping
//!
//! - Encoding failures -> `Error::Serialization`
//! - Any decoding failure (invalid JSON, wrong shape) -> `Error::Decode`
//!
//! # Examples
//!
//! ```rust
//! use jroh_core::{codec, params, JsonRpcRequest};
//!
//! let request = JsonRpcRequest::new("sum", params![1, 2], 5);
//! let body = codec::encode(&request).unwrap();
//! assert_eq!(body, br#"{"jsonrpc":"2.0","method":"sum","params":[1,2],"id":5}"#);
//!
//! let response = codec::decode_response(br#"{"jsonrpc":"2.0","result":3,"id":5}"#).unwrap();
//! assert_eq!(response.get_int().unwrap(), 3);
//! ```

use crate::error::{Error, Result};
use crate::types::{BatchEntry, JsonRpcResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode any serializable message to JSON bytes
///
/// # Errors
///
/// Returns `Error::Serialization` if the value cannot be represented as
/// JSON (for instance a map with non-string keys inside the params).
pub fn encode<T: Serialize + ?Sized>(msg: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a batch of entries as a single JSON array, preserving order
pub fn encode_batch(entries: &[BatchEntry]) -> Result<Vec<u8>> {
    encode(entries)
}

/// Decode bytes to a specific type
///
/// The generic building block for the response decoders below.
///
/// # Errors
///
/// Returns `Error::Decode` if the bytes are not JSON or do not match `T`.
pub fn decode_as<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    serde_json::from_slice(data).map_err(|e| Error::Decode(e.to_string()))
}

/// Decode the body of a single call into one response
///
/// ```rust
/// use jroh_core::codec;
///
/// let body = br#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found","data":null},"id":5}"#;
/// let response = codec::decode_response(body).unwrap();
/// assert!(response.result.is_none());
/// assert_eq!(response.error.unwrap().code, -32601);
/// ```
pub fn decode_response(data: &[u8]) -> Result<JsonRpcResponse> {
    decode_as(data)
}

/// Decode the body of a batch call into the responses, in server order
///
/// No reordering or id matching happens here. A single error object (which
/// some servers send when they reject the whole batch) is not an array and
/// fails with `Error::Decode`.
pub fn decode_batch_responses(data: &[u8]) -> Result<Vec<JsonRpcResponse>> {
    decode_as(data)
}

/// True if the body holds nothing but whitespace
///
/// Servers answer a batch made only of notifications with an empty body.
pub fn is_empty_body(data: &[u8]) -> bool {
    data.iter().all(|b| b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JsonRpcNotification, JsonRpcRequest};
    use serde_json::json;

    #[test]
    fn test_encode_request_field_order() {
        let req = JsonRpcRequest::new("test", crate::params![{"a": 1}], 1);
        let encoded = String::from_utf8(encode(&req).unwrap()).unwrap();

        assert_eq!(
            encoded,
            r#"{"jsonrpc":"2.0","method":"test","params":[{"a":1}],"id":1}"#
        );
    }

    #[test]
    fn test_encode_batch_preserves_order() {
        let entries = vec![
            BatchEntry::from(JsonRpcNotification::new("first", vec![])),
            BatchEntry::from(JsonRpcRequest::new("second", vec![], 7)),
            BatchEntry::from(JsonRpcNotification::new("third", crate::params![true])),
        ];
        let encoded: serde_json::Value = serde_json::from_slice(&encode_batch(&entries).unwrap()).unwrap();
        let items = encoded.as_array().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["method"], "first");
        assert_eq!(items[1]["method"], "second");
        assert_eq!(items[1]["id"], 7);
        assert_eq!(items[2]["method"], "third");
        assert!(items[2].get("id").is_none());
    }

    #[test]
    fn test_decode_response_success() {
        let response = decode_response(br#"{"jsonrpc":"2.0","result":{"x":1},"id":3}"#).unwrap();

        assert!(response.is_success());
        assert_eq!(response.id, Some(3));
        assert_eq!(response.result, Some(json!({"x": 1})));
    }

    #[test]
    fn test_decode_invalid_json() {
        let result = decode_response(b"not valid json");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_empty_body() {
        let result = decode_response(b"");
        assert!(matches!(result, Err(Error::Decode(_))));
        assert!(is_empty_body(b""));
        assert!(is_empty_body(b" \r\n"));
        assert!(!is_empty_body(b"[]"));
    }

    #[test]
    fn test_decode_wrong_shape() {
        // An id that is not an integer
        let result = decode_response(br#"{"jsonrpc":"2.0","result":1,"id":"abc"}"#);
        assert!(matches!(result, Err(Error::Decode(_))));

        // An array where a single response is expected
        let result = decode_response(br#"[{"jsonrpc":"2.0","result":1,"id":1}]"#);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_batch_responses_keeps_server_order() {
        let body = br#"[
            {"jsonrpc":"2.0","result":"b","id":2},
            {"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":1}
        ]"#;
        let responses = decode_batch_responses(body).unwrap();

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, Some(2));
        assert_eq!(responses[1].id, Some(1));
        assert!(responses[1].is_error());
    }

    #[test]
    fn test_decode_batch_rejects_single_object() {
        let body = br#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request"},"id":null}"#;
        assert!(matches!(decode_batch_responses(body), Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_keeps_large_numbers_exact() {
        let body = br#"{"jsonrpc":"2.0","result":123456789012345678901234567890,"id":1}"#;
        let response = decode_response(body).unwrap();

        assert_eq!(
            response.result.unwrap().to_string(),
            "123456789012345678901234567890"
        );
    }
}
