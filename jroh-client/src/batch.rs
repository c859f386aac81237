//! Id-based lookup over batch responses
//!
//! `JrohClient::batch` returns responses exactly as the server ordered
//! them, which JSON-RPC 2.0 allows to differ from the order of the
//! requests. `BatchResponse` is an opt-in view that indexes those responses
//! by id so each request's answer can be found directly.
//!
//! # Usage Pattern
//!
//! 1. Build requests with `JrohClient::new_request`, keeping their ids
//! 2. Send them with `JrohClient::batch`
//! 3. Wrap the returned `Vec` in `BatchResponse::new`
//! 4. Look results up by id
//!
//! Responses without an id (servers send `"id": null` when they cannot
//! parse an entry) cannot be matched; they are kept aside in `unmatched`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jroh_client::{params, BatchResponse, JrohClient};
//!
//! # async fn example(client: &JrohClient) -> jroh_core::Result<()> {
//! let first = client.new_request("sum", params![1, 2]);
//! let second = client.new_request("echo", params!["hi"]);
//! let (first_id, second_id) = (first.id, second.id);
//!
//! let responses = client.batch(vec![first.into(), second.into()]).await?;
//! let responses = BatchResponse::new(responses);
//!
//! let sum: i64 = responses.get(first_id)?;
//! let echo: String = responses.get(second_id)?;
//! # Ok(())
//! # }
//! ```

use jroh_core::{BatchEntry, Error, JsonRpcErrorData, JsonRpcResponse, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Batch responses indexed by id
#[derive(Debug, Clone, Default)]
pub struct BatchResponse {
    responses: HashMap<i64, JsonRpcResponse>,
    unmatched: Vec<JsonRpcResponse>,
}

impl BatchResponse {
    /// Index responses by id
    ///
    /// If the server repeats an id, the first response carrying it wins and
    /// the rest go to `unmatched`.
    pub fn new(responses: Vec<JsonRpcResponse>) -> Self {
        let mut indexed = HashMap::new();
        let mut unmatched = Vec::new();

        for response in responses {
            match response.id {
                Some(id) if !indexed.contains_key(&id) => {
                    indexed.insert(id, response);
                }
                _ => unmatched.push(response),
            }
        }

        Self {
            responses: indexed,
            unmatched,
        }
    }

    /// Get a typed result for a specific request id
    ///
    /// # Errors
    ///
    /// - `Error::Internal` if the server sent no response for `id`
    /// - `Error::JsonRpc` if the response carries an error
    /// - `Error::Serialization` if the result does not fit `R`
    pub fn get<R: DeserializeOwned>(&self, id: u64) -> Result<R> {
        let response = self
            .get_response(id)
            .ok_or_else(|| Error::Internal(format!("No response for ID: {}", id)))?;

        if let Some(error) = &response.error {
            return Err(Error::JsonRpc(error.clone()));
        }

        response.get_object()
    }

    /// Get the raw response for a specific request id
    pub fn get_response(&self, id: u64) -> Option<&JsonRpcResponse> {
        let key = i64::try_from(id).ok()?;
        self.responses.get(&key)
    }

    /// Check if a response exists for an id
    pub fn has_response(&self, id: u64) -> bool {
        self.get_response(id).is_some()
    }

    /// Ids of all matched responses, in no particular order
    pub fn response_ids(&self) -> Vec<i64> {
        self.responses.keys().copied().collect()
    }

    /// Responses that could not be indexed (null or repeated ids)
    pub fn unmatched(&self) -> &[JsonRpcResponse] {
        &self.unmatched
    }

    /// Number of responses, matched or not
    pub fn len(&self) -> usize {
        self.responses.len() + self.unmatched.len()
    }

    /// Check if there are no responses
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that no response, matched or not, carries an error
    pub fn all_success(&self) -> bool {
        self.responses
            .values()
            .chain(self.unmatched.iter())
            .all(|r| r.error.is_none())
    }

    /// All errors in the batch with the id they answer (if any)
    pub fn errors(&self) -> Vec<(Option<i64>, &JsonRpcErrorData)> {
        self.responses
            .values()
            .chain(self.unmatched.iter())
            .filter_map(|r| r.error.as_ref().map(|e| (r.id, e)))
            .collect()
    }

    /// Ids of the sent requests that received no response
    ///
    /// Notifications in `sent` are ignored since they never get one.
    pub fn missing_ids(&self, sent: &[BatchEntry]) -> Vec<u64> {
        sent.iter()
            .filter_map(BatchEntry::id)
            .filter(|id| !self.has_response(*id))
            .collect()
    }
}

impl From<Vec<JsonRpcResponse>> for BatchResponse {
    fn from(responses: Vec<JsonRpcResponse>) -> Self {
        Self::new(responses)
    }
}
