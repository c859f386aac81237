//! Typed extraction of response results
//!
//! A response's `result` is decoded generically because its shape is not
//! known until the caller asks for it. The methods here interpret it once
//! the caller names the expected type.
//!
//! # Narrow Extractors
//!
//! `get_int`, `get_float`, `get_bool` and `get_string` accept exactly one
//! JSON kind each. There is no coercion between kinds: a string `"3"` is not
//! an integer and the number `1` is not a boolean. Anything else fails with
//! `Error::TypeMismatch`, which carries the offending value.
//!
//! Numbers are kept as their literal text, so the numeric extractors parse
//! that text on demand. `3` is both an `i64` and an `f64`; `3.5` is only an
//! `f64`; `1e400` and integers beyond the `i64` range are neither.
//!
//! # Structured Extraction
//!
//! `get_object` re-encodes the result and decodes it into the caller's type.
//!
//! # Examples
//!
//! ```rust
//! use jroh_core::{Error, JsonRpcResponse};
//! use serde_json::json;
//!
//! let response = JsonRpcResponse::success(json!(3), 5);
//! assert_eq!(response.get_int().unwrap(), 3);
//! assert_eq!(response.get_float().unwrap(), 3.0);
//! assert!(matches!(response.get_string(), Err(Error::TypeMismatch { .. })));
//! ```

use crate::error::{Error, Result};
use crate::types::JsonRpcResponse;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use std::str::FromStr;

impl JsonRpcResponse {
    /// Interpret the result as a signed 64-bit integer
    ///
    /// # Errors
    ///
    /// `Error::TypeMismatch` if the result is absent, not a number, or a
    /// number whose text is not an integer in the `i64` range.
    pub fn get_int(&self) -> Result<i64> {
        let number = self.number("i64")?;
        parse_number(number, "i64", self.result.as_ref())
    }

    /// Interpret the result as a 64-bit float
    ///
    /// Integers convert; values that overflow to infinity do not.
    ///
    /// # Errors
    ///
    /// `Error::TypeMismatch` if the result is absent, not a number, or out
    /// of the finite `f64` range.
    pub fn get_float(&self) -> Result<f64> {
        let number = self.number("f64")?;
        let value: f64 = parse_number(number, "f64", self.result.as_ref())?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::type_mismatch("f64", self.result.as_ref()))
        }
    }

    /// Interpret the result as a boolean
    pub fn get_bool(&self) -> Result<bool> {
        match &self.result {
            Some(Value::Bool(b)) => Ok(*b),
            other => Err(Error::type_mismatch("bool", other.as_ref())),
        }
    }

    /// Interpret the result as a string
    pub fn get_string(&self) -> Result<String> {
        match &self.result {
            Some(Value::String(s)) => Ok(s.clone()),
            other => Err(Error::type_mismatch("string", other.as_ref())),
        }
    }

    /// Interpret the result as a caller-defined structured type
    ///
    /// The result is serialized back to bytes and parsed into `T`, so `T`
    /// sees exactly the JSON the server sent (numbers included). An absent
    /// result is treated as `null`, which suits `Option<_>` and `()`.
    ///
    /// # Errors
    ///
    /// `Error::Serialization` if re-encoding fails or the JSON does not fit `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jroh_core::JsonRpcResponse;
    /// use serde::Deserialize;
    /// use serde_json::json;
    ///
    /// #[derive(Deserialize)]
    /// struct Person { name: String, age: u32 }
    ///
    /// let response = JsonRpcResponse::success(json!({"name": "Alex", "age": 33}), 1);
    /// let person: Person = response.get_object().unwrap();
    /// assert_eq!(person.name, "Alex");
    /// assert_eq!(person.age, 33);
    /// ```
    pub fn get_object<T: DeserializeOwned>(&self) -> Result<T> {
        let null = Value::Null;
        let result = self.result.as_ref().unwrap_or(&null);

        let bytes = serde_json::to_vec(result).map_err(|e| Error::Serialization(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// The raw number carried by the result, without conversion
    ///
    /// Useful when the caller wants to apply its own numeric type (e.g. an
    /// arbitrary precision decimal) to the literal digits.
    pub fn get_number(&self) -> Result<&Number> {
        self.number("number")
    }

    fn number(&self, expected: &'static str) -> Result<&Number> {
        match &self.result {
            Some(Value::Number(n)) => Ok(n),
            other => Err(Error::type_mismatch(expected, other.as_ref())),
        }
    }
}

/// Parse the literal digits of a number into the requested numeric type
fn parse_number<T: FromStr>(number: &Number, expected: &'static str, original: Option<&Value>) -> Result<T> {
    number
        .to_string()
        .parse::<T>()
        .map_err(|_| Error::type_mismatch(expected, original))
}
