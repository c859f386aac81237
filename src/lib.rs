//! JROH - JSON-RPC 2.0 Over HTTP
//!
//! This is the convenience crate that re-exports the jroh sub-crates. Use
//! it if you want a single dependency.
//!
//! # Architecture
//!
//! - **jroh-core**: Message types, codec, result extraction, errors, observability
//! - **jroh-client**: HTTP client, id allocation, transports, batch helpers
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jroh::{params, JrohClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JrohClient::new("http://localhost:8080/rpc");
//!
//!     let response = client.call("sum", params![5, 3]).await?;
//!     println!("Result: {}", response.get_int()?);
//!
//!     Ok(())
//! }
//! ```

pub use jroh_client as client;
pub use jroh_core as core;

pub use jroh_client::{params, BatchResponse, ClientBuilder, JrohClient};
pub use jroh_core::{Error, JsonRpcResponse, Result};
