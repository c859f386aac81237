//! JSON-RPC 2.0 client implementation over HTTP
//!
//! This crate provides a JSON-RPC 2.0 client that sends each call as an
//! HTTP POST to a single endpoint.
//!
//! # Core Features
//!
//! - **Calls**: Send a request, get the decoded response back
//! - **Notifications**: Fire-and-forget calls without an id
//! - **Batches**: Many requests and notifications in one round trip
//! - **Typed results**: `get_int`, `get_string`, `get_object::<T>` and friends
//! - **Id control**: Auto-incrementing or fixed request ids
//! - **Pluggable transport**: reqwest by default, any `Transport` otherwise
//! - **Observability**: `tracing` spans plus optional OpenTelemetry metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jroh_client::{params, JrohClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JrohClient::new("http://localhost:8080/rpc");
//!
//!     let response = client.call("sum", params![1, 2]).await?;
//!     if let Some(error) = &response.error {
//!         eprintln!("Server error: {}", error);
//!     } else {
//!         println!("Result: {}", response.get_int()?);
//!     }
//!
//!     client.notify("log", params!["summed"]).await?;
//!     Ok(())
//! }
//! ```
//!
//! # With Configuration
//!
//! ```rust,no_run
//! use jroh_client::ClientBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> jroh_core::Result<()> {
//! let client = ClientBuilder::new("https://rpc.example.com")
//!     .basic_auth("alex", "secret")
//!     .header("X-Request-Source", "billing")
//!     .timeout(Duration::from_secs(30))
//!     .with_default_observability()
//!     .service_name("billing-worker")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod batch;
mod client;
mod client_builder;
mod id;
mod metrics;
mod transport;

pub use batch::BatchResponse;
pub use client::JrohClient;
pub use client_builder::ClientBuilder;
pub use id::IdAllocator;
pub use metrics::ClientMetrics;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub use jroh_core::params;
