//! Client builder for configuring transport, headers, ids and observability
//!
//! `JrohClient::new` covers the common case. The `ClientBuilder` provides
//! a fluent API for everything else:
//! - Custom headers and basic auth
//! - A custom transport, a preconfigured `reqwest::Client`, or a timeout
//!   for the default one
//! - Id allocation behavior
//! - OpenTelemetry observability and client metrics
//!
//! # Transport Precedence
//!
//! `transport` wins over `http_client`, which wins over `timeout`. The
//! timeout only configures the default reqwest transport.
//!
//! # Examples
//!
//! ```rust
//! use jroh_client::ClientBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> jroh_core::Result<()> {
//! let client = ClientBuilder::new("http://localhost:8080/rpc")
//!     .header("X-Api-Key", "k-123")
//!     .basic_auth("alex", "secret")
//!     .timeout(Duration::from_secs(10))
//!     .starting_id(1)
//!     .build()?;
//!
//! assert_eq!(client.ids().peek(), 1);
//! # Ok(())
//! # }
//! ```

use crate::client::{basic_auth_header, JrohClient};
use crate::id::IdAllocator;
use crate::metrics::ClientMetrics;
use crate::transport::{ReqwestTransport, Transport};
use jroh_core::{ObservabilityConfig, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring and creating a JrohClient
pub struct ClientBuilder {
    endpoint: String,
    custom_headers: BTreeMap<String, String>,
    basic_auth: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    auto_increment: bool,
    starting_id: u64,
    observability_config: Option<ObservabilityConfig>,
    enable_metrics: bool,
    service_name: Option<String>,
}

impl ClientBuilder {
    /// Create a new client builder for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            custom_headers: BTreeMap::new(),
            basic_auth: None,
            transport: None,
            http_client: None,
            timeout: None,
            auto_increment: true,
            starting_id: 0,
            observability_config: None,
            enable_metrics: false,
            service_name: None,
        }
    }

    /// Add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    /// Send basic auth credentials; empty parts disable it
    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        self.basic_auth = basic_auth_header(username, password);
        self
    }

    /// Submit through a custom transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Submit through a caller-configured `reqwest::Client`
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Overall per-request timeout for the default reqwest transport
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether ids advance after each request (default: true)
    pub fn auto_increment(mut self, enabled: bool) -> Self {
        self.auto_increment = enabled;
        self
    }

    /// The id of the first request (default: 0)
    pub fn starting_id(mut self, id: u64) -> Self {
        self.starting_id = id;
        self
    }

    /// Install OpenTelemetry with a custom configuration and record metrics
    pub fn with_observability(mut self, config: ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Install OpenTelemetry with the default configuration and record metrics
    pub fn with_default_observability(mut self) -> Self {
        self.observability_config = Some(ObservabilityConfig::default());
        self
    }

    /// Record metrics on the already registered global meter provider
    ///
    /// For applications that set up OpenTelemetry themselves.
    pub fn with_metrics(mut self) -> Self {
        self.enable_metrics = true;
        self
    }

    /// Set service name for observability (used if observability is enabled)
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// `Error::Internal` if the reqwest client cannot be built or
    /// observability fails to initialize.
    pub fn build(self) -> Result<JrohClient> {
        let metrics = if let Some(mut config) = self.observability_config {
            if let Some(name) = self.service_name {
                config.service_name = name;
            }
            let service_name = config.service_name.clone();
            jroh_core::init_observability(config)?;

            Some(Arc::new(ClientMetrics::new(service_name)))
        } else if self.enable_metrics {
            let service_name = self
                .service_name
                .unwrap_or_else(|| ObservabilityConfig::default().service_name);
            Some(Arc::new(ClientMetrics::new(service_name)))
        } else {
            None
        };

        let transport: Arc<dyn Transport> = match (self.transport, self.http_client, self.timeout) {
            (Some(transport), _, _) => transport,
            (None, Some(client), timeout) => {
                if timeout.is_some() {
                    tracing::warn!("Timeout ignored because an HTTP client was supplied");
                }
                Arc::new(ReqwestTransport::from_client(client))
            }
            (None, None, Some(timeout)) => Arc::new(ReqwestTransport::with_timeout(timeout)?),
            (None, None, None) => Arc::new(ReqwestTransport::new()),
        };

        let ids = IdAllocator::new(self.starting_id);
        ids.set_auto_increment(self.auto_increment);

        tracing::debug!(endpoint = %self.endpoint, "Client built");

        Ok(JrohClient {
            endpoint: self.endpoint,
            transport,
            basic_auth: self.basic_auth,
            custom_headers: self.custom_headers,
            ids,
            metrics,
        })
    }
}
