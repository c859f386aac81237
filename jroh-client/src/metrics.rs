//! Client metrics definitions
//!
//! OpenTelemetry instruments describing the client's traffic. They are
//! created only when observability is enabled on the builder, and they
//! report through whatever meter provider the application registered
//! (see `jroh_core::init_observability`).
//!
//! # Metrics Collected
//!
//! - **requests_total**: Calls and batches submitted, by method and outcome (counter)
//! - **request_duration**: Round-trip latency in seconds (histogram)
//! - **errors_total**: Local failures by error kind (counter)
//! - **remote_errors_total**: Responses carrying a JSON-RPC error, by code (counter)
//! - **notifications_sent**: Notifications submitted, by method (counter)
//! - **batch_size**: Entries per batch (histogram)
//!
//! # Examples
//!
//! ```rust
//! use jroh_client::ClientMetrics;
//!
//! let metrics = ClientMetrics::new("billing-worker");
//! metrics.record_request("sum", "success", 0.012);
//! metrics.record_batch(3);
//! ```

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    InstrumentationScope, KeyValue,
};

/// Outcome label for a call that returned a response without an error
pub(crate) const STATUS_SUCCESS: &str = "success";
/// Outcome label for a call that returned a response carrying an error
pub(crate) const STATUS_REMOTE_ERROR: &str = "remote_error";
/// Outcome label for a call that failed locally
pub(crate) const STATUS_FAILED: &str = "failed";

/// Client metrics for monitoring
#[derive(Debug, Clone)]
pub struct ClientMetrics {
    /// Total number of calls and batches submitted
    pub requests_total: Counter<u64>,
    /// Round-trip duration in seconds
    pub request_duration: Histogram<f64>,
    /// Total number of local failures
    pub errors_total: Counter<u64>,
    /// Total number of responses that carried a JSON-RPC error
    pub remote_errors_total: Counter<u64>,
    /// Total number of notifications sent
    pub notifications_sent: Counter<u64>,
    /// Batch size distribution
    pub batch_size: Histogram<u64>,
}

impl ClientMetrics {
    /// Create metrics on the global meter provider, scoped by service name
    pub fn new(service_name: impl Into<String>) -> Self {
        let scope = InstrumentationScope::builder(service_name.into()).build();
        let meter = global::meter_provider().meter_with_scope(scope);
        Self::new_with_meter(&meter)
    }

    /// Create metrics on a caller-provided meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("jroh.client.requests.total")
                .with_description("Total number of calls and batches submitted")
                .build(),
            request_duration: meter
                .f64_histogram("jroh.client.request.duration")
                .with_description("Round-trip duration in seconds")
                .with_unit("s")
                .build(),
            errors_total: meter
                .u64_counter("jroh.client.errors.total")
                .with_description("Total number of local failures")
                .build(),
            remote_errors_total: meter
                .u64_counter("jroh.client.remote_errors.total")
                .with_description("Total number of responses carrying a JSON-RPC error")
                .build(),
            notifications_sent: meter
                .u64_counter("jroh.client.notifications.sent")
                .with_description("Total number of notifications sent")
                .build(),
            batch_size: meter
                .u64_histogram("jroh.client.batch.size")
                .with_description("Number of entries in batch submissions")
                .build(),
        }
    }

    /// Record a completed call or batch
    pub fn record_request(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    /// Record a local failure by `Error::kind`
    pub fn record_error(&self, error_kind: &str) {
        self.errors_total
            .add(1, &[KeyValue::new("error_kind", error_kind.to_string())]);
    }

    /// Record a response that carried a JSON-RPC error
    pub fn record_remote_error(&self, method: &str, code: i32) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("code", i64::from(code)),
        ];
        self.remote_errors_total.add(1, attributes);
    }

    /// Record a notification sent
    pub fn record_notification(&self, method: &str) {
        self.notifications_sent
            .add(1, &[KeyValue::new("method", method.to_string())]);
    }

    /// Record the size of a batch
    pub fn record_batch(&self, size: u64) {
        self.batch_size.record(size, &[]);
    }
}
