//! OpenTelemetry setup for applications that use jroh
//!
//! The client emits `tracing` spans and events and, when enabled on the
//! builder, OpenTelemetry metrics. Nothing is exported until the host
//! application installs a pipeline. This module installs one that ships
//! traces and metrics to an OTLP collector and prints JSON logs locally.
//!
//! # Pipeline
//!
//! 1. **Tracer provider**: batched OTLP/gRPC span export
//! 2. **Meter provider**: OTLP/gRPC metric export every 30 seconds
//! 3. **Subscriber**: `tracing` bridge, env filter and JSON formatter
//!
//! Each piece can be switched off through `ObservabilityConfig`.
//!
//! # Usage Pattern
//!
//! Initialize once at startup, before building clients:
//!
//! ```rust,no_run
//! use jroh_core::ObservabilityConfig;
//!
//! let config = ObservabilityConfig::new("billing-worker")
//!     .with_endpoint("http://localhost:4317")
//!     .with_log_level("debug");
//!
//! jroh_core::init_observability(config).expect("Failed to init observability");
//!
//! // ... issue calls ...
//!
//! jroh_core::shutdown_observability();
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector endpoint
//! - `RUST_LOG`: Log level filter (e.g., "info", "jroh_client=debug")

use crate::error::{Error, Result};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{metrics::SdkMeterProvider, trace::SdkTracerProvider, Resource};
use parking_lot::Mutex;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_SERVICE_NAME: &str = "jroh";
const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";
const METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Observability configuration
///
/// # Defaults
///
/// - Service name: "jroh"
/// - Service version: the crate version
/// - OTLP endpoint: `$OTEL_EXPORTER_OTLP_ENDPOINT` or "http://localhost:4317"
/// - Traces, metrics and logs enabled
/// - Log level: `$RUST_LOG` or "info"
///
/// # Examples
///
/// ```rust
/// use jroh_core::ObservabilityConfig;
///
/// let config = ObservabilityConfig::new("inventory-sync")
///     .with_endpoint("http://collector:4317")
///     .with_version("1.2.3")
///     .with_metrics(false);
///
/// assert_eq!(config.service_name, "inventory-sync");
/// assert!(!config.enable_metrics);
/// ```
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to every span and metric
    pub service_name: String,

    /// Service version attached to every span and metric
    pub service_version: String,

    /// gRPC endpoint of the OTLP collector
    pub otlp_endpoint: String,

    /// Export spans
    pub enable_traces: bool,

    /// Export metrics
    pub enable_metrics: bool,

    /// Print structured logs locally
    pub enable_logs: bool,

    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_OTLP_ENDPOINT.to_string()),
            enable_traces: true,
            enable_metrics: true,
            enable_logs: true,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl ObservabilityConfig {
    /// Create a configuration for the named service, everything else default
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the OTLP collector endpoint (e.g. "http://collector:4317")
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    /// Set the log level filter ("error", "warn", "info", "debug", "trace")
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the service version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    /// Enable or disable span export
    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    /// Enable or disable metric export
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Enable or disable local structured logs
    pub fn with_logs(mut self, enable: bool) -> Self {
        self.enable_logs = enable;
        self
    }

    fn resource(&self) -> Resource {
        Resource::builder_empty()
            .with_attributes(vec![
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                    self.service_name.clone(),
                ),
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                    self.service_version.clone(),
                ),
            ])
            .build()
    }
}

/// Providers installed by `init_observability`, kept so shutdown can flush them
struct TelemetryProviders {
    tracer: Option<SdkTracerProvider>,
    meter: Option<SdkMeterProvider>,
}

impl TelemetryProviders {
    fn is_empty(&self) -> bool {
        self.tracer.is_none() && self.meter.is_none()
    }

    /// Register the providers globally and keep a handle for shutdown
    fn install(self) {
        if self.is_empty() {
            return;
        }
        if let Some(ref provider) = self.tracer {
            global::set_tracer_provider(provider.clone());
        }
        if let Some(ref provider) = self.meter {
            global::set_meter_provider(provider.clone());
        }
        *PROVIDERS.lock() = Some(self);
    }

    fn shutdown(self) {
        if let Some(provider) = self.tracer {
            if let Err(e) = provider.force_flush() {
                tracing::warn!(error = %e, "Failed to flush spans");
            }
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to shut down tracer provider");
            }
        }
        if let Some(provider) = self.meter {
            if let Err(e) = provider.force_flush() {
                tracing::warn!(error = %e, "Failed to flush metrics");
            }
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to shut down meter provider");
            }
        }
    }
}

static PROVIDERS: Mutex<Option<TelemetryProviders>> = parking_lot::const_mutex(None);

/// Install the telemetry pipeline described by `config`
///
/// Call this once per process. Providers are registered globally, so the
/// client's `ClientMetrics` and `tracing` spans flow into them without
/// further wiring. Nothing is registered unless the subscriber installs.
///
/// The OTLP exporters connect lazily, so an unreachable collector does not
/// fail initialization; export errors surface later through the SDK.
///
/// # Errors
///
/// `Error::Internal` if an exporter cannot be built, the log filter does not
/// parse, or a global subscriber is already installed.
pub fn init_observability(config: ObservabilityConfig) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;

    let providers = TelemetryProviders {
        tracer: if config.enable_traces {
            Some(build_tracer_provider(&config)?)
        } else {
            None
        },
        meter: if config.enable_metrics {
            Some(build_meter_provider(&config)?)
        } else {
            None
        },
    };

    // The tracer must exist before the subscriber so its layer can wrap it
    let tracer = providers
        .tracer
        .as_ref()
        .map(|provider| provider.tracer(config.service_name.clone()));

    init_tracing_subscriber(&config, tracer)?;
    providers.install();

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        traces = config.enable_traces,
        metrics = config.enable_metrics,
        logs = config.enable_logs,
        "OpenTelemetry initialized"
    );

    Ok(())
}

/// Build the tracer provider with a batching OTLP span exporter
fn build_tracer_provider(config: &ObservabilityConfig) -> Result<SdkTracerProvider> {
    use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()
        .map_err(|e| Error::Internal(format!("span exporter: {}", e)))?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(config.resource())
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .build())
}

/// Build the meter provider with a periodic OTLP reader
fn build_meter_provider(config: &ObservabilityConfig) -> Result<SdkMeterProvider> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()
        .map_err(|e| Error::Internal(format!("metric exporter: {}", e)))?;

    let reader = opentelemetry_sdk::metrics::PeriodicReader::builder(exporter)
        .with_interval(METRIC_EXPORT_INTERVAL)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(config.resource())
        .build())
}

/// Install the global `tracing` subscriber
///
/// Layers, outermost first: OpenTelemetry (when a tracer is given), the env
/// filter, then the JSON formatter (when logs are enabled).
fn init_tracing_subscriber(
    config: &ObservabilityConfig,
    tracer: Option<opentelemetry_sdk::trace::Tracer>,
) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| Error::Internal(format!("log filter: {}", e)))?;

    let telemetry_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let fmt_layer = config.enable_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .json()
    });

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("tracing subscriber: {}", e)))
}

/// Flush and stop telemetry before the process exits
///
/// Pending spans and metrics are exported, then the providers stop
/// recording. Calling it again, or without `init_observability`, does
/// nothing.
pub fn shutdown_observability() {
    let Some(providers) = PROVIDERS.lock().take() else {
        return;
    };
    tracing::info!("Shutting down OpenTelemetry");
    providers.shutdown();
}
