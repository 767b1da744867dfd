//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the fan-out service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where loopback self-calls are sent.
    pub fanout: FanoutConfig,

    /// Service identity, used for span resources and gauge labels.
    pub service: ServiceConfig,

    /// Trace sinks.
    pub exporters: ExporterConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Self-call configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FanoutConfig {
    /// Base URL of this service as seen from itself. `/fib?i=<n>` is appended.
    pub self_url: String,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            self_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Service identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name reported on every span (`PROJECT_NAME`).
    pub name: String,

    /// Deployment domain, the `application` gauge label (`PROJECT_DOMAIN`).
    pub domain: String,

    /// Container/host identifier, the `container` gauge label (`HOSTNAME`).
    pub container_id: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "fib-fanout".to_string(),
            domain: String::new(),
            container_id: String::new(),
        }
    }
}

/// Trace sink configuration. Remote sinks are only registered when configured.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Pretty-print finished spans to stdout.
    pub stdout: bool,

    /// Honeycomb API key (`HNY_KEY`).
    pub honeycomb_api_key: Option<String>,

    /// Honeycomb dataset (`HNY_DATASET`).
    pub honeycomb_dataset: Option<String>,

    /// Honeycomb OTLP/HTTP traces endpoint.
    pub honeycomb_endpoint: String,

    /// OTLP/HTTP collector endpoint (`JAEGER_ENDPOINT`).
    pub collector_endpoint: Option<String>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            honeycomb_api_key: None,
            honeycomb_dataset: None,
            honeycomb_endpoint: "https://api.honeycomb.io/v1/traces".to_string(),
            collector_endpoint: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address for the Prometheus scrape endpoint.
    pub metrics_address: String,

    /// Seconds between disk usage samples.
    pub disk_interval_secs: u64,

    /// Path whose filesystem is sampled. Defaults to the working directory.
    pub disk_path: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9000".to_string(),
            disk_interval_secs: 60,
            disk_path: None,
        }
    }
}
