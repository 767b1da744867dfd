//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, latency, child call outcomes)
//! - Hold the disk gauge handles used by the sampler
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `fib_requests_total` (counter): requests by response status
//! - `fib_request_duration_seconds` (histogram): handler latency
//! - `fib_child_calls_total` (counter): loopback calls by outcome
//! - `glitch_disk_usage` (gauge): bytes used on the sampled filesystem
//! - `glitch_disk_quota` (gauge): bytes available in total
//!
//! # Design Decisions
//! - The recorder must be installed before gauge handles are created;
//!   handles bind to whichever recorder is live at creation time
//! - Gauges carry fixed `application` and `container` labels

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram, Gauge, Label};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::config::ServiceConfig;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(address = %addr, "Prometheus metrics endpoint listening");
    Ok(())
}

/// Record a completed `/fib` request.
pub fn record_request(status: u16, start: Instant) {
    counter!("fib_requests_total", "status" => status.to_string()).increment(1);
    histogram!("fib_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one loopback child call.
pub fn record_child_call(outcome: &'static str) {
    counter!("fib_child_calls_total", "outcome" => outcome).increment(1);
}

/// Gauge handles for the disk reporter, labelled once at construction.
#[derive(Clone)]
pub struct DiskGauges {
    pub used: Gauge,
    pub quota: Gauge,
}

impl DiskGauges {
    pub fn new(service: &ServiceConfig) -> Self {
        let labels = vec![
            Label::new("application", service.domain.clone()),
            Label::new("container", service.container_id.clone()),
        ];
        Self {
            used: gauge!("glitch_disk_usage", labels.clone()),
            quota: gauge!("glitch_disk_quota", labels),
        }
    }
}

impl std::fmt::Debug for DiskGauges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskGauges").finish_non_exhaustive()
    }
}
