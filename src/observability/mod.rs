//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request path and background tasks produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms, disk gauges)
//!     → trace.rs (spans, handed to the configured sinks)
//!     → propagation.rs (trace + baggage across the loopback hop)
//!
//! Background:
//!     → disk.rs (samples filesystem usage into the disk gauges)
//! ```
//!
//! # Design Decisions
//! - One `Telemetry` value is built at startup and cloned into the handlers
//!   and the disk sampler; nothing here is process-global except the
//!   log subscriber and the metrics recorder
//! - Request ID flows through all log lines via the tower-http trace span

pub mod disk;
pub mod logging;
pub mod metrics;
pub mod propagation;
pub mod trace;

use std::sync::Arc;

use crate::config::ServiceConfig;

pub use self::disk::{DiskSampler, GaugeSample};
pub use self::metrics::DiskGauges;
pub use self::propagation::ContextPropagator;
pub use self::trace::{TelemetryError, Tracing};

/// Telemetry handles shared by the request path and the disk sampler.
#[derive(Clone, Debug)]
pub struct Telemetry {
    pub tracing: Tracing,
    pub propagator: Arc<ContextPropagator>,
    pub gauges: DiskGauges,
}

impl Telemetry {
    pub fn new(tracing: Tracing, service: &ServiceConfig) -> Self {
        Self {
            tracing,
            propagator: Arc::new(ContextPropagator::new()),
            gauges: DiskGauges::new(service),
        }
    }
}
