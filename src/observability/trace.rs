//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the tracer provider and register the configured span sinks
//! - Hand out the tracer used by the request path
//! - Copy inbound baggage onto every span
//!
//! # Sinks
//! - stdout: pretty-printed spans, simple (synchronous) processor
//! - Honeycomb: OTLP/HTTP with team/dataset headers, batch processor
//! - collector: OTLP/HTTP to `JAEGER_ENDPOINT`, batch processor
//!
//! # Design Decisions
//! - Built before the async runtime starts: the OTLP exporters use a
//!   blocking HTTP client driven from the batch processor's own thread
//! - Sink initialization failures are fatal at startup

use std::collections::HashMap;
use std::time::Duration;

use opentelemetry::baggage::BaggageExt;
use opentelemetry::trace::{Span as _, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider, SpanData, SpanProcessor};
use opentelemetry_sdk::Resource;
use thiserror::Error;

use crate::config::AppConfig;

/// Instrumentation scope name for every span this service creates.
pub const TRACER_NAME: &str = "fib-fanout";

/// Errors raised while wiring up telemetry sinks.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build {sink} span exporter: {source}")]
    Exporter {
        sink: &'static str,
        #[source]
        source: opentelemetry_otlp::ExporterBuildError,
    },

    #[error("failed to install Prometheus exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Tracer provider plus the tracer handed to request handlers.
#[derive(Clone, Debug)]
pub struct Tracing {
    provider: SdkTracerProvider,
    tracer: SdkTracer,
}

impl Tracing {
    /// Build the provider with every sink the configuration enables.
    pub fn init(config: &AppConfig) -> Result<Self, TelemetryError> {
        let resource = Resource::builder()
            .with_service_name(config.service.name.clone())
            .build();

        let mut builder = SdkTracerProvider::builder()
            .with_resource(resource)
            .with_span_processor(BaggageSpanProcessor);

        if config.exporters.stdout {
            builder = builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default());
        }

        if let Some(api_key) = &config.exporters.honeycomb_api_key {
            let mut headers = HashMap::new();
            headers.insert("x-honeycomb-team".to_string(), api_key.clone());
            if let Some(dataset) = &config.exporters.honeycomb_dataset {
                headers.insert("x-honeycomb-dataset".to_string(), dataset.clone());
            }
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_endpoint(config.exporters.honeycomb_endpoint.clone())
                .with_headers(headers)
                .build()
                .map_err(|source| TelemetryError::Exporter { sink: "honeycomb", source })?;
            builder = builder.with_batch_exporter(exporter);
            tracing::info!(endpoint = %config.exporters.honeycomb_endpoint, "Honeycomb span sink registered");
        }

        if let Some(endpoint) = &config.exporters.collector_endpoint {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_endpoint(endpoint.clone())
                .build()
                .map_err(|source| TelemetryError::Exporter { sink: "collector", source })?;
            builder = builder.with_batch_exporter(exporter);
            tracing::info!(endpoint = %endpoint, "Collector span sink registered");
        }

        Ok(Self::from_provider(builder.build()))
    }

    /// Wrap an already-built provider.
    pub fn from_provider(provider: SdkTracerProvider) -> Self {
        let tracer = provider.tracer(TRACER_NAME);
        Self { provider, tracer }
    }

    pub fn tracer(&self) -> &SdkTracer {
        &self.tracer
    }

    /// Flush and stop every sink. Errors are logged, not returned.
    pub fn shutdown(&self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
    }
}

/// Adds every baggage entry of the parent context to the span as an attribute.
#[derive(Debug)]
pub struct BaggageSpanProcessor;

impl SpanProcessor for BaggageSpanProcessor {
    fn on_start(&self, span: &mut opentelemetry_sdk::trace::Span, cx: &Context) {
        for (key, value) in cx.baggage().iter() {
            span.set_attribute(KeyValue::new(key.clone(), value.0.clone()));
        }
    }

    fn on_end(&self, _span: SpanData) {}

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> OTelSdkResult {
        Ok(())
    }
}
