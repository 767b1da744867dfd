//! Trace and baggage propagation across the loopback hop.
//!
//! Every `/fib` request is an independent hop: the inbound scope is extracted
//! from headers, and every outbound child call carries the scope active at the
//! point of dispatch.
//!
//! Wire format is W3C `traceparent`/`tracestate` plus W3C `baggage`.

use axum::http::HeaderMap;
use opentelemetry::propagation::{TextMapCompositePropagator, TextMapPropagator};
use opentelemetry::trace::{SpanKind, TraceContextExt, Tracer};
use opentelemetry::Context;
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::SdkTracer;

/// Extracts inbound scopes and injects outbound ones.
#[derive(Debug)]
pub struct ContextPropagator {
    inner: TextMapCompositePropagator,
}

impl ContextPropagator {
    pub fn new() -> Self {
        Self {
            inner: TextMapCompositePropagator::new(vec![
                Box::new(BaggagePropagator::new()),
                Box::new(TraceContextPropagator::new()),
            ]),
        }
    }

    /// Read the remote parent and baggage from inbound headers.
    ///
    /// Headers without a valid `traceparent` yield a context with no span, so
    /// the next span started from it becomes a fresh root.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.inner.extract(&HeaderExtractor(headers))
    }

    /// Write the span and baggage of `cx` into outbound headers.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.inner.inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Extract the inbound scope and open a server span beneath it.
    pub fn start_server_scope(
        &self,
        tracer: &SdkTracer,
        name: &'static str,
        headers: &HeaderMap,
    ) -> Context {
        let parent = self.extract(headers);
        let span = tracer
            .span_builder(name)
            .with_kind(SpanKind::Server)
            .start_with_context(tracer, &parent);
        parent.with_span(span)
    }
}

impl Default for ContextPropagator {
    fn default() -> Self {
        Self::new()
    }
}
