//! Request handlers for the public endpoints.

use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use opentelemetry::trace::{Span as _, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

use crate::fib::{parse_index, ResponseWriter};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Server span for `/fib`.
pub const FIB_SPAN: &str = "fibonacci";
/// Server span for `/` and every unmatched path.
pub const ROOT_SPAN: &str = "root";

pub const ROOT_BODY: &str =
    "fib-fanout: request /fib?i=<n> to compute a term; spans go to the configured sinks.";

/// `GET /fib?i=<n>`.
pub async fn fib(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let cx = state
        .telemetry
        .propagator
        .start_server_scope(state.telemetry.tracing.tracer(), FIB_SPAN, &headers);

    let writer = match parse_index(query.as_deref()) {
        Err(e) => {
            tracing::warn!(query = ?query, error = %e, "Rejected /fib query");
            cx.span().set_status(Status::error(e.to_string()));
            ResponseWriter::rejected(&e)
        }
        Ok(index) => {
            cx.span().set_attribute(KeyValue::new("parameter", index));
            let computation = state.engine.compute(index, &cx).await;
            if !computation.is_ok() {
                cx.span().set_status(Status::error(format!(
                    "{} child call(s) failed",
                    computation.failures.len()
                )));
            }
            tracing::info!(
                index,
                value = computation.value,
                failures = computation.failures.len(),
                "Computed term"
            );
            ResponseWriter::computed(&computation)
        }
    };

    cx.span().end();
    metrics::record_request(writer.status().as_u16(), start);
    writer.into_response()
}

/// `GET /` and the fallback for unmatched paths.
pub async fn root(State(state): State<AppState>, headers: HeaderMap) -> &'static str {
    let tracer = state.telemetry.tracing.tracer();
    let cx = state
        .telemetry
        .propagator
        .start_server_scope(tracer, ROOT_SPAN, &headers);

    cx.span().add_event("annotation within span", Vec::new());
    database(tracer, &cx);
    cx.span().end();

    ROOT_BODY
}

/// Stand-in for a database round trip; only its span is observable.
fn database(tracer: &SdkTracer, parent: &Context) {
    let mut span = tracer.start_with_context("database", parent);
    span.end();
}

/// `GET /favicon.ico`.
pub async fn favicon() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 page not found\n")
}
