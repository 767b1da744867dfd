//! Recursive fan-out engine.

use std::sync::Arc;

use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

use crate::fib::{Aggregator, ChildCallError, ChildCaller, Computation};
use crate::observability::metrics;

/// Span name for each outbound branch.
pub const CHILD_SPAN: &str = "fibClient";

/// Computes one term by fanning out to `i-1` and `i-2`.
#[derive(Clone)]
pub struct FanOutEngine {
    caller: Arc<dyn ChildCaller>,
    tracer: SdkTracer,
}

impl FanOutEngine {
    pub fn new(caller: Arc<dyn ChildCaller>, tracer: SdkTracer) -> Self {
        Self { caller, tracer }
    }

    /// Compute term `index` beneath the scope carried by `parent`.
    ///
    /// `index < 2` (negatives included) is the base case and yields 1 without
    /// any child call. Otherwise two branches run concurrently and both are
    /// awaited, whatever happens to the other. The result is recorded on the
    /// parent span.
    pub async fn compute(&self, index: i64, parent: &Context) -> Computation {
        let computation = if index < 2 {
            Computation::base(1)
        } else {
            self.fan_out(index, parent).await
        };

        parent
            .span()
            .set_attribute(KeyValue::new("result", computation.value));
        computation
    }

    async fn fan_out(&self, index: i64, parent: &Context) -> Computation {
        let aggregator = Arc::new(Aggregator::new());

        let branches: Vec<_> = [index - 1, index - 2]
            .into_iter()
            .map(|child| {
                let task = tokio::spawn(self.branch(child, parent.clone(), aggregator.clone()));
                (child, task)
            })
            .collect();

        for (child, task) in branches {
            if let Err(e) = task.await {
                tracing::error!(index = child, error = %e, "Child branch task aborted");
                aggregator.add(child, Err(ChildCallError::Aborted(e.to_string())));
            }
        }

        aggregator.finish()
    }

    /// One branch: open a child scope, call, report into the aggregate.
    fn branch(
        &self,
        child: i64,
        parent: Context,
        aggregator: Arc<Aggregator>,
    ) -> impl std::future::Future<Output = ()> + Send + 'static {
        let caller = self.caller.clone();
        let tracer = self.tracer.clone();

        async move {
            let span = tracer
                .span_builder(CHILD_SPAN)
                .with_kind(SpanKind::Client)
                .start_with_context(&tracer, &parent);
            let cx = parent.with_span(span);

            let outcome = caller.call(child, &cx).await;
            match &outcome {
                Ok(value) => {
                    tracing::debug!(index = child, value, "Child call succeeded");
                    metrics::record_child_call("ok");
                }
                Err(e) => {
                    tracing::warn!(index = child, error = %e, "Child call failed");
                    cx.span().set_status(Status::error(e.to_string()));
                    metrics::record_child_call(e.kind());
                }
            }
            cx.span().end();

            aggregator.add(child, outcome);
        }
    }
}

impl std::fmt::Debug for FanOutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutEngine").finish_non_exhaustive()
    }
}
