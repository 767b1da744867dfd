//! Loopback child calls to this service's own `/fib` endpoint.
//!
//! # Design Decisions
//! - One attempt per call; no retry
//! - No timeout: a stalled child stalls its branch and the parent's join
//! - The response status is not inspected; only the body is parsed, so a
//!   failed child (503 with error text) surfaces as a malformed response

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use opentelemetry::trace::{Status, TraceContextExt};
use opentelemetry::{Context, KeyValue};
use url::Url;

use crate::fib::params::INDEX_PARAM;
use crate::fib::{ChildCallError, ChildCallOutcome, ChildCaller};
use crate::observability::ContextPropagator;

/// Issues `GET <self_url>/fib?i=<n>` with the active scope injected.
#[derive(Debug, Clone)]
pub struct HttpChildCaller {
    client: reqwest::Client,
    base: Url,
    propagator: Arc<ContextPropagator>,
}

impl HttpChildCaller {
    pub fn new(base: Url, propagator: Arc<ContextPropagator>) -> Result<Self, reqwest::Error> {
        // Loopback target: never route through an environment proxy.
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            client,
            base,
            propagator,
        })
    }

    /// URL of the child computation for `index`. Negative indices are passed unmodified.
    pub fn child_url(&self, index: i64) -> Result<Url, url::ParseError> {
        let mut url = self.base.join("/fib")?;
        url.query_pairs_mut()
            .clear()
            .append_pair(INDEX_PARAM, &index.to_string());
        Ok(url)
    }
}

#[async_trait]
impl ChildCaller for HttpChildCaller {
    async fn call(&self, index: i64, cx: &Context) -> ChildCallOutcome {
        let url = self.child_url(index)?;
        cx.span().set_attribute(KeyValue::new("url", url.to_string()));

        let mut headers = HeaderMap::new();
        self.propagator.inject(cx, &mut headers);

        tracing::debug!(index, url = %url, "Dispatching child call");
        let response = self.client.get(url).headers(headers).send().await?;
        let body = response.text().await?;
        let value = body
            .parse::<i64>()
            .map_err(|source| ChildCallError::MalformedResponse { body, source })?;

        cx.span().set_status(Status::Ok);
        cx.span().set_attribute(KeyValue::new("result", value));
        Ok(value)
    }
}
