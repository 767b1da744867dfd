//! Recursive fan-out over the network.
//!
//! # Data Flow
//! ```text
//! GET /fib?i=n
//!     → params.rs (exactly one integer `i`, else 503)
//!     → engine.rs (i < 2 → 1; else spawn two branches)
//!         → dispatcher.rs (GET /fib?i=n-1 and /fib?i=n-2 on ourselves,
//!                          trace context injected into each)
//!         → aggregate.rs (mutex-guarded sum + failure record)
//!     → response.rs (sum, or 503 with one line per failed branch)
//! ```
//!
//! # Design Decisions
//! - Recursion is only ever a loopback HTTP call, never an in-process call
//! - Both branches always run to completion; no cancellation, no retry,
//!   no timeout on the child call
//! - The sequence is f(0)=1, f(1)=1, f(n)=f(n-1)+f(n-2)

pub mod aggregate;
pub mod dispatcher;
pub mod engine;
pub mod params;
pub mod response;

use std::num::ParseIntError;

use async_trait::async_trait;
use opentelemetry::Context;
use thiserror::Error;

pub use aggregate::Aggregator;
pub use dispatcher::HttpChildCaller;
pub use engine::FanOutEngine;
pub use params::{parse_index, ParamError};
pub use response::ResponseWriter;

/// Why one child call produced no number.
#[derive(Debug, Error)]
pub enum ChildCallError {
    #[error("could not build child url: {0}")]
    MalformedParameter(#[from] url::ParseError),

    #[error("child request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("child returned non-numeric body {body:?}: {source}")]
    MalformedResponse {
        body: String,
        #[source]
        source: ParseIntError,
    },

    /// The branch task panicked or was cancelled before reporting.
    #[error("child task aborted: {0}")]
    Aborted(String),
}

impl ChildCallError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ChildCallError::MalformedParameter(_) => "malformed_parameter",
            ChildCallError::Network(_) => "network_error",
            ChildCallError::MalformedResponse { .. } => "malformed_response",
            ChildCallError::Aborted(_) => "aborted",
        }
    }
}

/// Result of one loopback call.
pub type ChildCallOutcome = Result<i64, ChildCallError>;

/// A failed branch and the index it was computing.
#[derive(Debug)]
pub struct ChildFailure {
    pub index: i64,
    pub error: ChildCallError,
}

/// Final state of one fan-out: the (possibly partial) sum and any failures,
/// in the order the failing branches reported.
#[derive(Debug)]
pub struct Computation {
    pub value: i64,
    pub failures: Vec<ChildFailure>,
}

impl Computation {
    pub fn base(value: i64) -> Self {
        Self {
            value,
            failures: Vec::new(),
        }
    }

    /// True unless at least one branch failed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Performs one child computation for `index` beneath the scope in `cx`.
#[async_trait]
pub trait ChildCaller: Send + Sync {
    async fn call(&self, index: i64, cx: &Context) -> ChildCallOutcome;
}
