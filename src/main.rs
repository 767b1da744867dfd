//! fib-fanout: computes a Fibonacci-like sequence by calling itself over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /fib?i=n            ┌────────┐   ┌────────┐   ┌────────┐
//!   (traceparent, baggage) ─▶│  http  │──▶│ params │──▶│ engine │
//!                           └────────┘   └────────┘   └───┬────┘
//!                                                  ┌──────┴──────┐
//!                                                  ▼             ▼
//!                                           ┌────────────┐ ┌────────────┐
//!                                           │ dispatcher │ │ dispatcher │
//!                                           │  i = n-1   │ │  i = n-2   │
//!                                           └─────┬──────┘ └─────┬──────┘
//!                                                 │  GET /fib?i=…│ (this same service)
//!                                                 ▼              ▼
//!   ◀──────────────────────────────────────  aggregate → response
//!
//!   Cross-cutting: config, observability (trace sinks, propagation,
//!   Prometheus, disk gauges), lifecycle (startup, /quitquitquit exit)
//! ```

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fib_fanout::lifecycle::run()?;
    Ok(())
}
