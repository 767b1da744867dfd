//! Per-request aggregation of child outcomes.
//!
//! Shared by the two sibling branches of one parent request. Every mutation
//! happens under a single mutex. Failures are only ever appended, so once the
//! record is non-empty it stays that way.

use std::sync::{Mutex, PoisonError};

use crate::fib::{ChildCallOutcome, ChildFailure, Computation};

#[derive(Debug, Default)]
struct AggregateState {
    sum: i64,
    failures: Vec<ChildFailure>,
}

/// Running sum plus failure record for one parent request.
#[derive(Debug, Default)]
pub struct Aggregator {
    state: Mutex<AggregateState>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one child outcome in. Called once per child, from either branch.
    pub fn add(&self, index: i64, outcome: ChildCallOutcome) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match outcome {
            Ok(value) => state.sum = state.sum.wrapping_add(value),
            Err(error) => state.failures.push(ChildFailure { index, error }),
        }
    }

    /// Take the result once every branch has reported.
    pub fn finish(&self) -> Computation {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = std::mem::take(&mut *state);
        Computation {
            value: state.sum,
            failures: state.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fib::ChildCallError;
    use std::sync::Arc;

    #[test]
    fn sums_successes() {
        let agg = Aggregator::new();
        agg.add(4, Ok(5));
        agg.add(3, Ok(3));

        let result = agg.finish();
        assert_eq!(result.value, 8);
        assert!(result.is_ok());
    }

    #[test]
    fn failure_keeps_sibling_contribution() {
        let agg = Aggregator::new();
        agg.add(2, Err(ChildCallError::Aborted("boom".into())));
        agg.add(1, Ok(1));

        let result = agg.finish();
        assert_eq!(result.value, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 2);
    }

    #[test]
    fn later_successes_keep_the_failure() {
        let agg = Aggregator::new();
        agg.add(3, Err(ChildCallError::Aborted("boom".into())));
        agg.add(2, Ok(2));
        agg.add(2, Ok(2));

        let result = agg.finish();
        assert!(!result.is_ok());
        assert_eq!(result.value, 4);
    }

    #[test]
    fn concurrent_adds_lose_nothing() {
        let agg = Arc::new(Aggregator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let agg = agg.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        agg.add(0, Ok(1));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(agg.finish().value, 8000);
    }
}
