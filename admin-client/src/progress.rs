//! Process-wide progress indicator
//!
//! Active from the start of the first outstanding request until the last one
//! completes. Requests hold a [`ProgressGuard`]; dropping it marks the request
//! done, so errors and early returns cannot leave the indicator spinning.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared counter of outstanding requests
#[derive(Debug, Clone, Default)]
pub struct ProgressIndicator {
    in_flight: Arc<AtomicUsize>,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a request as started
    pub fn start(&self) -> ProgressGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            tracing::trace!("Progress started");
        }
        ProgressGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Whether any request is outstanding
    pub fn is_active(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Marks one request as finished when dropped
#[must_use = "dropping the guard immediately ends the progress span"]
#[derive(Debug)]
pub struct ProgressGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            tracing::trace!("Progress done");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_guards() {
        let progress = ProgressIndicator::new();
        assert!(!progress.is_active());

        let first = progress.start();
        let second = progress.clone().start();
        assert_eq!(progress.in_flight(), 2);

        drop(first);
        assert!(progress.is_active());
        drop(second);
        assert!(!progress.is_active());
    }
}
