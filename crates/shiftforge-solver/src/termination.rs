//! Search termination: wall-clock budget, node limit and early stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Decides when the search must give up without a definite answer.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use shiftforge_solver::termination::SearchTermination;
///
/// // Terminate after 30 seconds or one million nodes
/// let term = SearchTermination::seconds(30).with_node_limit(1_000_000);
///
/// assert!(!term.is_terminated(Duration::from_secs(1), 10));
/// assert!(term.is_terminated(Duration::from_secs(30), 10));
/// assert!(term.is_terminated(Duration::from_secs(1), 1_000_000));
/// ```
#[derive(Debug, Clone)]
pub struct SearchTermination {
    time_limit: Duration,
    node_limit: Option<u64>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

impl SearchTermination {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            node_limit: None,
            terminate_early_flag: None,
        }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Stops the search once `flag` is set from another thread.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    pub fn is_terminated(&self, elapsed: Duration, nodes: u64) -> bool {
        elapsed >= self.time_limit
            || self.node_limit.is_some_and(|limit| nodes >= limit)
            || self
                .terminate_early_flag
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

impl Default for SearchTermination {
    fn default() -> Self {
        Self::seconds(shiftforge_config::DEFAULT_TIME_LIMIT_SECS)
    }
}
