//! Planning event hooks.
//!
//! Listeners are notified at three well-defined points of a constraint
//! run:
//!
//! - **Model built**: the model and its size are known
//! - **Solve started**: the search begins with its time budget
//! - **Status received**: the search returned a status
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use shiftforge_solver::event::{CountingListener, PlanningEventSupport};
//!
//! let counter = Arc::new(CountingListener::new());
//! let mut support = PlanningEventSupport::new();
//! support.add_listener(counter.clone());
//! assert_eq!(support.listener_count(), 1);
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::driver::SolveStatus;
use crate::stats::ModelStats;

/// Listener for planning lifecycle events.
pub trait PlanningListener: Send + Sync + Debug {
    /// Called once the model is fully constrained.
    fn on_model_built(&self, _stats: &ModelStats) {}

    /// Called right before the search starts.
    fn on_solve_started(&self, _budget: Duration) {}

    /// Called with the normalized status and the time spent solving.
    fn on_status_received(&self, _status: SolveStatus, _elapsed: Duration) {}
}

/// Broadcasts planning events to listeners in registration order.
#[derive(Default)]
pub struct PlanningEventSupport {
    listeners: Vec<Arc<dyn PlanningListener>>,
}

impl PlanningEventSupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn PlanningListener>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn fire_model_built(&self, stats: &ModelStats) {
        for listener in &self.listeners {
            listener.on_model_built(stats);
        }
    }

    pub fn fire_solve_started(&self, budget: Duration) {
        for listener in &self.listeners {
            listener.on_solve_started(budget);
        }
    }

    pub fn fire_status_received(&self, status: SolveStatus, elapsed: Duration) {
        for listener in &self.listeners {
            listener.on_status_received(status, elapsed);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl Clone for PlanningEventSupport {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl Debug for PlanningEventSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanningEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Emits every planning event as a `tracing` event.
#[derive(Debug, Clone, Default)]
pub struct LoggingListener {
    label: String,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a listener that tags every event with `label`.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl PlanningListener for LoggingListener {
    fn on_model_built(&self, stats: &ModelStats) {
        info!(
            event = "model_built",
            label = %self.label,
            variables = stats.variables,
            constraints = stats.constraints(),
            fixed = stats.fixed_literals,
        );
    }

    fn on_solve_started(&self, budget: Duration) {
        info!(
            event = "solve_started",
            label = %self.label,
            budget_ms = budget.as_millis() as u64,
        );
    }

    fn on_status_received(&self, status: SolveStatus, elapsed: Duration) {
        info!(
            event = "status_received",
            label = %self.label,
            status = %status,
            elapsed_ms = elapsed.as_millis() as u64,
        );
    }
}

/// Counts events; useful in tests.
#[derive(Debug, Default)]
pub struct CountingListener {
    model_built_count: AtomicUsize,
    solve_started_count: AtomicUsize,
    status_received_count: AtomicUsize,
}

impl CountingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_built_count(&self) -> usize {
        self.model_built_count.load(Ordering::SeqCst)
    }

    pub fn solve_started_count(&self) -> usize {
        self.solve_started_count.load(Ordering::SeqCst)
    }

    pub fn status_received_count(&self) -> usize {
        self.status_received_count.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.model_built_count.store(0, Ordering::SeqCst);
        self.solve_started_count.store(0, Ordering::SeqCst);
        self.status_received_count.store(0, Ordering::SeqCst);
    }
}

impl PlanningListener for CountingListener {
    fn on_model_built(&self, _stats: &ModelStats) {
        self.model_built_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solve_started(&self, _budget: Duration) {
        self.solve_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_status_received(&self, _status: SolveStatus, _elapsed: Duration) {
        self.status_received_count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
