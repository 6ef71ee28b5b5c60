//! Model and search statistics.

use std::time::{Duration, Instant};

/// Size of a built shift model.
///
/// # Example
///
/// ```
/// use shiftforge_solver::stats::ModelStats;
///
/// let stats = ModelStats {
///     employees: 2,
///     days: 7,
///     templates: 7,
///     ..ModelStats::default()
/// };
/// assert_eq!(stats.assignment_variables(), 98);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
    pub employees: usize,
    pub days: usize,
    pub templates: usize,
    /// All variables, assignment and worked-day.
    pub variables: usize,
    pub linear_constraints: usize,
    pub clauses: usize,
    /// Literals fixed before search by employee flags.
    pub fixed_literals: usize,
}

impl ModelStats {
    pub fn assignment_variables(&self) -> usize {
        self.employees * self.days * self.templates
    }

    pub fn constraints(&self) -> usize {
        self.linear_constraints + self.clauses
    }
}

/// Counters of one search run.
///
/// # Example
///
/// ```
/// use shiftforge_solver::stats::SearchStats;
///
/// let mut stats = SearchStats::default();
/// stats.start();
/// stats.record_node(3);
/// stats.record_node(4);
/// stats.record_conflict();
/// stats.record_learned();
/// stats.record_backtrack();
///
/// assert_eq!(stats.nodes, 2);
/// assert_eq!(stats.max_depth, 4);
/// assert_eq!(stats.conflicts, 1);
/// assert_eq!(stats.backtracks, 1);
/// assert_eq!(stats.learned, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    start_time: Option<Instant>,
    /// Branching decisions taken.
    pub nodes: u64,
    /// Jumps back after a conflict.
    pub backtracks: u64,
    /// Constraint violations detected by propagation.
    pub conflicts: u64,
    /// Nogoods learned from conflicts, units included.
    pub learned: u64,
    pub restarts: u64,
    /// Variable assignments, decided or implied.
    pub propagations: u64,
    /// Deepest decision stack reached.
    pub max_depth: usize,
}

impl SearchStats {
    /// Marks the start of the search.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Returns the elapsed time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_node(&mut self, depth: usize) {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    pub fn record_backtrack(&mut self) {
        self.backtracks += 1;
    }

    pub fn record_conflict(&mut self) {
        self.conflicts += 1;
    }

    pub fn record_learned(&mut self) {
        self.learned += 1;
    }

    pub fn record_restart(&mut self) {
        self.restarts += 1;
    }

    pub fn record_propagation(&mut self) {
        self.propagations += 1;
    }

    /// Returns the node rate.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        }
    }
}
