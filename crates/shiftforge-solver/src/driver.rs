//! Solver Driver: runs the search on a built model within a time budget
//! and normalizes the outcome.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shiftforge_config::PlannerConfig;
use shiftforge_core::{Assignment, Horizon, PlanError};
use tracing::info;

use crate::builder::ShiftModel;
use crate::event::{PlanningEventSupport, PlanningListener};
use crate::search::{Search, SearchOutcome};
use crate::stats::SearchStats;
use crate::termination::SearchTermination;

/// Normalized status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// A solution was found. For a satisfaction model every solution is
    /// optimal.
    Optimal,
    /// A solution was found without proof of optimality.
    Feasible,
    /// No solution exists.
    Infeasible,
    /// The budget ran out before either answer.
    Unknown,
}

impl SolveStatus {
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Feasible => write!(f, "feasible"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// What a solve produced. The assignment is present exactly when the
/// status has a solution.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub assignment: Option<Assignment>,
    pub stats: SearchStats,
    pub elapsed: Duration,
    pub budget: Duration,
}

impl SolveResult {
    /// Converts the result into the solved assignment or a descriptive error.
    pub fn into_assignment(self, horizon: &Horizon) -> Result<Assignment, PlanError> {
        match (self.status, self.assignment) {
            (status, Some(assignment)) if status.has_solution() => Ok(assignment),
            (SolveStatus::Infeasible, _) => Err(PlanError::Infeasible {
                start: horizon.start(),
                end: horizon.end(),
            }),
            _ => Err(PlanError::Timeout {
                budget: self.budget,
            }),
        }
    }
}

/// Invokes the search with a bounded budget.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use shiftforge_solver::builder::{ModelSettings, PlanInstance, ShiftModel};
/// use shiftforge_solver::driver::{SolveStatus, SolverDriver};
/// use shiftforge_core::{Employee, Horizon, SequenceRuleTable};
///
/// let employees = vec![Employee::new("001", 32.0)];
/// let horizon = Horizon::parse("2025-03-10", "2025-03-16").unwrap();
/// let rules = SequenceRuleTable::new();
/// let settings = ModelSettings::default().with_coverage(Vec::new());
///
/// let model = ShiftModel::build(&PlanInstance::new(&employees, &horizon, &rules), &settings);
/// let result = SolverDriver::new(Duration::from_secs(5)).solve(&model);
/// assert_eq!(result.status, SolveStatus::Optimal);
/// ```
#[derive(Debug, Clone)]
pub struct SolverDriver {
    termination: SearchTermination,
    random_seed: Option<u64>,
    events: PlanningEventSupport,
}

impl SolverDriver {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            termination: SearchTermination::new(time_limit),
            random_seed: None,
            events: PlanningEventSupport::new(),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        let mut termination = SearchTermination::new(config.time_limit());
        if let Some(nodes) = config.termination.node_limit {
            termination = termination.with_node_limit(nodes);
        }
        Self {
            termination,
            random_seed: config.random_seed,
            events: PlanningEventSupport::new(),
        }
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.termination = self.termination.with_node_limit(nodes);
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn PlanningListener>) -> Self {
        self.events.add_listener(listener);
        self
    }

    /// Stops a running solve from another thread; reported as `Unknown`.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.termination = self.termination.with_terminate_early_flag(flag);
        self
    }

    pub fn time_limit(&self) -> Duration {
        self.termination.time_limit()
    }

    pub fn events(&self) -> &PlanningEventSupport {
        &self.events
    }

    /// Solves `model`, blocking for at most the time budget.
    pub fn solve(&self, model: &ShiftModel) -> SolveResult {
        let budget = self.termination.time_limit();
        self.events.fire_model_built(&model.stats());
        self.events.fire_solve_started(budget);
        info!(budget_ms = budget.as_millis() as u64, seed = ?self.random_seed, "Solve started");

        let started = Instant::now();
        let order = model.branching_order(self.random_seed);
        let mut search =
            Search::new(model.model(), self.termination.clone()).with_phases(model.phase_hints());
        let outcome = search.run(&order);
        let elapsed = started.elapsed();

        let (status, assignment) = match outcome {
            SearchOutcome::Solved(values) => (SolveStatus::Optimal, Some(model.extract(&values))),
            SearchOutcome::Exhausted => (SolveStatus::Infeasible, None),
            SearchOutcome::Terminated => (SolveStatus::Unknown, None),
        };
        let stats = search.stats().clone();

        info!(
            status = %status,
            elapsed_ms = elapsed.as_millis() as u64,
            nodes = stats.nodes,
            conflicts = stats.conflicts,
            learned = stats.learned,
            restarts = stats.restarts,
            "Status received"
        );
        self.events.fire_status_received(status, elapsed);

        SolveResult {
            status,
            assignment,
            stats,
            elapsed,
            budget,
        }
    }
}

impl Default for SolverDriver {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

#[cfg(test)]
mod tests;
