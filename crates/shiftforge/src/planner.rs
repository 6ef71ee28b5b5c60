//! Planning pipeline: horizon and roster in, rendered schedule out.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use shiftforge_config::{PlannerConfig, Strategy};
use shiftforge_core::domain::validate_roster;
use shiftforge_core::{Assignment, Employee, Horizon, PlanError, SequenceRuleTable};
use shiftforge_render::ScheduleGrid;
use shiftforge_solver::{
    verify, GreedyAllocator, ModelSettings, ModelStats, PlanInstance, PlanningListener, SearchStats,
    ShiftModel, SolveStatus, SolverDriver, Violation,
};
use tracing::{info, warn};

/// Result of one successful planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub strategy: Strategy,
    pub status: SolveStatus,
    pub assignment: Assignment,
    pub grid: ScheduleGrid,
    /// Broken invariants; only the greedy strategy can produce any.
    pub violations: Vec<Violation>,
    pub elapsed: Duration,
    /// Model size, for the constraint strategy.
    pub model_stats: Option<ModelStats>,
    /// Search effort, for the constraint strategy.
    pub search_stats: Option<SearchStats>,
}

impl PlanOutcome {
    /// Whether the schedule satisfies every invariant.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Runs Horizon -> Model -> Solver -> Renderer for one configuration.
///
/// A planner holds no state between runs, so one instance may plan several
/// horizons concurrently.
///
/// # Examples
///
/// ```
/// use shiftforge::prelude::*;
///
/// let employees = vec![Employee::new("001", 24.0)];
/// let horizon = Horizon::parse("2025-03-10", "2025-03-16").unwrap();
/// let config = PlannerConfig::default().with_coverage(Vec::new());
///
/// let outcome = Planner::new(config).unwrap()
///     .plan(&employees, &horizon, &SequenceRuleTable::new())
///     .unwrap();
/// assert!(outcome.status.has_solution());
/// assert_eq!(outcome.grid.rows().len(), 1);
/// ```
#[derive(Clone)]
pub struct Planner {
    config: PlannerConfig,
    settings: ModelSettings,
    listeners: Vec<Arc<dyn PlanningListener>>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

impl Planner {
    /// Creates a planner after validating `config`.
    pub fn new(config: PlannerConfig) -> Result<Self, PlanError> {
        let settings = ModelSettings::from_config(&config).map_err(|e| PlanError::Config(e.to_string()))?;
        Ok(Self {
            config,
            settings,
            listeners: Vec::new(),
            terminate_early_flag: None,
        })
    }

    pub fn with_listener(mut self, listener: Arc<dyn PlanningListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Stops a running constraint solve from another thread.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    /// Parses both dates, then plans the horizon between them.
    pub fn plan_dates(
        &self,
        employees: &[Employee],
        start: &str,
        end: &str,
        rules: &SequenceRuleTable,
    ) -> Result<PlanOutcome, PlanError> {
        let horizon = Horizon::parse(start, end)?;
        self.plan(employees, &horizon, rules)
    }

    /// Plans `horizon` with the configured strategy.
    ///
    /// # Errors
    ///
    /// - `PlanError::Validation` for an unusable roster, before any model is built
    /// - `PlanError::Infeasible` when no schedule satisfies the rules
    /// - `PlanError::Timeout` when the budget ran out without an answer
    pub fn plan(
        &self,
        employees: &[Employee],
        horizon: &Horizon,
        rules: &SequenceRuleTable,
    ) -> Result<PlanOutcome, PlanError> {
        self.plan_labeled(employees, horizon, rules, "")
    }

    /// Plans every horizon independently, in parallel.
    ///
    /// Results come back in the order of `horizons`.
    pub fn plan_many(
        &self,
        employees: &[Employee],
        horizons: &[Horizon],
        rules: &SequenceRuleTable,
    ) -> Vec<Result<PlanOutcome, PlanError>> {
        horizons
            .par_iter()
            .map(|horizon| {
                let label = format!("{}..{}", horizon.start(), horizon.end());
                self.plan_labeled(employees, horizon, rules, &label)
            })
            .collect()
    }

    fn plan_labeled(
        &self,
        employees: &[Employee],
        horizon: &Horizon,
        rules: &SequenceRuleTable,
        label: &str,
    ) -> Result<PlanOutcome, PlanError> {
        validate_roster(employees)?;
        let strategy = self.config.strategy;
        info!(
            event = "plan_start",
            label,
            employees = employees.len() as u64,
            days = horizon.len() as u64,
            strategy = %strategy,
        );

        let started = Instant::now();
        let instance = PlanInstance::new(employees, horizon, rules);
        let outcome = match strategy {
            Strategy::Constraint => self.solve(&instance),
            Strategy::Greedy => self.allocate(&instance),
        };
        let mut outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(event = "plan_end", label, status = %failure_status(&e), "{e}");
                return Err(e);
            }
        };
        outcome.elapsed = started.elapsed();

        info!(
            event = "plan_end",
            label,
            status = %outcome.status,
            violations = outcome.violations.len() as u64,
        );
        Ok(outcome)
    }

    fn solve(&self, instance: &PlanInstance<'_>) -> Result<PlanOutcome, PlanError> {
        let model = ShiftModel::build(instance, &self.settings);
        let mut driver = SolverDriver::from_config(&self.config);
        for listener in &self.listeners {
            driver = driver.with_listener(Arc::clone(listener));
        }
        if let Some(flag) = &self.terminate_early_flag {
            driver = driver.with_terminate_early_flag(Arc::clone(flag));
        }

        let result = driver.solve(&model);
        let status = result.status;
        let search_stats = result.stats.clone();
        let assignment = result.into_assignment(instance.horizon)?;

        let violations = verify(instance, &self.settings, &assignment);
        if !violations.is_empty() {
            warn!(count = violations.len(), "Solved schedule breaks invariants");
        }
        self.finish(instance, assignment, status, violations)
            .map(|outcome| PlanOutcome {
                model_stats: Some(model.stats()),
                search_stats: Some(search_stats),
                ..outcome
            })
    }

    fn allocate(&self, instance: &PlanInstance<'_>) -> Result<PlanOutcome, PlanError> {
        let started = Instant::now();
        let allocator = GreedyAllocator::from_config(&self.config).map_err(|e| PlanError::Config(e.to_string()))?;
        let assignment = allocator.allocate(instance);
        let violations = verify(instance, &self.settings, &assignment);
        for violation in &violations {
            warn!(%violation, "Greedy schedule breaks an invariant");
        }

        let status = SolveStatus::Feasible;
        for listener in &self.listeners {
            listener.on_status_received(status, started.elapsed());
        }
        self.finish(instance, assignment, status, violations)
    }

    fn finish(
        &self,
        instance: &PlanInstance<'_>,
        assignment: Assignment,
        status: SolveStatus,
        violations: Vec<Violation>,
    ) -> Result<PlanOutcome, PlanError> {
        let grid = ScheduleGrid::render(
            instance.employees,
            instance.horizon,
            &self.settings.catalog,
            &assignment,
            &self.config.coverage_role,
        )
        .map_err(|e| PlanError::Render(e.to_string()))?;

        Ok(PlanOutcome {
            strategy: self.config.strategy,
            status,
            assignment,
            grid,
            violations,
            elapsed: Duration::ZERO,
            model_stats: None,
            search_stats: None,
        })
    }
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("strategy", &self.config.strategy)
            .field("time_limit", &self.config.time_limit())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            config: PlannerConfig::default(),
            settings: ModelSettings::default(),
            listeners: Vec::new(),
            terminate_early_flag: None,
        }
    }
}

fn failure_status(error: &PlanError) -> &'static str {
    match error {
        PlanError::Infeasible { .. } => "infeasible",
        PlanError::Timeout { .. } => "unknown",
        _ => "error",
    }
}
