//! Planner configuration fixtures.

use std::time::Duration;

use shiftforge_config::PlannerConfig;

/// Default configuration with a 10 second budget.
pub fn fast_config() -> PlannerConfig {
    PlannerConfig::new().with_time_limit(Duration::from_secs(10))
}

/// Configuration without coverage requirements, for single-employee runs.
pub fn uncovered_config() -> PlannerConfig {
    fast_config().with_coverage(Vec::new())
}
