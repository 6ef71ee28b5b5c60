//! Error types for ShiftForge

use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

/// Input validation failure. Raised before any model is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The horizon end precedes its start.
    #[error("Invalid range: end date {end} precedes start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    /// The shift catalog is empty or inconsistent.
    #[error("Invalid shift catalog: {0}")]
    InvalidCatalog(String),

    /// An employee record is unusable.
    #[error("Invalid employee: {0}")]
    InvalidEmployee(String),
}

/// Main error type for a planning run.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Input rejected before model construction
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The solver proved that no schedule satisfies the rules
    #[error("No schedule possible for {start}..={end} with the current rule set")]
    Infeasible { start: NaiveDate, end: NaiveDate },

    /// The time budget ran out before feasibility or infeasibility was proven
    #[error("Solver gave up after {budget:?} without a definite answer")]
    Timeout { budget: Duration },

    /// Error in planner configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The solved assignment could not be rendered
    #[error("Rendering failed: {0}")]
    Render(String),
}

impl PlanError {
    /// Returns true if retrying with a relaxed tolerance may help.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, PlanError::Infeasible { .. })
    }

    /// Returns true if retrying with a larger time budget may help.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PlanError::Timeout { .. })
    }
}

/// Result type alias for ShiftForge operations
pub type Result<T> = std::result::Result<T, PlanError>;
