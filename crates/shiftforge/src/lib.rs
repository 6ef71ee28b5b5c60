//! ShiftForge - shift planning with a constraint model
//!
//! Assigns employees to shift templates over a planning horizon so that
//! contracted hours, shift-sequence rules and role coverage hold at once,
//! then renders the result as a schedule grid.
//!
//! # Example
//!
//! ```rust
//! use shiftforge::prelude::*;
//!
//! let horizon = Horizon::parse("2025-03-10", "2025-03-16").unwrap();
//! assert_eq!(horizon.len(), 7);
//!
//! let bound = HourBound::from_contract(40.0, horizon.len(), 0.1);
//! assert_eq!((bound.min(), bound.max()), (36, 44));
//! ```

mod planner;

pub use planner::{PlanOutcome, Planner};

// Domain types
pub use shiftforge_core::{
    Assignment, CoverageRequirement, Employee, EmployeeFlags, Horizon, HourBound, PlanError, RoleTag,
    SequenceRule, SequenceRuleTable, ShiftCatalog, ShiftStart, Slot, ValidationError,
};

// Configuration
pub use shiftforge_config::{ConfigError, PlannerConfig, RestTransitions, Strategy};

// Solver building blocks
pub use shiftforge_solver::{
    verify, CountingListener, LoggingListener, PlanningListener, SolveStatus, Violation,
};

// Rendering
pub use shiftforge_render::{CsvWriter, ScheduleGrid, TableView};

/// Colored console output.
#[cfg(feature = "console")]
pub use shiftforge_console as console;

pub mod prelude {
    pub use super::{
        CoverageRequirement, Employee, EmployeeFlags, Horizon, HourBound, PlanError, PlanOutcome,
        Planner, PlannerConfig, RoleTag, SequenceRule, SequenceRuleTable, SolveStatus, Strategy,
    };
    pub use super::{CsvWriter, ScheduleGrid, TableView};
}
