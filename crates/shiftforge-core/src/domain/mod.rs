//! Domain model for shift planning
//!
//! - `Employee`: who can be planned, with role tags and flags
//! - `Horizon`: the ordered days being planned
//! - `ShiftCatalog`: the shift templates shared by all employees
//! - `SequenceRuleTable` / `LegalSequenceSet`: allowed day-to-day transitions
//! - `CoverageRequirement` / `CoverageRule`: exact staffing counts
//! - `HourBound`: permitted total hours per employee
//! - `Assignment`: the solved boolean decision surface

mod assignment;
mod catalog;
mod coverage;
mod employee;
mod horizon;
mod hours;
mod rules;

pub use assignment::Assignment;
pub use catalog::{ShiftCatalog, ShiftStart, ShiftTemplate};
pub use coverage::{expand_coverage, CoverageRequirement, CoverageRule};
pub use employee::{validate_roster, Employee, EmployeeFlags, RoleSet, RoleTag};
pub use horizon::{parse_date, Horizon};
pub use hours::HourBound;
pub use rules::{LegalSequenceSet, SequenceRule, SequenceRuleTable, Slot};
