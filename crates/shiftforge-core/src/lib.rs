//! ShiftForge Core - domain types for shift planning
//!
//! This crate provides the vocabulary shared by every other ShiftForge crate:
//! - Employees with role tags, contracted hours and availability flags
//! - The planning horizon and the shift catalog
//! - Sequence rules, coverage rules and hour bounds
//! - The solved boolean assignment surface
//! - The error taxonomy of a planning run

pub mod domain;
pub mod error;

pub use domain::{
    Assignment, CoverageRequirement, CoverageRule, Employee, EmployeeFlags, Horizon, HourBound,
    LegalSequenceSet, RoleSet, RoleTag, SequenceRule, SequenceRuleTable, ShiftCatalog, ShiftStart,
    ShiftTemplate, Slot,
};
pub use error::{PlanError, ValidationError};
