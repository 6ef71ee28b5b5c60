//! ShiftForge Solver - constraint model and allocators
//!
//! This crate turns a planning instance into a schedule:
//! - [`model`]: boolean variables, linear constraints and clauses
//! - [`builder`]: the shift-assignment encoding (Model Builder)
//! - [`search`]: complete conflict-driven search with learning and restarts
//! - [`driver`]: bounded solving and status normalization (Solver Driver)
//! - [`greedy`]: weekly-hours allocator without constraint reasoning
//! - [`check`]: independent verification of every invariant
//! - [`event`]: planning lifecycle listeners

pub mod builder;
pub mod check;
pub mod driver;
pub mod event;
pub mod greedy;
pub mod model;
pub mod search;
pub mod stats;
pub mod termination;

pub use builder::{ModelSettings, PlanInstance, ShiftModel};
pub use check::{verify, Violation};
pub use driver::{SolveResult, SolveStatus, SolverDriver};
pub use event::{CountingListener, LoggingListener, PlanningEventSupport, PlanningListener};
pub use greedy::GreedyAllocator;
pub use stats::{ModelStats, SearchStats};
pub use termination::SearchTermination;
