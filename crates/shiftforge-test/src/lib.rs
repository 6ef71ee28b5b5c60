//! Shared test fixtures for ShiftForge crates.
//!
//! - [`roster`] - Employees and serialized employee records
//! - [`rules`] - Sequence rule tables
//! - [`calendar`] - Horizons and dates
//! - [`config`] - Planner configurations with short time budgets
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! shiftforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use shiftforge_test::roster::{newsroom_roster, supervisor};
//! use shiftforge_test::rules::no_early_repeat_rules;
//! ```

pub mod calendar;
pub mod config;
pub mod roster;
pub mod rules;

pub use calendar::{date, week_horizon};
pub use config::fast_config;
pub use roster::{employee, newsroom_roster, supervisor};
pub use rules::{no_early_repeat_rules, permissive_rules};
