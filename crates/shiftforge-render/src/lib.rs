//! ShiftForge Render - schedule grids from solved assignments
//!
//! Turns an [`Assignment`](shiftforge_core::Assignment) into a
//! [`ScheduleGrid`]: one row per employee, one (start, end) column pair per
//! horizon day, plus totals. Grids are written as CSV, JSON or a plain-text
//! table.

pub mod clock;
pub mod csv;
pub mod error;
pub mod grid;
pub mod table;

pub use clock::{format_clock, format_range, parse_clock, parse_clock_range};
pub use csv::CsvWriter;
pub use error::RenderError;
pub use grid::{Cell, GridRow, ScheduleGrid};
pub use table::TableView;
