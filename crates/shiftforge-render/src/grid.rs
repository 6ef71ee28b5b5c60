//! The rendered schedule grid.

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use shiftforge_core::{Assignment, Employee, Horizon, HourBound, RoleTag, ShiftCatalog, ShiftTemplate};

use crate::clock::format_clock;
use crate::error::RenderError;

/// Per-employee columns preceding the day columns.
pub const FIXED_COLUMNS: [&str; 8] = [
    "Id",
    "Surname",
    "GivenName",
    "Department",
    "Coverage",
    "WeeklyHours",
    "TotalHours",
    "Delta",
];

/// Day header format, e.g. `10.03.25`.
pub const DAY_HEADER_FORMAT: &str = "%d.%m.%y";

/// One (employee, day) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Rest,
    Shift(ShiftTemplate),
}

impl Cell {
    pub fn is_rest(&self) -> bool {
        matches!(self, Cell::Rest)
    }

    pub fn template(&self) -> Option<&ShiftTemplate> {
        match self {
            Cell::Rest => None,
            Cell::Shift(template) => Some(template),
        }
    }

    /// `HH:MM` start, empty for rest.
    pub fn start_text(&self) -> String {
        self.template()
            .map(|t| format_clock(t.start().minutes()))
            .unwrap_or_default()
    }

    /// `HH:MM` end, empty for rest.
    pub fn end_text(&self) -> String {
        self.template()
            .map(|t| format_clock(t.end_minutes()))
            .unwrap_or_default()
    }

    pub fn minutes(&self) -> u32 {
        self.template().map_or(0, |t| t.duration_minutes())
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Rest => serializer.serialize_none(),
            Cell::Shift(_) => {
                let mut state = serializer.serialize_struct("Cell", 2)?;
                state.serialize_field("start", &self.start_text())?;
                state.serialize_field("end", &self.end_text())?;
                state.end()
            }
        }
    }
}

/// One employee's row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub id: String,
    pub surname: String,
    pub given_name: String,
    pub department: String,
    /// Holds the coverage role.
    pub coverage: bool,
    pub weekly_hours: f64,
    pub total_hours: f64,
    /// `total_hours` minus contracted hours scaled to the horizon.
    pub delta: f64,
    pub cells: Vec<Cell>,
}

impl GridRow {
    pub fn cell(&self, day: usize) -> Option<&Cell> {
        self.cells.get(day)
    }

    pub fn shift_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_rest()).count()
    }

    /// Text fields in grid column order.
    pub fn record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(FIXED_COLUMNS.len() + 2 * self.cells.len());
        record.push(self.id.clone());
        record.push(self.surname.clone());
        record.push(self.given_name.clone());
        record.push(self.department.clone());
        record.push(if self.coverage { "x" } else { "" }.to_string());
        record.push(self.weekly_hours.to_string());
        record.push(two_decimals(self.total_hours));
        record.push(two_decimals(self.delta));
        for cell in &self.cells {
            record.push(cell.start_text());
            record.push(cell.end_text());
        }
        record
    }
}

/// A rendered schedule: one row per employee, one column pair per day.
///
/// # Examples
///
/// ```
/// use shiftforge_core::{Assignment, Employee, Horizon, RoleTag, ShiftCatalog};
/// use shiftforge_render::ScheduleGrid;
///
/// let employees = vec![Employee::new("001", 40.0)];
/// let horizon = Horizon::parse("2025-03-10", "2025-03-11").unwrap();
/// let catalog = ShiftCatalog::default();
/// let assignment = Assignment::from_fn(1, 2, catalog.len(), |_, d, k| d == 0 && k == 0);
///
/// let grid = ScheduleGrid::render(&employees, &horizon, &catalog, &assignment, &RoleTag::new("cvd")).unwrap();
/// assert_eq!(grid.rows()[0].record()[8..], ["06:00", "14:00", "", ""]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleGrid {
    days: Vec<NaiveDate>,
    rows: Vec<GridRow>,
}

impl ScheduleGrid {
    /// Reads `assignment` back into a grid.
    ///
    /// Each cell takes the first assigned template in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::DimensionMismatch` if the assignment was built
    /// for a different roster, horizon or catalog.
    pub fn render(
        employees: &[Employee],
        horizon: &Horizon,
        catalog: &ShiftCatalog,
        assignment: &Assignment,
        coverage_role: &RoleTag,
    ) -> Result<Self, RenderError> {
        let expected = (employees.len(), horizon.len(), catalog.len());
        let actual = (
            assignment.employee_count(),
            assignment.day_count(),
            assignment.template_count(),
        );
        if expected != actual {
            return Err(RenderError::DimensionMismatch { expected, actual });
        }

        let rows = employees
            .iter()
            .enumerate()
            .map(|(e, employee)| {
                let cells: Vec<Cell> = (0..horizon.len())
                    .map(|d| {
                        assignment
                            .shift_index(e, d)
                            .and_then(|k| catalog.get(k))
                            .map_or(Cell::Rest, |t| Cell::Shift(*t))
                    })
                    .collect();
                let minutes: u32 = cells.iter().map(Cell::minutes).sum();
                let total_hours = f64::from(minutes) / 60.0;
                let expected = HourBound::expected_hours(employee.weekly_hours, horizon.len());
                GridRow {
                    id: employee.id.clone(),
                    surname: employee.surname.clone(),
                    given_name: employee.given_name.clone(),
                    department: employee.department.clone(),
                    coverage: employee.has_role(coverage_role),
                    weekly_hours: employee.weekly_hours,
                    total_hours,
                    delta: total_hours - expected,
                    cells,
                }
            })
            .collect();

        Ok(Self {
            days: horizon.days().to_vec(),
            rows,
        })
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&GridRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn column_count(&self) -> usize {
        FIXED_COLUMNS.len() + 2 * self.days.len()
    }

    /// The two header rows: dates over each column pair, then column names.
    pub fn header_rows(&self) -> [Vec<String>; 2] {
        let mut dates = vec![String::new(); FIXED_COLUMNS.len()];
        let mut names: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
        for day in &self.days {
            dates.push(day.format(DAY_HEADER_FORMAT).to_string());
            dates.push(String::new());
            names.push("Start".to_string());
            names.push("End".to_string());
        }
        [dates, names]
    }

    /// Header rows followed by one record per employee.
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.header_rows()
            .into_iter()
            .chain(self.rows.iter().map(GridRow::record))
    }

    /// Serializes the grid as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// Avoids printing "-0.00" for deltas that round to zero.
fn two_decimals(value: f64) -> String {
    let value = if value.abs() < 0.005 { 0.0 } else { value };
    format!("{value:.2}")
}
