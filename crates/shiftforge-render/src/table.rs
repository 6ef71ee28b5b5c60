//! Plain-text table view of a grid, for terminals.

use std::fmt;

use crate::clock::format_range;
use crate::grid::ScheduleGrid;

const REST: &str = "-";

/// Aligned table with one `HH:MM-HH:MM` column per day.
///
/// ```text
/// Id   Name         Dept     Cov  Hours  Delta  Mon 10.03    Tue 11.03
/// 001  Berger Anna  Politik  x    56.00  0.00   06:00-14:00  06:00-14:00
/// ```
pub struct TableView<'a> {
    grid: &'a ScheduleGrid,
}

impl<'a> TableView<'a> {
    pub fn new(grid: &'a ScheduleGrid) -> Self {
        Self { grid }
    }

    fn lines(&self) -> Vec<Vec<String>> {
        let mut header: Vec<String> = ["Id", "Name", "Dept", "Cov", "Hours", "Delta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(self.grid.days().iter().map(|d| d.format("%a %d.%m").to_string()));

        let mut lines = vec![header];
        for row in self.grid.rows() {
            let name = format!("{} {}", row.surname, row.given_name).trim().to_string();
            let mut line = vec![
                row.id.clone(),
                name,
                row.department.clone(),
                if row.coverage { "x" } else { "" }.to_string(),
                format!("{:.2}", row.total_hours),
                format!("{:.2}", if row.delta.abs() < 0.005 { 0.0 } else { row.delta }),
            ];
            line.extend(
                row.cells
                    .iter()
                    .map(|c| c.template().map_or_else(|| REST.to_string(), format_range)),
            );
            lines.push(line);
        }
        lines
    }
}

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.lines();
        let columns = lines.first().map_or(0, Vec::len);
        let widths: Vec<usize> = (0..columns)
            .map(|c| lines.iter().map(|l| l[c].chars().count()).max().unwrap_or(0))
            .collect();

        for line in &lines {
            let mut text = String::new();
            for (c, field) in line.iter().enumerate() {
                if c > 0 {
                    text.push_str("  ");
                }
                text.push_str(&format!("{:<width$}", field, width = widths[c]));
            }
            writeln!(f, "{}", text.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
