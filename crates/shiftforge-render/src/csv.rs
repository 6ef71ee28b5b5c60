//! CSV sink for schedule grids.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::RenderError;
use crate::grid::ScheduleGrid;

/// Writes a grid as delimited text, headers first.
///
/// Fields containing the delimiter, a quote or a line break are quoted,
/// with inner quotes doubled.
#[derive(Debug, Clone, Copy)]
pub struct CsvWriter {
    delimiter: char,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: ',' }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn write<W: Write>(&self, grid: &ScheduleGrid, mut out: W) -> Result<(), RenderError> {
        for record in grid.records() {
            let line = record
                .iter()
                .map(|field| self.escape(field))
                .collect::<Vec<_>>()
                .join(&self.delimiter.to_string());
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes the grid to `path`, creating parent directories.
    pub fn write_file(&self, grid: &ScheduleGrid, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.write(grid, BufWriter::new(File::create(path)?))
    }

    pub fn to_string(&self, grid: &ScheduleGrid) -> Result<String, RenderError> {
        let mut buffer = Vec::new();
        self.write(grid, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn escape(&self, field: &str) -> String {
        let needs_quotes = field
            .chars()
            .any(|c| c == self.delimiter || c == '"' || c == '\n' || c == '\r');
        if needs_quotes {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
