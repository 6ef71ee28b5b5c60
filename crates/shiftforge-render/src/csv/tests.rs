//! Tests for the CSV writer.

use shiftforge_core::{Assignment, Employee, RoleTag, ShiftCatalog};
use shiftforge_test::week_horizon;

use super::*;

fn grid(employee: Employee) -> ScheduleGrid {
    let horizon = week_horizon();
    let catalog = ShiftCatalog::default();
    let assignment = Assignment::from_fn(1, 7, catalog.len(), |_, d, k| d == 0 && k == 3);
    ScheduleGrid::render(&[employee], &horizon, &catalog, &assignment, &RoleTag::new("cvd")).unwrap()
}

#[test]
fn test_writes_headers_then_rows() {
    let csv = CsvWriter::new()
        .to_string(&grid(Employee::new("7", 8.0).with_name("Roth", "Eva")))
        .unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(",,,,,,,,10.03.25,,11.03.25,"));
    assert!(lines[1].starts_with("Id,Surname,GivenName,Department,Coverage,WeeklyHours,TotalHours,Delta,Start,End"));
    assert!(lines[2].starts_with("7,Roth,Eva,,,8,8.00,0.00,08:00,16:00,,"));
    assert_eq!(lines[2].split(',').count(), 8 + 14);
}

#[test]
fn test_quotes_fields_that_need_it() {
    let employee = Employee::new("7", 8.0).with_name("Roth, \"Evi\"", "Eva");
    let csv = CsvWriter::new().to_string(&grid(employee)).unwrap();
    assert!(csv.contains("7,\"Roth, \"\"Evi\"\"\",Eva"));
}

#[test]
fn test_custom_delimiter() {
    let employee = Employee::new("7", 8.0).with_name("Roth, Eva", "Eva");
    let csv = CsvWriter::new()
        .with_delimiter(';')
        .to_string(&grid(employee))
        .unwrap();
    assert!(csv.contains("7;Roth, Eva;Eva;"));
}

#[test]
fn test_write_file_creates_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results").join("plan.csv");
    CsvWriter::new()
        .write_file(&grid(Employee::new("7", 8.0)), &path)
        .unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("08:00,16:00"));
}
