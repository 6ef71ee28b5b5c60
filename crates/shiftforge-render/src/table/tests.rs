//! Tests for the console table view.

use shiftforge_core::{Assignment, RoleTag, ShiftCatalog};
use shiftforge_test::roster::newsroom_roster;
use shiftforge_test::week_horizon;

use super::*;

#[test]
fn test_table_aligns_columns() {
    let employees = newsroom_roster();
    let horizon = week_horizon();
    let catalog = ShiftCatalog::default();
    let assignment = Assignment::from_fn(3, 7, catalog.len(), |e, d, k| e == 0 && d == 0 && k == 0);
    let grid = ScheduleGrid::render(&employees, &horizon, &catalog, &assignment, &RoleTag::new("cvd")).unwrap();

    let text = TableView::new(&grid).to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Id   Name"));
    assert!(lines[0].contains("Mon 10.03"));
    assert!(lines[1].contains("06:00-14:00"));
    assert!(lines[1].starts_with("001  Berger Anna"));
    assert!(lines[3].contains("Wolf Mira"));

    let column = lines[0].find("Mon 10.03").unwrap();
    assert_eq!(&lines[1][column..column + 11], "06:00-14:00");
    assert_eq!(&lines[2][column..column + 1], "-");
}
