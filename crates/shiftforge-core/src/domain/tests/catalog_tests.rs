use crate::domain::{ShiftCatalog, ShiftStart};
use crate::error::ValidationError;

#[test]
fn test_default_catalog() {
    let catalog = ShiftCatalog::default();
    assert_eq!(catalog.len(), 7);
    assert_eq!(catalog.duration_minutes(), 480);
    assert_eq!(catalog.get(2).unwrap().start().to_string(), "07:30");
    assert_eq!(catalog.earliest_index(), 0);
}

#[test]
fn test_catalog_keeps_given_order() {
    let catalog = ShiftCatalog::new(&[14.5, 6.0, 9.0], 8.0).unwrap();
    let starts: Vec<String> = catalog
        .templates()
        .iter()
        .map(|t| t.start().to_string())
        .collect();
    assert_eq!(starts, vec!["14:30", "06:00", "09:00"]);
    assert_eq!(catalog.earliest_index(), 1);
    assert_eq!(catalog.index_of(ShiftStart::from_hours(9.0).unwrap()), Some(2));
}

#[test]
fn test_catalog_rejects_duplicates_and_empty() {
    assert!(matches!(
        ShiftCatalog::new(&[], 8.0),
        Err(ValidationError::InvalidCatalog(_))
    ));
    assert!(matches!(
        ShiftCatalog::new(&[6.0, 6.0], 8.0),
        Err(ValidationError::InvalidCatalog(_))
    ));
    assert!(ShiftCatalog::new(&[6.0], 0.0).is_err());
    assert!(ShiftCatalog::new(&[25.0], 8.0).is_err());
}

#[test]
fn test_shift_start_rounds_to_minute() {
    let start = ShiftStart::from_hours(7.0 + 1.0 / 3.0).unwrap();
    assert_eq!(start.minutes(), 440);
    assert_eq!(start.to_string(), "07:20");
}

#[test]
fn test_template_end_may_pass_midnight() {
    let catalog = ShiftCatalog::new(&[22.0], 8.0).unwrap();
    let template = catalog.get(0).unwrap();
    assert_eq!(template.end_minutes(), 30 * 60);
    assert_eq!(template.duration_hours(), 8.0);
}

#[test]
fn test_shift_start_deserializes_from_hours() {
    let start: ShiftStart = serde_json::from_str("14.5").unwrap();
    assert_eq!(start.minutes(), 870);
    assert!(serde_json::from_str::<ShiftStart>("-1").is_err());
}
