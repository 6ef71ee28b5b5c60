//! Tests for clock formatting and parsing.

use shiftforge_core::ShiftCatalog;

use super::*;

#[test]
fn test_format_clock_pads_and_wraps() {
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_clock(6 * 60), "06:00");
    assert_eq!(format_clock(24 * 60), "00:00");
    assert_eq!(format_clock(22 * 60 + 30 + 8 * 60), "06:30");
}

#[test]
fn test_format_range_for_stock_templates() {
    let catalog = ShiftCatalog::default();
    let ranges: Vec<String> = catalog.templates().iter().map(format_range).collect();
    assert_eq!(
        ranges,
        vec![
            "06:00-14:00",
            "07:00-15:00",
            "07:30-15:30",
            "08:00-16:00",
            "09:00-17:00",
            "10:00-18:00",
            "14:30-22:30",
        ]
    );
}

#[test]
fn test_rendered_ranges_parse_back_to_their_template() {
    let catalogs = [
        ShiftCatalog::default(),
        ShiftCatalog::new(&[0.0, 5.25, 18.75, 23.5], 7.5).unwrap(),
        ShiftCatalog::new(&[12.0], 24.0).unwrap(),
    ];
    for catalog in &catalogs {
        for template in catalog.templates() {
            let rendered = format_range(template);
            let (start, duration) = parse_clock_range(&rendered).unwrap();
            assert_eq!(start, template.start(), "{rendered}");
            assert_eq!(duration, template.duration_minutes(), "{rendered}");
        }
    }
}

#[test]
fn test_parse_clock_rejects_garbage() {
    assert!(parse_clock("0700").is_err());
    assert!(parse_clock("24:00").is_err());
    assert!(parse_clock("07:60").is_err());
    assert!(parse_clock("ab:cd").is_err());
    assert_eq!(parse_clock(" 07:30 ").unwrap(), 450);
}

#[test]
fn test_parse_clock_range_requires_separator() {
    let err = parse_clock_range("07:00").unwrap_err();
    assert!(err.to_string().contains("expected HH:MM-HH:MM"));
}
