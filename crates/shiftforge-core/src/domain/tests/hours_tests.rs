use crate::domain::HourBound;

#[test]
fn test_week_with_ten_percent_tolerance() {
    let bound = HourBound::from_contract(40.0, 7, 0.1);
    assert_eq!(bound.min(), 36);
    assert_eq!(bound.max(), 44);
    assert_eq!(bound.min_minutes(), 36 * 60);
}

#[test]
fn test_scaled_to_horizon_length() {
    // 40h/week over 14 days is 80h; 10% either side.
    let bound = HourBound::from_contract(40.0, 14, 0.1);
    assert_eq!((bound.min(), bound.max()), (72, 88));
}

#[test]
fn test_rounding_to_whole_hours() {
    // 30h/week over 3 days is 12.857h; 11.57 and 14.14 round to 12 and 14.
    let bound = HourBound::from_contract(30.0, 3, 0.1);
    assert_eq!((bound.min(), bound.max()), (12, 14));
}

#[test]
fn test_zero_contract_forces_zero_hours() {
    let bound = HourBound::from_contract(0.0, 7, 0.1);
    assert_eq!((bound.min(), bound.max()), (0, 0));
    assert!(bound.contains(0.0));
    assert!(!bound.contains(8.0));
}

#[test]
fn test_expected_hours() {
    assert_eq!(HourBound::expected_hours(35.0, 14), 70.0);
}
