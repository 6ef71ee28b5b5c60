//! Tests for console formatting.

use super::*;

fn visitor(event: &str) -> EventVisitor {
    EventVisitor {
        event: Some(event.to_string()),
        ..EventVisitor::default()
    }
}

#[test]
fn test_unknown_events_are_silent() {
    assert!(format_event(&EventVisitor::default()).is_empty());
    assert!(format_event(&visitor("progress")).is_empty());
}

#[test]
fn test_plan_start_lists_dimensions() {
    let mut v = visitor("plan_start");
    v.employees = Some(1200);
    v.days = Some(7);
    v.strategy = Some("greedy".to_string());
    v.label = Some("week 12".to_string());

    let output = format_event(&v);
    assert!(output.contains("1,200"));
    assert!(output.contains("employees"));
    assert!(output.contains("greedy"));
    assert!(output.contains("week 12"));
}

#[test]
fn test_model_built_reports_space() {
    let mut v = visitor("model_built");
    v.variables = Some(10);
    v.constraints = Some(42);
    v.fixed = Some(3);

    let output = format_event(&v);
    assert!(output.contains("1.024 x 10^3"));
    assert!(output.contains("42"));
    assert!(output.contains("3"));
    assert!(output.contains("fixed"));
}

#[test]
fn test_status_is_uppercased() {
    let mut v = visitor("status_received");
    v.status = Some("infeasible".to_string());
    v.elapsed_ms = Some(1500);

    let output = format_event(&v);
    assert!(output.contains("INFEASIBLE"));
    assert!(output.contains("1.50s"));
}

#[test]
fn test_plan_end_counts_violations() {
    let mut v = visitor("plan_end");
    v.status = Some("feasible".to_string());
    assert!(!format_event(&v).contains("violations"));

    v.violations = Some(2);
    assert!(format_event(&v).contains("violations"));
}

#[test]
fn test_format_duration_ms() {
    assert_eq!(format_duration_ms(250), "250ms");
    assert_eq!(format_duration_ms(2500), "2.50s");
    assert_eq!(format_duration_ms(125_000), "2m 5s");
}

#[test]
fn test_search_space() {
    assert_eq!(search_space(0), "1");
    assert_eq!(search_space(1), "2.000 x 10^0");
    assert_eq!(search_space(20), "1.049 x 10^6");
}

#[test]
fn test_init_is_idempotent() {
    init_quiet();
    init_quiet();
    tracing::info!(event = "plan_start", employees = 1u64, days = 7u64);
}
