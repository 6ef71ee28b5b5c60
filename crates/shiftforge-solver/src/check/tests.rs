//! Tests for the invariant checker.

use chrono::Weekday;
use shiftforge_config::RestTransitions;
use shiftforge_core::{EmployeeFlags, SequenceRuleTable};
use shiftforge_test::roster::{early_supervisor, employee, supervisor};
use shiftforge_test::rules::no_early_repeat_rules;
use shiftforge_test::week_horizon;

use super::*;

const SIX: usize = 0;
const HALF_PAST_TWO: usize = 6;

/// Supervisor `a` always at 6:00 and `b` always at 14:30.
fn covered_week() -> Assignment {
    Assignment::from_fn(2, 7, 7, |e, _, k| (e == 0 && k == SIX) || (e == 1 && k == HALF_PAST_TWO))
}

fn permissive() -> SequenceRuleTable {
    shiftforge_test::rules::permissive_rules()
}

#[test]
fn test_valid_assignment_has_no_violations() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let horizon = week_horizon();
    let rules = permissive();
    let instance = PlanInstance::new(&employees, &horizon, &rules);

    let violations = verify(&instance, &ModelSettings::default(), &covered_week());
    assert!(violations.is_empty(), "{violations:?}");
}

#[test]
fn test_multiple_shifts_on_one_day() {
    let employees = vec![employee("a", 8.0)];
    let horizon = week_horizon();
    let rules = permissive();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let settings = ModelSettings::default().with_coverage(Vec::new());

    let assignment = Assignment::from_fn(1, 7, 7, |_, d, k| d == 0 && (k == 0 || k == 1));
    let violations = verify(&instance, &settings, &assignment);
    assert!(violations
        .iter()
        .any(|v| matches!(v, Violation::MultipleShifts { count: 2, .. })));
}

#[test]
fn test_illegal_transition() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let horizon = week_horizon();
    let rules = no_early_repeat_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);

    let violations = verify(&instance, &ModelSettings::default(), &covered_week());
    let illegal = violations
        .iter()
        .filter(|v| matches!(v, Violation::IllegalTransition { .. }))
        .count();
    assert_eq!(illegal, 6);
}

#[test]
fn test_role_rules_apply_only_to_role_holders() {
    let employees = vec![employee("a", 16.0), supervisor("b", 16.0)];
    let horizon = week_horizon();
    let late = Slot::from_hours(Some(14.5)).unwrap();
    let early = Slot::from_hours(Some(6.0)).unwrap();
    let rules = SequenceRuleTable::new().with_role("CvD", [SequenceRule::new(late, early)]);
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let settings = ModelSettings::default().with_coverage(Vec::new());

    // Both work 14:30 on Monday and 6:00 on Tuesday.
    let assignment = Assignment::from_fn(2, 7, 7, |_, d, k| {
        (d == 0 && k == HALF_PAST_TWO) || (d == 1 && k == SIX)
    });
    let violations = verify(&instance, &settings, &assignment);
    let illegal: Vec<&Violation> = violations
        .iter()
        .filter(|v| matches!(v, Violation::IllegalTransition { .. }))
        .collect();
    assert_eq!(illegal.len(), 1, "{violations:?}");
    assert!(matches!(
        illegal[0],
        Violation::IllegalTransition { employee, .. } if employee == "a"
    ));
}

#[test]
fn test_strict_rest_transitions_are_verified() {
    let employees = vec![employee("a", 8.0)];
    let horizon = week_horizon();
    let rules = permissive();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let assignment = Assignment::from_fn(1, 7, 7, |_, d, k| d == 0 && k == SIX);

    let count_illegal = |settings: &ModelSettings| {
        verify(&instance, settings, &assignment)
            .iter()
            .filter(|v| matches!(v, Violation::IllegalTransition { .. }))
            .count()
    };
    let uncovered = ModelSettings::default().with_coverage(Vec::new());
    assert_eq!(count_illegal(&uncovered), 0);

    // 6:00 into rest on Tuesday, then rest to rest for five days.
    let strict = uncovered.with_rest_transitions(RestTransitions::Strict);
    assert_eq!(count_illegal(&strict), 6);
}

#[test]
fn test_coverage_shortfall() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let horizon = week_horizon();
    let rules = permissive();
    let instance = PlanInstance::new(&employees, &horizon, &rules);

    let mut assignment = covered_week();
    assignment.set(1, 3, HALF_PAST_TWO, false);
    let violations = verify(&instance, &ModelSettings::default(), &assignment);

    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::Coverage { expected: 1, actual: 0, day, .. } if *day == horizon.days()[3]
    )));
}

#[test]
fn test_hours_outside_bound() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let settings = ModelSettings::default().with_coverage(Vec::new());

    let assignment = Assignment::from_fn(1, 7, 7, |_, d, k| d < 3 && k == 2);
    let violations = verify(&instance, &settings, &assignment);
    assert_eq!(
        violations,
        vec![Violation::Hours {
            employee: "a".to_string(),
            hours: 24.0,
            min: 36,
            max: 44,
        }]
    );
    assert_eq!(
        violations[0].to_string(),
        "employee a works 24.00h, outside [36, 44]"
    );
}

#[test]
fn test_unavailable_assignments() {
    let flags = EmployeeFlags::default().with_excluded_weekday(Weekday::Tue);
    let employees = vec![employee("a", 8.0).with_flags(flags), early_supervisor("b", 8.0)];
    let horizon = week_horizon();
    let rules = permissive();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let settings = ModelSettings::default().with_coverage(Vec::new());

    // a works Tuesday, b works a 14:30 shift.
    let assignment = Assignment::from_fn(2, 7, 7, |e, d, k| {
        (e == 0 && d == 1 && k == 0) || (e == 1 && d == 0 && k == HALF_PAST_TWO)
    });
    let unavailable = verify(&instance, &settings, &assignment)
        .into_iter()
        .filter(|v| matches!(v, Violation::Unavailable { .. }))
        .count();
    assert_eq!(unavailable, 2);
}
