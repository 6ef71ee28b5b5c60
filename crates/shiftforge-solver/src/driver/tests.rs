//! Tests for the solver driver.

use shiftforge_core::{Employee, SequenceRuleTable};
use shiftforge_test::config::fast_config;
use shiftforge_test::roster::{early_supervisor, supervisor};
use shiftforge_test::rules::{no_early_repeat_rules, permissive_rules};
use shiftforge_test::week_horizon;

use super::*;
use crate::builder::{ModelSettings, PlanInstance};
use crate::event::CountingListener;

fn build(employees: &[Employee], rules: &SequenceRuleTable, settings: &ModelSettings) -> ShiftModel {
    let horizon = week_horizon();
    ShiftModel::build(&PlanInstance::new(employees, &horizon, rules), settings)
}

#[test]
fn test_feasible_model_is_optimal() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let model = build(&employees, &no_early_repeat_rules(), &ModelSettings::default());

    let result = SolverDriver::new(Duration::from_secs(10)).solve(&model);
    assert_eq!(result.status, SolveStatus::Optimal);
    let assignment = result.assignment.expect("solution");
    assert_eq!(assignment.employee_count(), 2);
    assert_eq!(assignment.day_count(), 7);
}

#[test]
fn test_infeasible_model_has_no_assignment() {
    // The only supervisor cannot take the 14:30 coverage shift.
    let employees = vec![early_supervisor("a", 56.0)];
    let model = build(&employees, &permissive_rules(), &ModelSettings::default());

    let result = SolverDriver::new(Duration::from_secs(10)).solve(&model);
    assert_eq!(result.status, SolveStatus::Infeasible);
    assert!(result.assignment.is_none());

    let err = result.into_assignment(&week_horizon()).unwrap_err();
    assert!(err.is_infeasible());
}

#[test]
fn test_zero_budget_is_unknown() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let model = build(&employees, &permissive_rules(), &ModelSettings::default());

    let result = SolverDriver::new(Duration::ZERO).solve(&model);
    assert_eq!(result.status, SolveStatus::Unknown);
    assert!(result.assignment.is_none());

    let err = result.into_assignment(&week_horizon()).unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(err, PlanError::Timeout { budget } if budget == Duration::ZERO));
}

#[test]
fn test_listeners_see_each_point_once() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let model = build(&employees, &permissive_rules(), &ModelSettings::default());
    let counter = Arc::new(CountingListener::new());

    SolverDriver::new(Duration::from_secs(10))
        .with_listener(counter.clone())
        .solve(&model);

    assert_eq!(counter.model_built_count(), 1);
    assert_eq!(counter.solve_started_count(), 1);
    assert_eq!(counter.status_received_count(), 1);
}

#[test]
fn test_from_config() {
    let config = fast_config().with_node_limit(42).with_random_seed(9);
    let driver = SolverDriver::from_config(&config);
    assert_eq!(driver.time_limit(), Duration::from_secs(10));
    assert_eq!(driver.termination.node_limit(), Some(42));
    assert_eq!(driver.random_seed, Some(9));

    assert_eq!(SolverDriver::default().time_limit(), Duration::from_secs(30));
}

#[test]
fn test_seeded_solve_is_reproducible() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let model = build(&employees, &permissive_rules(), &ModelSettings::default());
    let driver = SolverDriver::new(Duration::from_secs(10)).with_random_seed(11);

    let first = driver.solve(&model).assignment;
    let second = driver.solve(&model).assignment;
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_solution_satisfies_every_constraint() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let model = build(&employees, &no_early_repeat_rules(), &ModelSettings::default());
    let mut search = Search::new(model.model(), SearchTermination::seconds(10));

    match search.run(&model.branching_order(None)) {
        SearchOutcome::Solved(values) => assert!(model.model().is_satisfied_by(&values)),
        other => panic!("expected a solution, got {other:?}"),
    }
}

#[test]
fn test_status_display() {
    assert_eq!(SolveStatus::Optimal.to_string(), "optimal");
    assert_eq!(SolveStatus::Unknown.to_string(), "unknown");
    assert!(SolveStatus::Feasible.has_solution());
    assert!(!SolveStatus::Infeasible.has_solution());
}
