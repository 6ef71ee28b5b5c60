//! Tests for the model builder.

use chrono::Weekday;
use shiftforge_core::{EmployeeFlags, SequenceRule, ShiftStart};
use shiftforge_test::roster::{early_supervisor, employee, newsroom_roster, supervisor};
use shiftforge_test::rules::{no_early_repeat_rules, permissive_rules};
use shiftforge_test::week_horizon;

use super::*;
use crate::model::Constraint;

fn uncovered() -> ModelSettings {
    ModelSettings::default().with_coverage(Vec::new())
}

fn slot(hours: f64) -> Slot {
    Slot::from_hours(Some(hours)).unwrap()
}

#[test]
fn test_variable_layout_matches_assignment() {
    let employees = vec![employee("a", 40.0), employee("b", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    let layout = Assignment::empty(2, 7, 7);
    assert_eq!(model.assignment_var(1, 3, 5).index(), layout.index(1, 3, 5));
    assert_eq!(model.worked_var(0, 0).index(), 2 * 7 * 7);
    assert_eq!(model.worked_var(1, 6).index(), 2 * 7 * 7 + 13);
    assert_eq!(model.model().var_count(), 2 * 7 * 7 + 2 * 7);
}

#[test]
fn test_constraint_counts_without_forbidden_transitions() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let stats = ShiftModel::build(&instance, &uncovered()).stats();

    assert_eq!(stats.assignment_variables(), 49);
    assert_eq!(stats.variables, 56);
    // worked-day equality + at-most-one per day, one hours constraint.
    assert_eq!(stats.linear_constraints, 7 + 7 + 1);
    assert_eq!(stats.clauses, 0);
    assert_eq!(stats.fixed_literals, 0);
}

#[test]
fn test_forbidden_transition_per_adjacent_day_pair() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = no_early_repeat_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    assert_eq!(model.stats().clauses, 6);
}

#[test]
fn test_empty_rule_table_forbids_every_shift_pair() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = SequenceRuleTable::new();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    // 7 x 7 shift pairs over 6 adjacent day pairs; rest stays unconstrained.
    assert_eq!(model.stats().clauses, 49 * 6);
}

#[test]
fn test_rest_rules_constrain_rest_transitions() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = SequenceRuleTable::new()
        .with_general([SequenceRule::new(slot(6.0), Slot::Rest)]);
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    assert!(model.resolved(0).legal.mentions_rest());
    // 8 x 8 slot pairs with one allowed, over 6 adjacent day pairs.
    assert_eq!(model.stats().clauses, 63 * 6);
}

#[test]
fn test_is_forbidden() {
    let inferred = RestTransitions::Inferred;
    let legal: LegalSequenceSet = [SequenceRule::new(slot(6.0), slot(14.5))].into_iter().collect();
    assert!(!is_forbidden(&legal, inferred, slot(6.0), slot(14.5)));
    assert!(is_forbidden(&legal, inferred, slot(14.5), slot(6.0)));
    assert!(!is_forbidden(&legal, inferred, Slot::Rest, slot(6.0)));

    let with_rest: LegalSequenceSet = [SequenceRule::new(Slot::Rest, slot(6.0))].into_iter().collect();
    assert!(!is_forbidden(&with_rest, inferred, Slot::Rest, slot(6.0)));
    assert!(is_forbidden(&with_rest, inferred, slot(6.0), Slot::Rest));
    assert!(is_forbidden(&with_rest, inferred, Slot::Rest, Slot::Rest));
}

#[test]
fn test_is_forbidden_with_explicit_rest_mode() {
    let legal: LegalSequenceSet = [SequenceRule::new(slot(6.0), slot(14.5))].into_iter().collect();
    assert!(is_forbidden(&legal, RestTransitions::Strict, Slot::Rest, slot(6.0)));
    assert!(is_forbidden(&legal, RestTransitions::Strict, slot(6.0), Slot::Rest));
    assert!(is_forbidden(&legal, RestTransitions::Strict, slot(14.5), slot(6.0)));

    let with_rest: LegalSequenceSet = [SequenceRule::new(Slot::Rest, slot(6.0))].into_iter().collect();
    assert!(!is_forbidden(&with_rest, RestTransitions::Lenient, slot(6.0), Slot::Rest));
    assert!(!is_forbidden(&with_rest, RestTransitions::Lenient, Slot::Rest, Slot::Rest));
    // Shift-to-shift transitions do not depend on the mode.
    assert!(is_forbidden(&with_rest, RestTransitions::Lenient, slot(6.0), slot(7.0)));
}

#[test]
fn test_strict_rest_transitions_add_rest_clauses() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);

    let strict = uncovered().with_rest_transitions(RestTransitions::Strict);
    let model = ShiftModel::build(&instance, &strict);
    // Every pair involving rest: 7 into rest, 7 out of rest and rest to rest.
    assert_eq!(model.stats().clauses, 15 * 6);

    let lenient = uncovered().with_rest_transitions(RestTransitions::Lenient);
    let rules = SequenceRuleTable::new()
        .with_general([SequenceRule::new(slot(6.0), Slot::Rest)]);
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &lenient);
    // Only the 7 x 7 shift pairs stay constrained.
    assert_eq!(model.stats().clauses, 49 * 6);
}

#[test]
fn test_role_rules_are_resolved_per_employee() {
    let employees = vec![employee("a", 40.0), supervisor("b", 40.0)];
    let horizon = week_horizon();
    let rules = SequenceRuleTable::new()
        .with_general([SequenceRule::new(slot(6.0), slot(7.0))])
        .with_role("cvd", [SequenceRule::new(slot(14.5), slot(6.0))]);
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    assert_eq!(model.resolved(0).legal.len(), 1);
    assert_eq!(model.resolved(1).legal.len(), 2);
}

#[test]
fn test_hour_bounds_follow_tolerance() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);

    let model = ShiftModel::build(&instance, &uncovered());
    assert_eq!(model.resolved(0).bound, HourBound::new(36, 44));

    let model = ShiftModel::build(&instance, &uncovered().with_tolerance(0.25));
    assert_eq!(model.resolved(0).bound, HourBound::new(30, 50));
}

#[test]
fn test_hour_bounds_count_worked_days() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    let hours = model
        .model()
        .constraints()
        .iter()
        .filter_map(|c| match c {
            Constraint::Linear(linear) if linear.lower() > 0 => Some(linear),
            _ => None,
        })
        .next()
        .expect("hours constraint");
    assert_eq!(hours.lower(), 36 * 60);
    assert_eq!(hours.upper(), 44 * 60);
    assert_eq!(hours.terms().len(), 7);
    assert!(hours
        .terms()
        .iter()
        .enumerate()
        .all(|(d, term)| term.var == model.worked_var(0, d) && term.coef == 480));
}

// ============================================================================
// Coverage and availability
// ============================================================================

#[test]
fn test_coverage_adds_one_constraint_per_requirement_and_day() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &ModelSettings::default());

    let base = 2 * (7 + 7 + 1);
    assert_eq!(model.stats().linear_constraints, base + 2 * 7);
}

#[test]
fn test_coverage_outside_catalog_is_skipped() {
    let employees = vec![supervisor("a", 56.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let requirement = CoverageRequirement::new("cvd", ShiftStart::from_hours(11.0).unwrap(), 1);
    let settings = ModelSettings::default().with_coverage(vec![requirement]);
    let model = ShiftModel::build(&instance, &settings);

    assert_eq!(model.stats().linear_constraints, 7 + 7 + 1);
}

#[test]
fn test_early_only_fixes_late_templates() {
    let employees = vec![early_supervisor("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    // 9:00, 10:00 and 14:30 are not before the 9:00 cutoff.
    assert_eq!(model.stats().fixed_literals, 3 * 7);
    let late = model.assignment_var(0, 2, 6);
    assert!(model.model().fixed().contains(&late.is_false()));
    let early = model.assignment_var(0, 2, 0);
    assert!(!model.model().fixed().contains(&early.is_false()));
}

#[test]
fn test_default_flags_apply_to_everyone() {
    let employees = vec![employee("a", 40.0), employee("b", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let flags = EmployeeFlags::default().with_excluded_weekday(Weekday::Mon);
    let model = ShiftModel::build(&instance, &uncovered().with_default_flags(flags));

    // Monday is the first horizon day.
    assert_eq!(model.stats().fixed_literals, 2 * 7);
    assert!(model
        .model()
        .fixed()
        .contains(&model.assignment_var(1, 0, 3).is_false()));
}

// ============================================================================
// Branching order and extraction
// ============================================================================

#[test]
fn test_branching_order_is_day_major() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    let order = model.branching_order(None);
    assert_eq!(order.len(), model.model().var_count());
    assert_eq!(order[0], model.worked_var(0, 0));
    assert_eq!(order[1..8], model.day_vars(0, 0)[..]);
    assert_eq!(order[8], model.worked_var(0, 1));

    let mut sorted: Vec<usize> = order.iter().map(|v| v.index()).collect();
    sorted.sort_unstable();
    assert!(sorted.iter().enumerate().all(|(i, &index)| index == i));
}

#[test]
fn test_branching_order_starts_each_day_with_coverage() {
    let employees = vec![employee("a", 40.0), supervisor("b", 56.0), supervisor("c", 56.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &ModelSettings::default());

    let order = model.branching_order(None);
    assert_eq!(order.len(), model.model().var_count());
    // 06:00 is template 0 and 14:30 template 6.
    assert_eq!(
        order[..4],
        [
            model.assignment_var(1, 0, 0),
            model.assignment_var(2, 0, 0),
            model.assignment_var(1, 0, 6),
            model.assignment_var(2, 0, 6),
        ]
    );
    assert_eq!(order[4], model.worked_var(0, 0));

    let second_day = 4 + 3 * 8 - 4;
    assert_eq!(order[second_day], model.assignment_var(1, 1, 0));
}

#[test]
fn test_seeded_branching_order_is_reproducible() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    let first = model.branching_order(Some(7));
    assert_eq!(first, model.branching_order(Some(7)));

    // Shuffling stays within each (employee, day) block.
    assert_eq!(first[8], model.worked_var(0, 1));
    let block: Vec<usize> = first[9..16].iter().map(|v| v.index()).collect();
    assert!(block.iter().all(|&i| (7..14).contains(&i)));
}

// ============================================================================
// Phase hints
// ============================================================================

#[test]
fn test_phase_hints_solve_the_newsroom_week() {
    let employees = newsroom_roster();
    let horizon = week_horizon();
    let rules = no_early_repeat_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &ModelSettings::default());

    let hints = model.phase_hints();
    assert_eq!(hints.len(), model.model().var_count());
    assert!(model.model().is_satisfied_by(hints));

    let assignment = model.extract(hints);
    for d in 0..7 {
        let early = (0..2).filter(|&e| assignment.get(e, d, 0)).count();
        let late = (0..2).filter(|&e| assignment.get(e, d, 6)).count();
        assert_eq!((early, late), (1, 1), "day {d}");
    }
    // The weekday reporter rests on the weekend.
    assert_eq!(assignment.shift_index(2, 5), None);
    assert_eq!(assignment.shift_index(2, 6), None);
    assert_eq!(assignment.shift_count(2), 5);
}

#[test]
fn test_phase_hints_respect_sequence_rules() {
    let employees = vec![supervisor("a", 56.0), supervisor("b", 56.0)];
    let horizon = week_horizon();
    let rules = no_early_repeat_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &ModelSettings::default());

    let assignment = model.extract(model.phase_hints());
    for e in 0..2 {
        for d in 1..7 {
            assert!(!(assignment.get(e, d - 1, 0) && assignment.get(e, d, 0)));
        }
    }
}

#[test]
fn test_phase_hints_avoid_fixed_literals() {
    let employees = vec![early_supervisor("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    let hints = model.phase_hints();
    assert!(model.model().fixed().iter().all(|lit| lit.holds(hints)));
    assert_eq!(model.extract(hints).shift_count(0), 5);
}

#[test]
fn test_extract_reads_assignment_variables() {
    let employees = vec![employee("a", 40.0)];
    let horizon = week_horizon();
    let rules = permissive_rules();
    let instance = PlanInstance::new(&employees, &horizon, &rules);
    let model = ShiftModel::build(&instance, &uncovered());

    let mut values = vec![false; model.model().var_count()];
    values[model.assignment_var(0, 4, 6).index()] = true;
    values[model.worked_var(0, 4).index()] = true;

    let assignment = model.extract(&values);
    assert_eq!(assignment.shift_index(0, 4), Some(6));
    assert_eq!(assignment.shift_count(0), 1);
}

#[test]
fn test_settings_from_config() {
    let config = PlannerConfig::new().with_tolerance(0.2);
    let settings = ModelSettings::from_config(&config).unwrap();
    assert_eq!(settings.tolerance, 0.2);
    assert_eq!(settings.catalog.len(), 7);
    assert!(settings.is_early_template(0));
    assert!(!settings.is_early_template(4));

    let invalid = PlannerConfig::new().with_tolerance(2.0);
    assert!(ModelSettings::from_config(&invalid).is_err());
}
