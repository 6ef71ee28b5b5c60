//! Invariant checker for solved or greedily allocated assignments.
//!
//! Verifies, independently of the model encoding:
//! - at most one template per employee and day
//! - every adjacent-day transition is listed by a general rule or a rule
//!   of one of the employee's roles, looked up in the raw rule table
//! - every coverage rule holds with its exact count
//! - total hours lie within each employee's bound
//! - no assignment on an excluded weekday or, for early-only employees,
//!   on a late template

use chrono::{Datelike, NaiveDate};
use shiftforge_core::{
    Assignment, Employee, HourBound, RoleTag, SequenceRule, SequenceRuleTable, ShiftStart, Slot,
};
use thiserror::Error;

use crate::builder::{ModelSettings, PlanInstance};

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("employee {employee} has {count} shifts on {day}")]
    MultipleShifts {
        employee: String,
        day: NaiveDate,
        count: usize,
    },

    #[error("employee {employee} moves from {from} to {to} on {day}, which no rule allows")]
    IllegalTransition {
        employee: String,
        day: NaiveDate,
        from: Slot,
        to: Slot,
    },

    #[error("{actual} of {expected} required {role} employees on the {shift} shift on {day}")]
    Coverage {
        role: RoleTag,
        shift: ShiftStart,
        day: NaiveDate,
        expected: u32,
        actual: u32,
    },

    #[error("employee {employee} works {hours:.2}h, outside [{min}, {max}]")]
    Hours {
        employee: String,
        hours: f64,
        min: i64,
        max: i64,
    },

    #[error("employee {employee} is not available for the {shift} shift on {day}")]
    Unavailable {
        employee: String,
        day: NaiveDate,
        shift: ShiftStart,
    },
}

/// Returns every broken invariant of `assignment`; empty when it is valid.
///
/// The assignment must use the instance's dimensions and the settings'
/// catalog order.
pub fn verify(
    instance: &PlanInstance<'_>,
    settings: &ModelSettings,
    assignment: &Assignment,
) -> Vec<Violation> {
    let catalog = &settings.catalog;
    let days = instance.horizon.days();
    let mut violations = Vec::new();

    let slot_of = |e: usize, d: usize| match assignment.shift_index(e, d).and_then(|k| catalog.get(k)) {
        Some(template) => Slot::Shift(template.start()),
        None => Slot::Rest,
    };

    for (e, employee) in instance.employees.iter().enumerate() {
        let flags = employee.flags.merged_with(&settings.default_flags);
        let bound = HourBound::from_contract(employee.weekly_hours, days.len(), settings.tolerance);
        let rules = applicable_rules(instance.rules, employee);
        let rest_checked = settings
            .rest_transitions
            .constrains(rules.iter().any(|rule| rule.mentions_rest()));

        for (d, &day) in days.iter().enumerate() {
            let count = assignment.assigned_count(e, d);
            if count > 1 {
                violations.push(Violation::MultipleShifts {
                    employee: employee.id.clone(),
                    day,
                    count,
                });
            }

            for (k, template) in catalog.iter() {
                if !assignment.get(e, d, k) {
                    continue;
                }
                let early_ok = !flags.early_only || settings.is_early_template(k);
                if !flags.works_on(day.weekday()) || !early_ok {
                    violations.push(Violation::Unavailable {
                        employee: employee.id.clone(),
                        day,
                        shift: template.start(),
                    });
                }
            }

            if d > 0 {
                let (from, to) = (slot_of(e, d - 1), slot_of(e, d));
                let checked = rest_checked || !(from.is_rest() || to.is_rest());
                if checked && !rules.iter().any(|rule| rule.matches(from, to)) {
                    violations.push(Violation::IllegalTransition {
                        employee: employee.id.clone(),
                        day,
                        from,
                        to,
                    });
                }
            }
        }

        let minutes = (0..days.len())
            .flat_map(|d| (0..catalog.len()).map(move |k| (d, k)))
            .filter(|&(d, k)| assignment.get(e, d, k))
            .map(|(_, k)| catalog.get(k).map_or(0, |t| i64::from(t.duration_minutes())))
            .sum::<i64>();
        if minutes < bound.min_minutes() || minutes > bound.max_minutes() {
            violations.push(Violation::Hours {
                employee: employee.id.clone(),
                hours: minutes as f64 / 60.0,
                min: bound.min(),
                max: bound.max(),
            });
        }
    }

    for requirement in &settings.coverage {
        let Some(k) = catalog.index_of(requirement.shift) else {
            continue;
        };
        for (d, &day) in days.iter().enumerate() {
            let actual = instance
                .employees
                .iter()
                .enumerate()
                .filter(|&(e, employee)| employee.has_role(&requirement.role) && assignment.get(e, d, k))
                .count() as u32;
            if actual != requirement.required {
                violations.push(Violation::Coverage {
                    role: requirement.role.clone(),
                    shift: requirement.shift,
                    day,
                    expected: requirement.required,
                    actual,
                });
            }
        }
    }

    violations
}

/// The general rules followed by the rules of every role `employee` holds.
fn applicable_rules<'r>(rules: &'r SequenceRuleTable, employee: &Employee) -> Vec<&'r SequenceRule> {
    let role_rules = rules
        .roles()
        .filter(|role| employee.has_role(role))
        .flat_map(|role| rules.for_role(role));
    rules.general().iter().chain(role_rules).collect()
}

#[cfg(test)]
mod tests;
