//! Model Builder: encodes employees, days and shift templates as a
//! boolean [`Model`].
//!
//! Variable layout:
//! - one assignment variable per (employee, day, template), employee-major
//!   in catalog order, matching [`Assignment`]
//! - one worked-day variable per (employee, day), after all assignment
//!   variables
//!
//! Besides the model, the builder supplies a day-major branching order and
//! a phase per variable that sketches a schedule: coverage duties handed
//! out round-robin and contracted shifts spread over the remaining days.

use chrono::Datelike;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shiftforge_config::{ConfigError, PlannerConfig, RestTransitions};
use shiftforge_core::{
    Assignment, CoverageRequirement, Employee, EmployeeFlags, Horizon, HourBound,
    LegalSequenceSet, RoleSet, SequenceRuleTable, ShiftCatalog, Slot,
};
use tracing::{debug, info, trace, warn};

use crate::model::{BoolVar, Lit, Model};
use crate::stats::ModelStats;

/// The inputs of one planning run.
#[derive(Debug, Clone, Copy)]
pub struct PlanInstance<'a> {
    pub employees: &'a [Employee],
    pub horizon: &'a Horizon,
    pub rules: &'a SequenceRuleTable,
}

impl<'a> PlanInstance<'a> {
    pub fn new(employees: &'a [Employee], horizon: &'a Horizon, rules: &'a SequenceRuleTable) -> Self {
        Self {
            employees,
            horizon,
            rules,
        }
    }
}

/// Model parameters resolved from a [`PlannerConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub catalog: ShiftCatalog,
    pub tolerance: f64,
    pub coverage: Vec<CoverageRequirement>,
    pub early_shift_cutoff: f64,
    pub rest_transitions: RestTransitions,
    pub default_flags: EmployeeFlags,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            catalog: ShiftCatalog::default(),
            tolerance: shiftforge_config::DEFAULT_TOLERANCE,
            coverage: CoverageRequirement::newsroom_defaults(),
            early_shift_cutoff: shiftforge_config::DEFAULT_EARLY_SHIFT_CUTOFF,
            rest_transitions: RestTransitions::default(),
            default_flags: EmployeeFlags::default(),
        }
    }
}

impl ModelSettings {
    pub fn from_config(config: &PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog: config.catalog()?,
            tolerance: config.tolerance,
            coverage: config.coverage.clone(),
            early_shift_cutoff: config.early_shift_cutoff,
            rest_transitions: config.rest_transitions,
            default_flags: config.default_flags.clone(),
        })
    }

    pub fn with_catalog(mut self, catalog: ShiftCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_coverage(mut self, coverage: Vec<CoverageRequirement>) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_early_shift_cutoff(mut self, cutoff: f64) -> Self {
        self.early_shift_cutoff = cutoff;
        self
    }

    pub fn with_rest_transitions(mut self, rest_transitions: RestTransitions) -> Self {
        self.rest_transitions = rest_transitions;
        self
    }

    pub fn with_default_flags(mut self, flags: EmployeeFlags) -> Self {
        self.default_flags = flags;
        self
    }

    /// Whether an early-only employee may take the template at `index`.
    pub fn is_early_template(&self, index: usize) -> bool {
        self.catalog
            .get(index)
            .is_some_and(|t| t.start().hours() < self.early_shift_cutoff)
    }
}

/// Per-employee data computed once before encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEmployee {
    pub roles: RoleSet,
    pub legal: LegalSequenceSet,
    pub bound: HourBound,
    pub flags: EmployeeFlags,
}

/// Resolves role sets, legal sequence sets, hour bounds and effective
/// flags for every employee of the instance.
pub fn resolve_employees(instance: &PlanInstance<'_>, settings: &ModelSettings) -> Vec<ResolvedEmployee> {
    let days = instance.horizon.len();
    instance
        .employees
        .iter()
        .map(|employee| {
            let roles = employee.role_set();
            let legal = instance.rules.resolve(&roles);
            let bound = HourBound::from_contract(employee.weekly_hours, days, settings.tolerance);
            debug!(
                employee = %employee.id,
                roles = roles.len(),
                legal_transitions = legal.len(),
                min_hours = bound.min(),
                max_hours = bound.max(),
                "Resolved employee"
            );
            ResolvedEmployee {
                roles,
                legal,
                bound,
                flags: employee.flags.merged_with(&settings.default_flags),
            }
        })
        .collect()
}

/// Whether `(from, to)` is constrained and illegal for this legal set.
///
/// Transitions involving rest are constrained as `rest` says; by default
/// only when the legal set itself mentions rest.
pub fn is_forbidden(legal: &LegalSequenceSet, rest: RestTransitions, from: Slot, to: Slot) -> bool {
    if (from.is_rest() || to.is_rest()) && !rest.constrains(legal.mentions_rest()) {
        return false;
    }
    !legal.allows(from, to)
}

/// One daily coverage equality: `required` of `members` on `template`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CoverageSlot {
    template: usize,
    members: Vec<usize>,
    required: usize,
}

/// A fully constrained shift-assignment model.
#[derive(Debug, Clone)]
pub struct ShiftModel {
    model: Model,
    employees: usize,
    days: usize,
    templates: usize,
    resolved: Vec<ResolvedEmployee>,
    coverage: Vec<CoverageSlot>,
    phases: Vec<bool>,
}

impl ShiftModel {
    /// Builds the model for `instance`.
    ///
    /// Never fails: missing role rules fall back to the general rules and
    /// coverage requirements naming an unknown shift are skipped. An
    /// impossible combination surfaces as infeasibility when solving.
    pub fn build(instance: &PlanInstance<'_>, settings: &ModelSettings) -> Self {
        let catalog = &settings.catalog;
        let employees = instance.employees.len();
        let days = instance.horizon.len();
        let templates = catalog.len();

        let mut model = Model::new();
        model.new_vars(employees * days * templates);
        model.new_vars(employees * days);

        let mut shift_model = Self {
            model,
            employees,
            days,
            templates,
            resolved: resolve_employees(instance, settings),
            coverage: Vec::new(),
            phases: Vec::new(),
        };

        shift_model.add_worked_days();
        shift_model.add_sequence_rules(instance.horizon, settings);
        shift_model.add_coverage(instance, settings);
        shift_model.add_hour_bounds(catalog);
        shift_model.add_availability(instance.horizon, settings);
        shift_model.phases = shift_model.initial_phases(instance, settings);

        let stats = shift_model.stats();
        info!(
            employees = stats.employees,
            days = stats.days,
            templates = stats.templates,
            variables = stats.variables,
            constraints = stats.constraints(),
            "Model built"
        );
        shift_model
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn employee_count(&self) -> usize {
        self.employees
    }

    pub fn day_count(&self) -> usize {
        self.days
    }

    pub fn template_count(&self) -> usize {
        self.templates
    }

    pub fn resolved(&self, employee: usize) -> &ResolvedEmployee {
        &self.resolved[employee]
    }

    pub fn assignment_var(&self, employee: usize, day: usize, template: usize) -> BoolVar {
        self.model
            .var((employee * self.days + day) * self.templates + template)
    }

    pub fn worked_var(&self, employee: usize, day: usize) -> BoolVar {
        let base = self.employees * self.days * self.templates;
        self.model.var(base + employee * self.days + day)
    }

    fn day_vars(&self, employee: usize, day: usize) -> Vec<BoolVar> {
        (0..self.templates)
            .map(|k| self.assignment_var(employee, day, k))
            .collect()
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            employees: self.employees,
            days: self.days,
            templates: self.templates,
            variables: self.model.var_count(),
            linear_constraints: self.model.linear_count(),
            clauses: self.model.clause_count(),
            fixed_literals: self.model.fixed().len(),
        }
    }

    /// Every variable, day by day: the day's coverage candidates first,
    /// then for each employee the worked-day variable followed by the
    /// templates.
    ///
    /// With a seed, template order is shuffled per (employee, day) so that
    /// different seeds explore different schedules reproducibly.
    pub fn branching_order(&self, seed: Option<u64>) -> Vec<BoolVar> {
        let mut rng = seed.map(StdRng::seed_from_u64);
        let mut placed = vec![false; self.model.var_count()];
        let mut order = Vec::with_capacity(self.model.var_count());
        let mut place = |var: BoolVar, order: &mut Vec<BoolVar>| {
            if !placed[var.index()] {
                placed[var.index()] = true;
                order.push(var);
            }
        };

        for d in 0..self.days {
            for slot in &self.coverage {
                for &e in &slot.members {
                    place(self.assignment_var(e, d, slot.template), &mut order);
                }
            }
            for e in 0..self.employees {
                place(self.worked_var(e, d), &mut order);
                let mut vars = self.day_vars(e, d);
                if let Some(rng) = rng.as_mut() {
                    vars.shuffle(rng);
                }
                for var in vars {
                    place(var, &mut order);
                }
            }
        }
        order
    }

    /// Preferred first value of every variable, indexed like the model.
    ///
    /// The values sketch a schedule that respects availability, the
    /// sequence rules and the upper hour bounds; the search treats them as
    /// hints only.
    pub fn phase_hints(&self) -> &[bool] {
        &self.phases
    }

    /// Reads the assignment variables out of a solution vector.
    pub fn extract(&self, values: &[bool]) -> Assignment {
        Assignment::from_fn(self.employees, self.days, self.templates, |e, d, k| {
            values[self.assignment_var(e, d, k).index()]
        })
    }

    /// worked(e, d) == sum of the day's assignments, and that sum is at most one.
    fn add_worked_days(&mut self) {
        for e in 0..self.employees {
            for d in 0..self.days {
                let vars = self.day_vars(e, d);
                let worked = self.worked_var(e, d);
                let terms = vars.iter().map(|&v| (v, 1)).chain([(worked, -1)]);
                self.model.add_linear(terms, 0, 0);
                self.model.add_sum_le(&vars, 1);
            }
        }
    }

    fn add_sequence_rules(&mut self, horizon: &Horizon, settings: &ModelSettings) {
        let catalog = &settings.catalog;
        let mut slots: Vec<Slot> = catalog.templates().iter().map(|t| Slot::Shift(t.start())).collect();
        slots.push(Slot::Rest);

        for e in 0..self.employees {
            let legal = &self.resolved[e].legal;
            let forbidden: Vec<(Slot, Slot)> = slots
                .iter()
                .flat_map(|&from| slots.iter().map(move |&to| (from, to)))
                .filter(|&(from, to)| is_forbidden(legal, settings.rest_transitions, from, to))
                .collect();
            for &(from, to) in &forbidden {
                trace!(employee = e, %from, %to, "Forbidden transition");
            }

            for (previous, day) in horizon.adjacent_pairs() {
                for &(from, to) in &forbidden {
                    let premise = self.slot_lit(catalog, e, previous, from);
                    let blocked = self.slot_lit(catalog, e, day, to);
                    self.model.add_implication(premise, !blocked);
                }
            }
        }
    }

    /// Literal that holds when the employee occupies `slot` on `day`.
    fn slot_lit(&self, catalog: &ShiftCatalog, employee: usize, day: usize, slot: Slot) -> Lit {
        match slot {
            Slot::Rest => self.worked_var(employee, day).is_false(),
            Slot::Shift(start) => {
                let k = catalog.index_of(start).unwrap_or_default();
                self.assignment_var(employee, day, k).is_true()
            }
        }
    }

    fn add_coverage(&mut self, instance: &PlanInstance<'_>, settings: &ModelSettings) {
        for requirement in &settings.coverage {
            let Some(k) = settings.catalog.index_of(requirement.shift) else {
                warn!(
                    role = %requirement.role,
                    shift = %requirement.shift,
                    "Skipping coverage requirement for a shift outside the catalog"
                );
                continue;
            };
            let members: Vec<usize> = (0..self.employees)
                .filter(|&e| self.resolved[e].roles.contains(&requirement.role))
                .collect();
            debug!(
                role = %requirement.role,
                shift = %requirement.shift,
                members = members.len(),
                required = requirement.required,
                "Coverage"
            );
            if members.is_empty() && requirement.required > 0 {
                warn!(role = %requirement.role, "No employee holds the coverage role");
            }
            for d in 0..instance.horizon.len() {
                let vars: Vec<BoolVar> = members
                    .iter()
                    .map(|&e| self.assignment_var(e, d, k))
                    .collect();
                self.model.add_sum_eq(&vars, i64::from(requirement.required));
            }
            self.coverage.push(CoverageSlot {
                template: k,
                members,
                required: requirement.required as usize,
            });
        }
    }

    /// Every template lasts the catalog duration, so worked hours are the
    /// worked days times that duration.
    fn add_hour_bounds(&mut self, catalog: &ShiftCatalog) {
        let minutes = i64::from(catalog.duration_minutes());
        for e in 0..self.employees {
            let bound = self.resolved[e].bound;
            let terms: Vec<(BoolVar, i64)> = (0..self.days)
                .map(|d| (self.worked_var(e, d), minutes))
                .collect();
            self.model
                .add_linear(terms, bound.min_minutes(), bound.max_minutes());
        }
    }

    fn add_availability(&mut self, horizon: &Horizon, settings: &ModelSettings) {
        for e in 0..self.employees {
            let flags = self.resolved[e].flags.clone();
            for (d, day) in horizon.days().iter().enumerate() {
                let available = flags.works_on(day.weekday());
                for k in 0..self.templates {
                    let early_ok = !flags.early_only || settings.is_early_template(k);
                    if !available || !early_ok {
                        let var = self.assignment_var(e, d, k);
                        self.model.fix(var.is_false());
                    }
                }
            }
        }
    }

    fn initial_phases(&self, instance: &PlanInstance<'_>, settings: &ModelSettings) -> Vec<bool> {
        let catalog = &settings.catalog;
        let duration = i64::from(catalog.duration_minutes()).max(1);
        let mut open = vec![true; self.model.var_count()];
        for lit in self.model.fixed().iter().filter(|lit| !lit.value()) {
            open[lit.var().index()] = false;
        }
        let mut plan: Vec<Vec<Option<usize>>> = vec![vec![None; self.days]; self.employees];
        let mut counts = vec![0i64; self.employees];
        let max_shifts: Vec<i64> = self
            .resolved
            .iter()
            .map(|r| r.bound.max_minutes() / duration)
            .collect();

        // Coverage duties rotate through the members day after day.
        let mut turn = 0;
        for d in 0..self.days {
            for slot in &self.coverage {
                let k = slot.template;
                let mut needed = slot.required;
                for step in 0..slot.members.len() {
                    if needed == 0 {
                        break;
                    }
                    let e = slot.members[(turn + step) % slot.members.len()];
                    if plan[e][d].is_none()
                        && open[self.assignment_var(e, d, k).index()]
                        && counts[e] < max_shifts[e]
                        && self.fits(settings, &plan[e], e, d, k)
                    {
                        plan[e][d] = Some(k);
                        counts[e] += 1;
                        needed -= 1;
                    }
                }
                turn += 1;
            }
        }

        // Remaining contracted shifts, spread evenly over the free days on
        // templates outside the employee's coverage duties.
        for (e, employee) in instance.employees.iter().enumerate() {
            let bound = self.resolved[e].bound;
            let min_shifts = (bound.min_minutes() + duration - 1) / duration;
            let expected = HourBound::expected_hours(employee.weekly_hours, self.days) * 60.0
                / duration as f64;
            let target = (expected.round() as i64).clamp(min_shifts, max_shifts[e].max(min_shifts));
            let duties: Vec<usize> = self
                .coverage
                .iter()
                .filter(|slot| slot.members.contains(&e))
                .map(|slot| slot.template)
                .collect();
            let (duties, open) = (&duties, &open);
            let candidates = |d: usize| {
                (0..self.templates)
                    .filter(move |k| !duties.contains(k))
                    .filter(move |&k| open[self.assignment_var(e, d, k).index()])
            };

            let free: Vec<usize> = (0..self.days)
                .filter(|&d| plan[e][d].is_none() && candidates(d).next().is_some())
                .collect();
            let wanted = usize::try_from(target - counts[e]).unwrap_or(0).min(free.len());
            for i in 0..wanted {
                let d = free[(2 * i + 1) * free.len() / (2 * wanted)];
                let choice = candidates(d).find(|&k| self.fits(settings, &plan[e], e, d, k));
                if let Some(k) = choice {
                    plan[e][d] = Some(k);
                    counts[e] += 1;
                }
            }
            trace!(employee = e, target, hinted = counts[e], "Phase hints");
        }

        let mut phases = vec![false; self.model.var_count()];
        for (e, row) in plan.iter().enumerate() {
            for (d, template) in row.iter().enumerate() {
                if let Some(k) = *template {
                    phases[self.assignment_var(e, d, k).index()] = true;
                    phases[self.worked_var(e, d).index()] = true;
                }
            }
        }
        phases
    }

    /// Whether `template` on `day` is legal after and before the
    /// neighbouring days already planned in `row`.
    fn fits(
        &self,
        settings: &ModelSettings,
        row: &[Option<usize>],
        employee: usize,
        day: usize,
        template: usize,
    ) -> bool {
        let legal = &self.resolved[employee].legal;
        let slot = |k: Option<usize>| {
            k.and_then(|k| settings.catalog.get(k))
                .map_or(Slot::Rest, |t| Slot::Shift(t.start()))
        };
        let here = slot(Some(template));
        let after_previous =
            day == 0 || !is_forbidden(legal, settings.rest_transitions, slot(row[day - 1]), here);
        let before_next = day + 1 >= row.len()
            || !is_forbidden(legal, settings.rest_transitions, here, slot(row[day + 1]));
        after_previous && before_next
    }
}

#[cfg(test)]
mod tests;
