//! Conflict-driven search over a boolean [`Model`].
//!
//! Propagation:
//! - linear constraints keep the minimum and maximum reachable activity
//!   under the current partial assignment and force any variable whose
//!   other value would leave the bounds
//! - clauses, from the model or learned, propagate through two watched
//!   literals
//!
//! Every implied literal records its reason. A conflict is resolved back
//! to the first unique implication point of its decision level, the
//! resulting nogood is learned and the search jumps back to the level
//! where the nogood becomes unit. Branching picks the most active free
//! variable, with activities seeded from the caller's order and bumped by
//! conflicts, and values taken from the last phase each variable held.
//! Restarts follow the Luby sequence.
//!
//! Learned clauses are implied by the model, so an exhausted search still
//! proves that no solution exists.

mod heap;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::model::{BoolVar, Constraint, LinearConstraint, Lit, Model};
use crate::stats::SearchStats;
use crate::termination::SearchTermination;

use heap::VarHeap;

/// Conflicts between the first two restarts; later intervals scale it by
/// the Luby sequence.
const RESTART_UNIT: u64 = 100;

/// Learned clauses kept before the first reduction.
const MIN_LEARNED_LIMIT: usize = 1_000;

/// Result of a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A complete assignment satisfying every constraint.
    Solved(Vec<bool>),
    /// The whole search space was explored without a solution.
    Exhausted,
    /// Termination fired before either answer was reached.
    Terminated,
}

/// The side of a linear constraint that is, or would be, violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy)]
enum Reason {
    Decision,
    /// Fixed literals, unit clauses and learned units: true on every level.
    Root,
    Clause(u32),
    Linear { constraint: u32, bound: Bound },
}

#[derive(Debug, Clone, Copy)]
enum Conflict {
    Clause(u32),
    Linear { constraint: u32, bound: Bound },
}

#[derive(Debug, Clone, Copy)]
struct Occurrence {
    constraint: u32,
    coef: i64,
}

/// A clause of at least two literals; the first two are watched.
#[derive(Debug, Clone)]
struct StoredClause {
    lits: SmallVec<[Lit; 4]>,
    learned: bool,
    deleted: bool,
}

/// Search state over one model.
///
/// # Examples
///
/// ```
/// use shiftforge_solver::model::Model;
/// use shiftforge_solver::search::{Search, SearchOutcome};
/// use shiftforge_solver::termination::SearchTermination;
///
/// let mut model = Model::new();
/// let a = model.new_var();
/// let b = model.new_var();
/// model.add_sum_eq(&[a, b], 1);
/// model.fix(a.is_false());
///
/// let mut search = Search::new(&model, SearchTermination::seconds(1));
/// assert_eq!(search.run(&[a, b]), SearchOutcome::Solved(vec![false, true]));
/// ```
#[derive(Debug)]
pub struct Search<'m> {
    model: &'m Model,
    termination: SearchTermination,
    values: Vec<Option<bool>>,
    levels: Vec<usize>,
    reasons: Vec<Reason>,
    trail_index: Vec<usize>,
    trail: Vec<Lit>,
    level_starts: Vec<usize>,
    propagated: usize,
    linear: Vec<&'m LinearConstraint>,
    occurrences: Vec<SmallVec<[Occurrence; 4]>>,
    min_activity: Vec<i64>,
    max_activity: Vec<i64>,
    clauses: Vec<StoredClause>,
    watches: Vec<Vec<u32>>,
    learned_count: usize,
    heap: VarHeap,
    phases: Vec<bool>,
    seen: Vec<bool>,
    stats: SearchStats,
}

impl<'m> Search<'m> {
    pub fn new(model: &'m Model, termination: SearchTermination) -> Self {
        let var_count = model.var_count();
        let mut search = Self {
            model,
            termination,
            values: vec![None; var_count],
            levels: vec![0; var_count],
            reasons: vec![Reason::Decision; var_count],
            trail_index: vec![0; var_count],
            trail: Vec::with_capacity(var_count),
            level_starts: Vec::new(),
            propagated: 0,
            linear: Vec::new(),
            occurrences: vec![SmallVec::new(); var_count],
            min_activity: Vec::new(),
            max_activity: Vec::new(),
            clauses: Vec::new(),
            watches: vec![Vec::new(); 2 * var_count],
            learned_count: 0,
            heap: VarHeap::default(),
            phases: vec![true; var_count],
            seen: vec![false; var_count],
            stats: SearchStats::default(),
        };

        for constraint in model.constraints() {
            match constraint {
                Constraint::Linear(linear) => search.add_linear(linear),
                // Shorter clauses are settled at the root.
                Constraint::Clause(clause) if clause.lits().len() >= 2 => {
                    search.attach_clause(SmallVec::from_slice(clause.lits()), false);
                }
                Constraint::Clause(_) => {}
            }
        }
        search
    }

    /// Sets the value each variable takes when first branched on.
    ///
    /// Hints are ignored unless there is exactly one per variable. Without
    /// hints every variable is tried true first.
    pub fn with_phases(mut self, phases: &[bool]) -> Self {
        if phases.len() == self.phases.len() {
            self.phases.copy_from_slice(phases);
        } else {
            debug!(
                hints = phases.len(),
                variables = self.phases.len(),
                "Ignoring phase hints of the wrong length"
            );
        }
        self
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Runs the search, initially branching on `order` first and on any
    /// remaining variable afterwards in index order.
    pub fn run(&mut self, order: &[BoolVar]) -> SearchOutcome {
        self.stats.start();
        self.heap = VarHeap::new(self.initial_activity(order));

        if !self.propagate_root() {
            debug!("Conflict at root, model is infeasible");
            return SearchOutcome::Exhausted;
        }

        let mut restarts = 0;
        let mut restart_limit = RESTART_UNIT * luby(restarts);
        let mut conflicts_since_restart = 0;
        let mut learned_limit = MIN_LEARNED_LIMIT.max(self.model.constraint_count() / 3);

        loop {
            if let Err(conflict) = self.propagate() {
                self.stats.record_conflict();
                conflicts_since_restart += 1;
                if !self.learn_from(conflict) {
                    debug!(
                        conflicts = self.stats.conflicts,
                        learned = self.stats.learned,
                        "Conflict at root, search space exhausted"
                    );
                    return SearchOutcome::Exhausted;
                }
                continue;
            }

            if conflicts_since_restart >= restart_limit {
                restarts += 1;
                restart_limit = RESTART_UNIT * luby(restarts);
                conflicts_since_restart = 0;
                self.stats.record_restart();
                self.backtrack(0);
                if self.learned_count > learned_limit {
                    self.reduce_learned();
                    learned_limit += learned_limit / 10;
                }
                trace!(restarts, next_after = restart_limit, "Restart");
                continue;
            }

            let Some(var) = self.next_branch() else {
                debug!(
                    nodes = self.stats.nodes,
                    conflicts = self.stats.conflicts,
                    restarts = self.stats.restarts,
                    "Search found a solution"
                );
                return SearchOutcome::Solved(self.solution());
            };

            if self
                .termination
                .is_terminated(self.stats.elapsed(), self.stats.nodes)
            {
                debug!(nodes = self.stats.nodes, "Search terminated");
                return SearchOutcome::Terminated;
            }

            let lit = Lit::new(var, self.phases[var.index()]);
            self.level_starts.push(self.trail.len());
            self.stats.record_node(self.decision_level());
            trace!(%var, value = lit.value(), level = self.decision_level(), "Decide");
            self.enqueue(lit, Reason::Decision);
        }
    }

    /// Activities in `(0, 1]` decreasing along the caller's order, so the
    /// first descent follows it until conflicts say otherwise.
    fn initial_activity(&self, order: &[BoolVar]) -> Vec<f64> {
        let count = self.values.len();
        let mut rank = vec![usize::MAX; count];
        let mut next = 0;
        for var in order {
            if rank[var.index()] == usize::MAX {
                rank[var.index()] = next;
                next += 1;
            }
        }
        for slot in rank.iter_mut().filter(|r| **r == usize::MAX) {
            *slot = next;
            next += 1;
        }
        rank.iter()
            .map(|&r| (count - r) as f64 / count as f64)
            .collect()
    }

    fn solution(&self) -> Vec<bool> {
        self.values.iter().map(|v| v.unwrap_or(false)).collect()
    }

    fn decision_level(&self) -> usize {
        self.level_starts.len()
    }

    fn next_branch(&mut self) -> Option<BoolVar> {
        while let Some(index) = self.heap.pop() {
            if self.values[index].is_none() {
                return Some(self.model.var(index));
            }
        }
        None
    }

    fn add_linear(&mut self, linear: &'m LinearConstraint) {
        let id = self.linear.len() as u32;
        let (mut min, mut max) = (0, 0);
        for term in linear.terms() {
            self.occurrences[term.var.index()].push(Occurrence {
                constraint: id,
                coef: term.coef,
            });
            if term.coef < 0 {
                min += term.coef;
            } else {
                max += term.coef;
            }
        }
        self.linear.push(linear);
        self.min_activity.push(min);
        self.max_activity.push(max);
    }

    fn attach_clause(&mut self, lits: SmallVec<[Lit; 4]>, learned: bool) -> u32 {
        let id = self.clauses.len() as u32;
        self.watches[lit_code(lits[0])].push(id);
        self.watches[lit_code(lits[1])].push(id);
        self.clauses.push(StoredClause {
            lits,
            learned,
            deleted: false,
        });
        id
    }

    fn propagate_root(&mut self) -> bool {
        let model = self.model;
        let mut root_lits = model.fixed().to_vec();
        for constraint in model.constraints() {
            if let Constraint::Clause(clause) = constraint {
                match clause.lits() {
                    [] => return false,
                    [lit] => root_lits.push(*lit),
                    _ => {}
                }
            }
        }
        for lit in root_lits {
            match lit_value(&self.values, lit) {
                Some(true) => {}
                Some(false) => return false,
                None => self.enqueue(lit, Reason::Root),
            }
        }
        for id in 0..self.linear.len() {
            if self.check_linear(id).is_err() {
                return false;
            }
        }
        self.propagate().is_ok()
    }

    /// Makes the unassigned `lit` hold on the current level.
    fn enqueue(&mut self, lit: Lit, reason: Reason) {
        let index = lit.var().index();
        debug_assert!(self.values[index].is_none());
        self.values[index] = Some(lit.value());
        self.levels[index] = self.decision_level();
        self.reasons[index] = reason;
        self.trail_index[index] = self.trail.len();
        self.trail.push(lit);
        self.stats.record_propagation();
        self.shift_activity(lit.var(), lit.value(), 1);
    }

    /// Undoes every level above `level`, saving the phases of the undone
    /// variables.
    fn backtrack(&mut self, level: usize) {
        let Some(&start) = self.level_starts.get(level) else {
            return;
        };
        while self.trail.len() > start {
            let Some(lit) = self.trail.pop() else { break };
            let index = lit.var().index();
            self.values[index] = None;
            self.phases[index] = lit.value();
            self.shift_activity(lit.var(), lit.value(), -1);
            self.heap.insert(index);
        }
        self.level_starts.truncate(level);
        self.propagated = self.trail.len();
    }

    /// Applies (`sign = 1`) or reverts (`sign = -1`) the effect of fixing
    /// `var` to `value` on the activity bounds of its linear constraints.
    fn shift_activity(&mut self, var: BoolVar, value: bool, sign: i64) {
        for occurrence in &self.occurrences[var.index()] {
            let (index, coef) = (occurrence.constraint as usize, occurrence.coef);
            match (value, coef > 0) {
                (true, true) => self.min_activity[index] += sign * coef,
                (true, false) => self.max_activity[index] += sign * coef,
                (false, true) => self.max_activity[index] -= sign * coef,
                (false, false) => self.min_activity[index] -= sign * coef,
            }
        }
    }

    fn propagate(&mut self) -> Result<(), Conflict> {
        while self.propagated < self.trail.len() {
            let lit = self.trail[self.propagated];
            self.propagated += 1;
            self.propagate_clauses(!lit)?;
            let index = lit.var().index();
            for i in 0..self.occurrences[index].len() {
                let constraint = self.occurrences[index][i].constraint;
                self.check_linear(constraint as usize)?;
            }
        }
        Ok(())
    }

    /// Visits the clauses watching `false_lit`, which has just become false.
    fn propagate_clauses(&mut self, false_lit: Lit) -> Result<(), Conflict> {
        let watch = lit_code(false_lit);
        let mut watchers = std::mem::take(&mut self.watches[watch]);
        let mut kept = 0;
        let mut next = 0;
        let mut result = Ok(());

        while next < watchers.len() {
            let id = watchers[next];
            next += 1;
            let clause = &mut self.clauses[id as usize];
            if clause.deleted {
                continue;
            }
            if clause.lits[0] == false_lit {
                clause.lits.swap(0, 1);
            }
            let other = clause.lits[0];
            if lit_value(&self.values, other) == Some(true) {
                watchers[kept] = id;
                kept += 1;
                continue;
            }

            let replacement = (2..clause.lits.len())
                .find(|&i| lit_value(&self.values, clause.lits[i]) != Some(false));
            if let Some(i) = replacement {
                clause.lits.swap(1, i);
                self.watches[lit_code(clause.lits[1])].push(id);
                continue;
            }

            watchers[kept] = id;
            kept += 1;
            if lit_value(&self.values, other) == Some(false) {
                result = Err(Conflict::Clause(id));
                break;
            }
            self.enqueue(other, Reason::Clause(id));
        }

        while next < watchers.len() {
            watchers[kept] = watchers[next];
            kept += 1;
            next += 1;
        }
        watchers.truncate(kept);
        let added = std::mem::replace(&mut self.watches[watch], watchers);
        self.watches[watch].extend(added);
        result
    }

    fn check_linear(&mut self, id: usize) -> Result<(), Conflict> {
        let linear = self.linear[id];
        let (lower, upper) = (linear.lower(), linear.upper());
        self.linear_violation(id, lower, upper)?;
        for term in linear.terms() {
            if self.values[term.var.index()].is_some() {
                continue;
            }
            let (min, max, coef) = (self.min_activity[id], self.max_activity[id], term.coef);
            // Each value moves exactly one of the two bounds by |coef|.
            let forced = if coef > 0 {
                if min + coef > upper {
                    Some((false, Bound::Upper))
                } else if max - coef < lower {
                    Some((true, Bound::Lower))
                } else {
                    None
                }
            } else if max + coef < lower {
                Some((false, Bound::Lower))
            } else if min - coef > upper {
                Some((true, Bound::Upper))
            } else {
                None
            };
            if let Some((value, bound)) = forced {
                let reason = Reason::Linear {
                    constraint: id as u32,
                    bound,
                };
                self.enqueue(Lit::new(term.var, value), reason);
                self.linear_violation(id, lower, upper)?;
            }
        }
        Ok(())
    }

    fn linear_violation(&self, id: usize, lower: i64, upper: i64) -> Result<(), Conflict> {
        let constraint = id as u32;
        if self.min_activity[id] > upper {
            Err(Conflict::Linear {
                constraint,
                bound: Bound::Upper,
            })
        } else if self.max_activity[id] < lower {
            Err(Conflict::Linear {
                constraint,
                bound: Bound::Lower,
            })
        } else {
            Ok(())
        }
    }

    /// Literals, true on the trail before position `before`, that push the
    /// activity of a linear constraint towards `bound`: those raising the
    /// minimum for the upper bound, those lowering the maximum for the
    /// lower bound.
    fn linear_reason(&self, id: usize, bound: Bound, before: usize) -> Vec<Lit> {
        self.linear[id]
            .terms()
            .iter()
            .filter_map(|term| {
                let index = term.var.index();
                let value = self.values[index]?;
                if self.trail_index[index] >= before {
                    return None;
                }
                let raises_min = value == (term.coef > 0);
                (raises_min == (bound == Bound::Upper)).then(|| Lit::new(term.var, value))
            })
            .collect()
    }

    /// True literals that together violate a constraint.
    fn conflict_lits(&self, conflict: Conflict) -> Vec<Lit> {
        match conflict {
            Conflict::Clause(id) => self.clauses[id as usize].lits.iter().map(|&l| !l).collect(),
            Conflict::Linear { constraint, bound } => {
                self.linear_reason(constraint as usize, bound, usize::MAX)
            }
        }
    }

    /// True literals that implied `lit` when it was propagated.
    fn explain(&self, lit: Lit) -> Vec<Lit> {
        let index = lit.var().index();
        match self.reasons[index] {
            Reason::Clause(id) => self.clauses[id as usize]
                .lits
                .iter()
                .filter(|l| l.var() != lit.var())
                .map(|&l| !l)
                .collect(),
            Reason::Linear { constraint, bound } => {
                self.linear_reason(constraint as usize, bound, self.trail_index[index])
            }
            Reason::Decision | Reason::Root => Vec::new(),
        }
    }

    /// Learns a nogood from `conflict`, jumps back and asserts it.
    ///
    /// Returns `false` when the conflict holds on level 0.
    fn learn_from(&mut self, conflict: Conflict) -> bool {
        let lits = self.conflict_lits(conflict);
        let conflict_level = lits
            .iter()
            .map(|l| self.levels[l.var().index()])
            .max()
            .unwrap_or(0);
        if conflict_level == 0 {
            return false;
        }
        // A linear conflict found late can lie entirely below the current level.
        self.backtrack(conflict_level);

        let (learned, jump_level) = self.analyze(lits);
        self.stats.record_backtrack();
        self.backtrack(jump_level);
        self.heap.decay();

        let asserting = learned[0];
        self.stats.record_learned();
        if learned.len() == 1 {
            self.enqueue(asserting, Reason::Root);
        } else {
            let id = self.attach_clause(learned, true);
            self.learned_count += 1;
            self.enqueue(asserting, Reason::Clause(id));
        }
        true
    }

    /// First-UIP analysis. Returns the learned clause, asserting literal
    /// first and a literal of the jump level second, and the jump level.
    fn analyze(&mut self, conflict: Vec<Lit>) -> (SmallVec<[Lit; 4]>, usize) {
        let level = self.decision_level();
        let mut learned: SmallVec<[Lit; 4]> = SmallVec::new();
        let mut pending = 0usize;
        let mut antecedents = conflict;
        let mut cursor = self.trail.len();

        let uip = loop {
            for &lit in &antecedents {
                let index = lit.var().index();
                if self.seen[index] || self.levels[index] == 0 {
                    continue;
                }
                self.seen[index] = true;
                self.heap.bump(index);
                if self.levels[index] >= level {
                    pending += 1;
                } else {
                    learned.push(!lit);
                }
            }
            let lit = loop {
                cursor -= 1;
                let lit = self.trail[cursor];
                if self.seen[lit.var().index()] {
                    break lit;
                }
            };
            self.seen[lit.var().index()] = false;
            pending -= 1;
            if pending == 0 {
                break lit;
            }
            antecedents = self.explain(lit);
        };

        for lit in &learned {
            self.seen[lit.var().index()] = false;
        }
        learned.insert(0, !uip);

        let deepest = (1..learned.len())
            .map(|i| (i, self.levels[learned[i].var().index()]))
            .max_by_key(|&(_, l)| l);
        let jump_level = match deepest {
            Some((i, l)) => {
                learned.swap(1, i);
                l
            }
            None => 0,
        };
        (learned, jump_level)
    }

    /// Drops the longer half of the learned clauses.
    ///
    /// Only called on level 0, where no literal whose reason may be
    /// dropped is ever explained again.
    fn reduce_learned(&mut self) {
        let mut learned: Vec<usize> = self
            .clauses
            .iter()
            .enumerate()
            .filter(|(_, c)| c.learned && !c.deleted)
            .map(|(i, _)| i)
            .collect();
        learned.sort_by_key(|&i| self.clauses[i].lits.len());
        let keep = learned.len() / 2;
        for &i in &learned[keep..] {
            let clause = &mut self.clauses[i];
            clause.deleted = true;
            clause.lits = SmallVec::new();
        }
        debug!(kept = keep, dropped = learned.len() - keep, "Reduced learned clauses");
        self.learned_count = keep;
    }
}

fn lit_code(lit: Lit) -> usize {
    lit.var().index() * 2 + usize::from(lit.value())
}

fn lit_value(values: &[Option<bool>], lit: Lit) -> Option<bool> {
    values[lit.var().index()].map(|value| value == lit.value())
}

/// The Luby sequence 1, 1, 2, 1, 1, 2, 4, 1, ... at `index`.
fn luby(mut index: u64) -> u64 {
    let mut size = 1;
    let mut exponent = 0;
    while size < index + 1 {
        exponent += 1;
        size = 2 * size + 1;
    }
    while size - 1 != index {
        size = (size - 1) >> 1;
        exponent -= 1;
        index %= size;
    }
    1 << exponent
}
