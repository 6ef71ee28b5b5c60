//! Boolean constraint model.
//!
//! A [`Model`] is a set of boolean variables together with:
//! - linear constraints `lower <= sum(coef * x) <= upper` over integer coefficients
//! - clauses: disjunctions of literals
//! - literals fixed at the root
//!
//! The model has no objective; any assignment satisfying every constraint
//! is a solution.

use std::fmt;
use std::ops::Not;

use smallvec::SmallVec;

/// Handle of a boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoolVar(u32);

impl BoolVar {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Literal that holds when the variable is true.
    pub fn is_true(self) -> Lit {
        Lit::new(self, true)
    }

    /// Literal that holds when the variable is false.
    pub fn is_false(self) -> Lit {
        Lit::new(self, false)
    }
}

impl fmt::Display for BoolVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A variable together with the value that satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    var: BoolVar,
    value: bool,
}

impl Lit {
    pub fn new(var: BoolVar, value: bool) -> Self {
        Self { var, value }
    }

    pub fn var(self) -> BoolVar {
        self.var
    }

    pub fn value(self) -> bool {
        self.value
    }

    /// Whether the literal holds under `values`.
    pub fn holds(self, values: &[bool]) -> bool {
        values[self.var.index()] == self.value
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        Lit::new(self.var, !self.value)
    }
}

/// One `coef * var` summand of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearTerm {
    pub var: BoolVar,
    pub coef: i64,
}

/// `lower <= sum(coef * var) <= upper`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    terms: Vec<LinearTerm>,
    lower: i64,
    upper: i64,
}

impl LinearConstraint {
    pub fn terms(&self) -> &[LinearTerm] {
        &self.terms
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// Value of the left-hand side under `values`.
    pub fn activity(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|t| values[t.var.index()])
            .map(|t| t.coef)
            .sum()
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let activity = self.activity(values);
        self.lower <= activity && activity <= self.upper
    }
}

/// Disjunction of literals. An empty clause can never hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    lits: SmallVec<[Lit; 4]>,
}

impl Clause {
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        self.lits.iter().any(|lit| lit.holds(values))
    }
}

/// A constraint of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Linear(LinearConstraint),
    Clause(Clause),
}

impl Constraint {
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        match self {
            Constraint::Linear(linear) => linear.is_satisfied(values),
            Constraint::Clause(clause) => clause.is_satisfied(values),
        }
    }
}

/// A satisfaction model over boolean variables.
///
/// # Examples
///
/// ```
/// use shiftforge_solver::model::Model;
///
/// let mut model = Model::new();
/// let a = model.new_var();
/// let b = model.new_var();
///
/// model.add_sum_le(&[a, b], 1);
/// model.add_clause([a.is_true(), b.is_true()]);
///
/// assert!(model.is_satisfied_by(&[true, false]));
/// assert!(!model.is_satisfied_by(&[true, true]));
/// assert!(!model.is_satisfied_by(&[false, false]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Model {
    var_count: u32,
    constraints: Vec<Constraint>,
    fixed: Vec<Lit>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_var(&mut self) -> BoolVar {
        let var = BoolVar(self.var_count);
        self.var_count += 1;
        var
    }

    /// Creates `count` consecutive variables and returns the first.
    pub fn new_vars(&mut self, count: usize) -> BoolVar {
        let first = BoolVar(self.var_count);
        self.var_count += count as u32;
        first
    }

    /// Variable handle for a raw index created earlier.
    pub fn var(&self, index: usize) -> BoolVar {
        debug_assert!(index < self.var_count as usize);
        BoolVar(index as u32)
    }

    /// Adds `lower <= sum(coef * var) <= upper`. Zero coefficients are dropped.
    pub fn add_linear(
        &mut self,
        terms: impl IntoIterator<Item = (BoolVar, i64)>,
        lower: i64,
        upper: i64,
    ) -> usize {
        let terms = terms
            .into_iter()
            .filter(|&(_, coef)| coef != 0)
            .map(|(var, coef)| LinearTerm { var, coef })
            .collect();
        self.push(Constraint::Linear(LinearConstraint {
            terms,
            lower,
            upper,
        }))
    }

    /// Adds `sum(vars) == target`.
    pub fn add_sum_eq(&mut self, vars: &[BoolVar], target: i64) -> usize {
        self.add_linear(vars.iter().map(|&v| (v, 1)), target, target)
    }

    /// Adds `sum(vars) <= upper`.
    pub fn add_sum_le(&mut self, vars: &[BoolVar], upper: i64) -> usize {
        self.add_linear(vars.iter().map(|&v| (v, 1)), 0, upper)
    }

    /// Adds the disjunction of `lits`.
    pub fn add_clause(&mut self, lits: impl IntoIterator<Item = Lit>) -> usize {
        self.push(Constraint::Clause(Clause {
            lits: lits.into_iter().collect(),
        }))
    }

    /// Adds `premise => conclusion`.
    pub fn add_implication(&mut self, premise: Lit, conclusion: Lit) -> usize {
        self.add_clause([!premise, conclusion])
    }

    /// Fixes a literal at the root.
    pub fn fix(&mut self, lit: Lit) {
        self.fixed.push(lit);
    }

    pub fn var_count(&self) -> usize {
        self.var_count as usize
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn linear_count(&self) -> usize {
        self.constraints
            .iter()
            .filter(|c| matches!(c, Constraint::Linear(_)))
            .count()
    }

    pub fn clause_count(&self) -> usize {
        self.constraints
            .iter()
            .filter(|c| matches!(c, Constraint::Clause(_)))
            .count()
    }

    pub fn fixed(&self) -> &[Lit] {
        &self.fixed
    }

    /// Checks a complete assignment against every constraint and fixed literal.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        values.len() == self.var_count()
            && self.fixed.iter().all(|lit| lit.holds(values))
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }

    fn push(&mut self, constraint: Constraint) -> usize {
        self.constraints.push(constraint);
        self.constraints.len() - 1
    }
}
