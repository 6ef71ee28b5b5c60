//! Sequence rules: which shift may follow which on the next day.
//!
//! Rules are stored per role in a [`SequenceRuleTable`] and resolved once
//! per employee into a [`LegalSequenceSet`] before any constraint is
//! encoded.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::catalog::ShiftStart;
use super::employee::{RoleSet, RoleTag};

/// Table key holding the rules that apply to every employee.
pub const GENERAL_KEY: &str = "general";

/// One side of a day-to-day transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// The rest sentinel: no shift that day.
    Rest,
    /// A shift with the given start.
    Shift(ShiftStart),
}

impl Slot {
    /// Maps `None` to the rest sentinel and a start hour to a shift slot.
    ///
    /// Returns `None` if the hour is outside `[0, 24)`.
    pub fn from_hours(hours: Option<f64>) -> Option<Self> {
        match hours {
            None => Some(Slot::Rest),
            Some(h) => ShiftStart::from_hours(h).map(Slot::Shift),
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Slot::Rest)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Rest => f.write_str("rest"),
            Slot::Shift(start) => write!(f, "{start}"),
        }
    }
}

/// A legal transition from one day's slot to the next day's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceRule {
    pub from: Slot,
    pub to: Slot,
}

impl SequenceRule {
    pub fn new(from: Slot, to: Slot) -> Self {
        Self { from, to }
    }

    /// Rule between two shift starts given in fractional hours.
    pub fn between(from: Option<f64>, to: Option<f64>) -> Option<Self> {
        Some(Self::new(Slot::from_hours(from)?, Slot::from_hours(to)?))
    }

    /// Both sides equal, with rest only matching rest.
    pub fn matches(&self, from: Slot, to: Slot) -> bool {
        self.from == from && self.to == to
    }

    pub fn mentions_rest(&self) -> bool {
        self.from.is_rest() || self.to.is_rest()
    }
}

/// Deduplicated union of the general and role-specific rules for one
/// employee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalSequenceSet {
    pairs: HashSet<(Slot, Slot)>,
    mentions_rest: bool,
}

impl LegalSequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: SequenceRule) -> bool {
        self.mentions_rest |= rule.mentions_rest();
        self.pairs.insert((rule.from, rule.to))
    }

    /// Returns true if some rule matches the transition exactly.
    pub fn allows(&self, from: Slot, to: Slot) -> bool {
        self.pairs.contains(&(from, to))
    }

    /// Whether any rule uses the rest sentinel on either side.
    pub fn mentions_rest(&self) -> bool {
        self.mentions_rest
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SequenceRule> + '_ {
        self.pairs.iter().map(|&(from, to)| SequenceRule::new(from, to))
    }
}

impl FromIterator<SequenceRule> for LegalSequenceSet {
    fn from_iter<I: IntoIterator<Item = SequenceRule>>(iter: I) -> Self {
        let mut set = LegalSequenceSet::new();
        for rule in iter {
            set.insert(rule);
        }
        set
    }
}

/// Sequence rules partitioned into a general set and role-specific sets.
///
/// Deserializes from `{"general": [[from, to], ...], "<role>": [...]}`,
/// where `null` is the rest sentinel and numbers are shift start hours.
/// Malformed entries are skipped with a warning.
///
/// # Examples
///
/// ```
/// use shiftforge_core::{RoleSet, RoleTag, SequenceRule, SequenceRuleTable, Slot, ShiftStart};
///
/// let table: SequenceRuleTable = serde_json::from_str(r#"{
///     "general": [[6, 7], [7, null]],
///     "cvd": [[14.5, 6], [6, 7]]
/// }"#).unwrap();
///
/// let roles: RoleSet = [RoleTag::new("CvD")].into_iter().collect();
/// let legal = table.resolve(&roles);
/// assert_eq!(legal.len(), 3);
///
/// let six = Slot::Shift(ShiftStart::from_hours(6.0).unwrap());
/// let half_past_two = Slot::Shift(ShiftStart::from_hours(14.5).unwrap());
/// assert!(legal.allows(half_past_two, six));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceRuleTable {
    general: Vec<SequenceRule>,
    by_role: BTreeMap<RoleTag, Vec<SequenceRule>>,
}

impl SequenceRuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_general(mut self, rules: impl IntoIterator<Item = SequenceRule>) -> Self {
        self.general.extend(rules);
        self
    }

    pub fn with_role(
        mut self,
        role: impl Into<RoleTag>,
        rules: impl IntoIterator<Item = SequenceRule>,
    ) -> Self {
        self.by_role.entry(role.into()).or_default().extend(rules);
        self
    }

    pub fn general(&self) -> &[SequenceRule] {
        &self.general
    }

    /// Rules specific to `role`; empty when the table has no entry for it.
    pub fn for_role(&self, role: &RoleTag) -> &[SequenceRule] {
        self.by_role.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn roles(&self) -> impl Iterator<Item = &RoleTag> {
        self.by_role.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.by_role.values().all(Vec::is_empty)
    }

    /// Resolves the legal sequence set of an employee holding `roles`.
    pub fn resolve(&self, roles: &RoleSet) -> LegalSequenceSet {
        let role_rules = roles.iter().flat_map(|role| self.for_role(role).iter());
        self.general.iter().chain(role_rules).copied().collect()
    }

    fn from_raw(raw: BTreeMap<String, RawRuleList>) -> Self {
        let mut table = SequenceRuleTable::new();
        for (key, list) in raw {
            let entries = match list {
                RawRuleList::List(entries) => entries,
                RawRuleList::Malformed(_) => {
                    warn!(key = %key, "Ignoring sequence rule entry that is not a list");
                    continue;
                }
            };
            let rules: Vec<SequenceRule> = entries
                .into_iter()
                .filter_map(|entry| match entry {
                    RawRule::Pair(from, to) => {
                        let rule = SequenceRule::between(from, to);
                        if rule.is_none() {
                            warn!(key = %key, ?from, ?to, "Ignoring sequence rule outside the day");
                        }
                        rule
                    }
                    RawRule::Malformed(_) => {
                        warn!(key = %key, "Ignoring malformed sequence rule");
                        None
                    }
                })
                .collect();
            if key.trim().eq_ignore_ascii_case(GENERAL_KEY) {
                table.general.extend(rules);
            } else {
                table.by_role.entry(RoleTag::new(&key)).or_default().extend(rules);
            }
        }
        table
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRule {
    Pair(Option<f64>, Option<f64>),
    Malformed(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRuleList {
    List(Vec<RawRule>),
    Malformed(IgnoredAny),
}

impl<'de> Deserialize<'de> for SequenceRuleTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, RawRuleList>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}
