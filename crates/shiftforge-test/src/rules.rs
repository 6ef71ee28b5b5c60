//! Sequence rule fixtures over the stock catalog.

use shiftforge_core::{SequenceRule, SequenceRuleTable, ShiftCatalog, Slot};

/// Serialized rule table: every stock transition except early to early,
/// plus a malformed entry that loaders must skip.
pub const RULES_JSON: &str = r#"{
    "general": [
        [6, 7], [6, 7.5], [6, 8], [6, 9], [6, 10], [6, 14.5],
        [7, 6], [7, 7], [7, 7.5], [7, 8], [7, 9], [7, 10], [7, 14.5],
        [7.5, 6], [7.5, 7], [7.5, 7.5], [7.5, 8], [7.5, 9], [7.5, 10], [7.5, 14.5],
        [8, 6], [8, 7], [8, 7.5], [8, 8], [8, 9], [8, 10], [8, 14.5],
        [9, 6], [9, 7], [9, 7.5], [9, 8], [9, 9], [9, 10], [9, 14.5],
        [10, 6], [10, 7], [10, 7.5], [10, 8], [10, 9], [10, 10], [10, 14.5],
        [14.5, 6], [14.5, 7], [14.5, 7.5], [14.5, 8], [14.5, 9], [14.5, 10], [14.5, 14.5],
        "broken"
    ],
    "CvD": []
}"#;

/// Every shift-to-shift transition of `catalog`.
pub fn all_shift_transitions(catalog: &ShiftCatalog) -> Vec<SequenceRule> {
    let slots: Vec<Slot> = catalog
        .templates()
        .iter()
        .map(|t| Slot::Shift(t.start()))
        .collect();
    slots
        .iter()
        .flat_map(|&from| slots.iter().map(move |&to| SequenceRule::new(from, to)))
        .collect()
}

/// General rules allowing every transition of the stock catalog.
pub fn permissive_rules() -> SequenceRuleTable {
    SequenceRuleTable::new().with_general(all_shift_transitions(&ShiftCatalog::default()))
}

/// Every stock transition except the earliest shift on two consecutive days.
pub fn no_early_repeat_rules() -> SequenceRuleTable {
    let catalog = ShiftCatalog::default();
    let early = Slot::Shift(catalog.templates()[catalog.earliest_index()].start());
    let rules = all_shift_transitions(&catalog)
        .into_iter()
        .filter(|rule| !(rule.from == early && rule.to == early));
    SequenceRuleTable::new().with_general(rules)
}
