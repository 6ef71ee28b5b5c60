//! Date and horizon fixtures.

use chrono::NaiveDate;
use shiftforge_core::Horizon;

/// Parses a `YYYY-MM-DD` literal.
///
/// # Panics
///
/// Panics on a malformed literal.
pub fn date(input: &str) -> NaiveDate {
    shiftforge_core::domain::parse_date(input).expect("fixture date literal")
}

/// Monday 2025-03-10 through Sunday 2025-03-16.
pub fn week_horizon() -> Horizon {
    horizon("2025-03-10", 7)
}

/// `days` consecutive days starting at `start`.
pub fn horizon(start: &str, days: u64) -> Horizon {
    let start = date(start);
    let end = start + chrono::Days::new(days.saturating_sub(1));
    Horizon::new(start, end).expect("fixture horizon")
}
