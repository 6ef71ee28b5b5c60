//! Planning horizon: the closed range of days being planned.

use std::ops::Range;

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

use crate::error::ValidationError;

/// Date format accepted for horizon bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of days the default horizon reaches past today.
const DEFAULT_HORIZON_REACH: u64 = 7;

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidDate {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })
}

/// An ordered sequence of calendar days without gaps.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use shiftforge_core::Horizon;
///
/// let horizon = Horizon::parse("2025-03-10", "2025-03-16").unwrap();
/// assert_eq!(horizon.len(), 7);
/// assert_eq!(horizon.days()[0], NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
///
/// assert!(Horizon::parse("2025-03-16", "2025-03-10").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Horizon {
    start: NaiveDate,
    end: NaiveDate,
    days: Vec<NaiveDate>,
}

impl Horizon {
    /// Builds the inclusive horizon `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRange` if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidRange { start, end });
        }
        let count = (end - start).num_days() as usize + 1;
        let days = start.iter_days().take(count).collect();
        Ok(Self { start, end, days })
    }

    /// Parses both bounds as `YYYY-MM-DD` and builds the horizon.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Tomorrow through `today + 7` days.
    pub fn starting_after(today: NaiveDate) -> Self {
        let start = today + Days::new(1);
        let end = today + Days::new(DEFAULT_HORIZON_REACH);
        let days = start.iter_days().take(DEFAULT_HORIZON_REACH as usize).collect();
        Self { start, end, days }
    }

    /// The default horizon relative to the local calendar date.
    pub fn default_from_today() -> Self {
        Self::starting_after(Local::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Number of days, `end - start + 1`.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always false; a horizon holds at least one day.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, index: usize) -> Option<NaiveDate> {
        self.days.get(index).copied()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        Some((date - self.start).num_days() as usize)
    }

    /// Index pairs `(d, d + 1)` of adjacent days.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        (1..self.days.len()).map(|d| (d - 1, d))
    }

    /// Splits the horizon into week chunks, each ending on a Sunday or at
    /// the horizon end.
    pub fn week_chunks(&self) -> Vec<Range<usize>> {
        let mut chunks = Vec::new();
        let mut chunk_start = 0;
        for (index, day) in self.days.iter().enumerate() {
            if day.weekday() == Weekday::Sun || index + 1 == self.days.len() {
                chunks.push(chunk_start..index + 1);
                chunk_start = index + 1;
            }
        }
        chunks
    }
}
