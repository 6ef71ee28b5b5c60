//! Shift templates and the catalog shared by all employees.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const MINUTES_PER_HOUR: f64 = 60.0;
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Start of a shift, in whole minutes since midnight.
///
/// Fractional hours are rounded to the nearest minute, so `7.5` is 07:30.
/// Serialized as fractional hours.
///
/// # Examples
///
/// ```
/// use shiftforge_core::ShiftStart;
///
/// let start = ShiftStart::from_hours(14.5).unwrap();
/// assert_eq!(start.minutes(), 870);
/// assert_eq!(start.to_string(), "14:30");
/// assert!(ShiftStart::from_hours(24.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftStart(u32);

impl ShiftStart {
    /// Creates a start from minutes since midnight, or `None` past 23:59.
    pub const fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    /// Creates a start from fractional hours in `[0, 24)`.
    pub fn from_hours(hours: f64) -> Option<Self> {
        if !hours.is_finite() || hours < 0.0 {
            return None;
        }
        let minutes = (hours * MINUTES_PER_HOUR).round();
        if minutes >= f64::from(MINUTES_PER_DAY) {
            return None;
        }
        Some(Self(minutes as u32))
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    pub fn hours(self) -> f64 {
        f64::from(self.0) / MINUTES_PER_HOUR
    }
}

impl fmt::Display for ShiftStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for ShiftStart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.hours())
    }
}

impl<'de> Deserialize<'de> for ShiftStart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hours = f64::deserialize(deserializer)?;
        ShiftStart::from_hours(hours).ok_or_else(|| {
            serde::de::Error::custom(format!("shift start {hours} is outside [0, 24)"))
        })
    }
}

/// A fixed (start, duration) pair: one possible daily work slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftTemplate {
    start: ShiftStart,
    duration_minutes: u32,
}

impl ShiftTemplate {
    pub fn new(start: ShiftStart, duration_minutes: u32) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    pub fn start(&self) -> ShiftStart {
        self.start
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes) / MINUTES_PER_HOUR
    }

    /// End in minutes since the start day's midnight; may exceed one day.
    pub fn end_minutes(&self) -> u32 {
        self.start.minutes() + self.duration_minutes
    }
}

/// The ordered set of shift templates available on every day.
///
/// All templates share one fixed duration. Catalog order is the
/// deterministic scan order used when reading an assignment back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCatalog {
    templates: Vec<ShiftTemplate>,
    duration_minutes: u32,
}

impl ShiftCatalog {
    /// Start times of the stock newsroom catalog.
    pub const DEFAULT_STARTS: [f64; 7] = [6.0, 7.0, 7.5, 8.0, 9.0, 10.0, 14.5];

    /// Duration of every stock template.
    pub const DEFAULT_DURATION_HOURS: f64 = 8.0;

    /// Builds a catalog from fractional start hours and one duration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidCatalog` if the catalog is empty,
    /// a start lies outside `[0, 24)`, two starts coincide, or the duration
    /// is not within `(0, 24]` hours.
    pub fn new(starts: &[f64], duration_hours: f64) -> Result<Self, ValidationError> {
        if starts.is_empty() {
            return Err(ValidationError::InvalidCatalog(
                "catalog needs at least one shift start".to_string(),
            ));
        }
        if !duration_hours.is_finite() || duration_hours <= 0.0 || duration_hours > 24.0 {
            return Err(ValidationError::InvalidCatalog(format!(
                "shift duration {duration_hours}h is outside (0, 24]"
            )));
        }
        let duration_minutes = (duration_hours * MINUTES_PER_HOUR).round() as u32;

        let mut templates: Vec<ShiftTemplate> = Vec::with_capacity(starts.len());
        for &hours in starts {
            let start = ShiftStart::from_hours(hours).ok_or_else(|| {
                ValidationError::InvalidCatalog(format!("shift start {hours} is outside [0, 24)"))
            })?;
            if templates.iter().any(|t| t.start == start) {
                return Err(ValidationError::InvalidCatalog(format!(
                    "duplicate shift start {start}"
                )));
            }
            templates.push(ShiftTemplate::new(start, duration_minutes));
        }

        Ok(Self {
            templates,
            duration_minutes,
        })
    }

    pub fn templates(&self) -> &[ShiftTemplate] {
        &self.templates
    }

    pub fn get(&self, index: usize) -> Option<&ShiftTemplate> {
        self.templates.get(index)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn index_of(&self, start: ShiftStart) -> Option<usize> {
        self.templates.iter().position(|t| t.start == start)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes) / MINUTES_PER_HOUR
    }

    /// Index of the template with the earliest start.
    pub fn earliest_index(&self) -> usize {
        self.templates
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.start)
            .map(|(index, _)| index)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ShiftTemplate)> {
        self.templates.iter().enumerate()
    }
}

impl Default for ShiftCatalog {
    fn default() -> Self {
        let duration_minutes = (Self::DEFAULT_DURATION_HOURS * MINUTES_PER_HOUR) as u32;
        let templates = Self::DEFAULT_STARTS
            .iter()
            .filter_map(|&hours| ShiftStart::from_hours(hours))
            .map(|start| ShiftTemplate::new(start, duration_minutes))
            .collect();
        Self {
            templates,
            duration_minutes,
        }
    }
}
