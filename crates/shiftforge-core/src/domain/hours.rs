//! Per-employee bounds on total assigned hours.

/// Permitted `[min, max]` total hours over the horizon, in whole hours.
///
/// # Examples
///
/// ```
/// use shiftforge_core::HourBound;
///
/// // 40 contracted hours over 7 days with a 10% tolerance.
/// let bound = HourBound::from_contract(40.0, 7, 0.1);
/// assert_eq!((bound.min(), bound.max()), (36, 44));
/// assert!(bound.contains(40.0));
/// assert!(!bound.contains(48.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourBound {
    min: i64,
    max: i64,
}

impl HourBound {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Contracted weekly hours scaled to `horizon_days`, widened by
    /// `tolerance` on both sides and rounded to whole hours.
    pub fn from_contract(weekly_hours: f64, horizon_days: usize, tolerance: f64) -> Self {
        let expected = Self::expected_hours(weekly_hours, horizon_days);
        let min = (expected * (1.0 - tolerance)).round() as i64;
        let max = (expected * (1.0 + tolerance)).round() as i64;
        Self {
            min: min.max(0),
            max: max.max(0),
        }
    }

    /// Contracted hours for a horizon of `horizon_days` days.
    pub fn expected_hours(weekly_hours: f64, horizon_days: usize) -> f64 {
        weekly_hours * horizon_days as f64 / 7.0
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn min_minutes(&self) -> i64 {
        self.min * 60
    }

    pub fn max_minutes(&self) -> i64 {
        self.max * 60
    }

    pub fn contains(&self, hours: f64) -> bool {
        hours >= self.min as f64 && hours <= self.max as f64
    }
}
