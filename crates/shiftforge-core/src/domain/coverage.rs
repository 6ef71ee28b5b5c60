//! Coverage rules: exact staffing counts per role, shift and day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::ShiftStart;
use super::employee::RoleTag;
use super::horizon::Horizon;

/// Daily requirement: `required` employees holding `role` work the shift
/// starting at `shift` on every day of the horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRequirement {
    pub role: RoleTag,
    pub shift: ShiftStart,
    #[serde(default = "default_required")]
    pub required: u32,
}

fn default_required() -> u32 {
    1
}

impl CoverageRequirement {
    pub fn new(role: impl Into<RoleTag>, shift: ShiftStart, required: u32) -> Self {
        Self {
            role: role.into(),
            shift,
            required,
        }
    }

    /// One supervisor on the 06:00 shift and one on the 14:30 shift.
    pub fn newsroom_defaults() -> Vec<CoverageRequirement> {
        [6.0, 14.5]
            .into_iter()
            .filter_map(ShiftStart::from_hours)
            .map(|shift| CoverageRequirement::new("cvd", shift, 1))
            .collect()
    }

    /// One concrete rule per horizon day.
    pub fn expand(&self, horizon: &Horizon) -> Vec<CoverageRule> {
        horizon
            .days()
            .iter()
            .map(|&day| CoverageRule {
                role: self.role.clone(),
                shift: self.shift,
                day,
                required: self.required,
            })
            .collect()
    }
}

/// Exact count of `role` employees on the `shift` template on `day`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRule {
    pub role: RoleTag,
    pub shift: ShiftStart,
    pub day: NaiveDate,
    pub required: u32,
}

/// Expands every daily requirement over the horizon, in requirement order.
pub fn expand_coverage(requirements: &[CoverageRequirement], horizon: &Horizon) -> Vec<CoverageRule> {
    requirements
        .iter()
        .flat_map(|requirement| requirement.expand(horizon))
        .collect()
}
