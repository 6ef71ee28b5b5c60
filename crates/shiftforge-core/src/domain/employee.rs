//! Employees, role tags and availability flags.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A case-insensitive role tag such as `cvd` or `sport`.
///
/// Tags are trimmed and lowercased on construction, so `"CvD"` and `"cvd"`
/// name the same role.
///
/// # Examples
///
/// ```
/// use shiftforge_core::RoleTag;
///
/// assert_eq!(RoleTag::new(" CvD "), RoleTag::new("cvd"));
/// assert_eq!(RoleTag::new("CVD").as_str(), "cvd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoleTag(String);

impl RoleTag {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RoleTag {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl From<&str> for RoleTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<RoleTag> for String {
    fn from(tag: RoleTag) -> Self {
        tag.0
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, deduplicated set of role tags held by one employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RoleTag>", into = "Vec<RoleTag>")]
pub struct RoleSet(BTreeSet<RoleTag>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tag. Empty tags are ignored.
    pub fn insert(&mut self, tag: RoleTag) -> bool {
        if tag.is_empty() {
            return false;
        }
        self.0.insert(tag)
    }

    pub fn contains(&self, tag: &RoleTag) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RoleTag> for RoleSet {
    fn from_iter<I: IntoIterator<Item = RoleTag>>(iter: I) -> Self {
        let mut set = RoleSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl From<Vec<RoleTag>> for RoleSet {
    fn from(tags: Vec<RoleTag>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<RoleTag> {
    fn from(set: RoleSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// Optional per-employee availability flags.
///
/// Unknown flags in an employee record are ignored; absent flags fall back
/// to "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeFlags {
    /// Only shifts starting before the configured early-shift cutoff.
    pub early_only: bool,

    /// Weekdays on which the employee never works (e.g. "never Mondays").
    pub excluded_weekdays: Vec<Weekday>,
}

impl EmployeeFlags {
    pub fn early_only() -> Self {
        Self {
            early_only: true,
            ..Self::default()
        }
    }

    pub fn with_excluded_weekday(mut self, weekday: Weekday) -> Self {
        if !self.excluded_weekdays.contains(&weekday) {
            self.excluded_weekdays.push(weekday);
        }
        self
    }

    /// Returns the union of these flags and `defaults`.
    pub fn merged_with(&self, defaults: &EmployeeFlags) -> EmployeeFlags {
        let mut merged = self.clone();
        merged.early_only |= defaults.early_only;
        for weekday in &defaults.excluded_weekdays {
            if !merged.excluded_weekdays.contains(weekday) {
                merged.excluded_weekdays.push(*weekday);
            }
        }
        merged
    }

    pub fn works_on(&self, weekday: Weekday) -> bool {
        !self.excluded_weekdays.contains(&weekday)
    }
}

/// An employee that can be assigned to shifts.
///
/// Immutable for the duration of one planning run. Deserializes from the
/// external record schema
/// `{id, surname, givenName, role, roles, weeklyHours, flags}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub given_name: String,
    /// Department tag; also counts as a role.
    #[serde(default, rename = "role")]
    pub department: String,
    #[serde(default)]
    pub roles: RoleSet,
    #[serde(default)]
    pub weekly_hours: f64,
    #[serde(default)]
    pub flags: EmployeeFlags,
}

impl Employee {
    pub fn new(id: impl Into<String>, weekly_hours: f64) -> Self {
        Self {
            id: id.into(),
            surname: String::new(),
            given_name: String::new(),
            department: String::new(),
            roles: RoleSet::new(),
            weekly_hours,
            flags: EmployeeFlags::default(),
        }
    }

    pub fn with_name(mut self, surname: impl Into<String>, given_name: impl Into<String>) -> Self {
        self.surname = surname.into();
        self.given_name = given_name.into();
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<RoleTag>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_flags(mut self, flags: EmployeeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Returns every role this employee holds, including the department tag.
    pub fn role_set(&self) -> RoleSet {
        let mut set = self.roles.clone();
        set.insert(RoleTag::new(&self.department));
        set
    }

    pub fn has_role(&self, role: &RoleTag) -> bool {
        self.roles.contains(role) || RoleTag::new(&self.department) == *role
    }

    /// Checks that the record is usable for planning.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidEmployee(
                "employee id must not be empty".to_string(),
            ));
        }
        if !self.weekly_hours.is_finite() || self.weekly_hours < 0.0 {
            return Err(ValidationError::InvalidEmployee(format!(
                "employee {} has invalid weekly hours {}",
                self.id, self.weekly_hours
            )));
        }
        Ok(())
    }
}

/// Validates every record and checks that ids are unique.
pub fn validate_roster(employees: &[Employee]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(employees.len());
    for employee in employees {
        employee.validate()?;
        if !seen.insert(employee.id.as_str()) {
            return Err(ValidationError::InvalidEmployee(format!(
                "duplicate employee id {}",
                employee.id
            )));
        }
    }
    Ok(())
}
