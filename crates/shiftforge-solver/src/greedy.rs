//! Greedy weekly-hours allocator.
//!
//! Splits the horizon into week chunks ending on Sunday and hands each
//! employee a fixed template on the first available weekdays of every
//! chunk until the contracted hours for that chunk are covered. It does
//! no constraint reasoning; callers verify its output with
//! [`crate::check::verify`].

use chrono::{Datelike, Weekday};
use shiftforge_config::{ConfigError, GreedyConfig, PlannerConfig};
use shiftforge_core::{Assignment, ShiftStart};
use tracing::debug;

use crate::builder::{ModelSettings, PlanInstance};

/// Greedy allocator over a shared catalog.
///
/// # Examples
///
/// ```
/// use shiftforge_core::{Employee, Horizon, SequenceRuleTable};
/// use shiftforge_solver::builder::PlanInstance;
/// use shiftforge_solver::greedy::GreedyAllocator;
///
/// let employees = vec![Employee::new("001", 40.0)];
/// let horizon = Horizon::parse("2025-03-10", "2025-03-16").unwrap();
/// let rules = SequenceRuleTable::new();
///
/// let assignment = GreedyAllocator::default().allocate(&PlanInstance::new(&employees, &horizon, &rules));
/// assert_eq!(assignment.shift_count(0), 5);
/// assert_eq!(assignment.shift_index(0, 5), None); // Saturday
/// ```
#[derive(Debug, Clone)]
pub struct GreedyAllocator {
    settings: ModelSettings,
    template: usize,
    max_work_days: usize,
}

impl GreedyAllocator {
    /// Allocates `start` shifts with at most `max_work_days` per week chunk.
    ///
    /// Falls back to the earliest template if `start` is not in the catalog.
    pub fn new(settings: ModelSettings, start: ShiftStart, max_work_days: usize) -> Self {
        let template = settings
            .catalog
            .index_of(start)
            .unwrap_or_else(|| settings.catalog.earliest_index());
        Self {
            settings,
            template,
            max_work_days,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self, ConfigError> {
        let settings = ModelSettings::from_config(config)?;
        let start = ShiftStart::from_hours(config.greedy.start).ok_or_else(|| {
            ConfigError::Invalid(format!("greedy start {} is outside [0, 24)", config.greedy.start))
        })?;
        Ok(Self::new(settings, start, config.greedy.max_work_days))
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Builds the greedy assignment for `instance`.
    pub fn allocate(&self, instance: &PlanInstance<'_>) -> Assignment {
        let horizon = instance.horizon;
        let catalog = &self.settings.catalog;
        let duration = catalog.duration_hours();
        let mut assignment = Assignment::empty(instance.employees.len(), horizon.len(), catalog.len());

        for (e, employee) in instance.employees.iter().enumerate() {
            let flags = employee.flags.merged_with(&self.settings.default_flags);
            let template = if flags.early_only && !self.settings.is_early_template(self.template) {
                catalog.earliest_index()
            } else {
                self.template
            };

            for chunk in horizon.week_chunks() {
                let chunk_days = chunk.len() as f64;
                let target = (employee.weekly_hours * chunk_days / 7.0 / duration).round().max(0.0) as usize;
                let shifts = target.min(self.max_work_days);
                let days: Vec<usize> = chunk
                    .filter(|&d| {
                        horizon
                            .day(d)
                            .is_some_and(|day| is_weekday(day.weekday()) && flags.works_on(day.weekday()))
                    })
                    .take(shifts)
                    .collect();
                for &d in &days {
                    assignment.set(e, d, template, true);
                }
            }
            debug!(
                employee = %employee.id,
                shifts = assignment.shift_count(e),
                "Greedy allocation"
            );
        }
        assignment
    }
}

impl Default for GreedyAllocator {
    fn default() -> Self {
        let greedy = GreedyConfig::default();
        let settings = ModelSettings::default();
        let template = ShiftStart::from_hours(greedy.start)
            .and_then(|start| settings.catalog.index_of(start))
            .unwrap_or_else(|| settings.catalog.earliest_index());
        Self {
            settings,
            template,
            max_work_days: greedy.max_work_days,
        }
    }
}

fn is_weekday(weekday: Weekday) -> bool {
    !matches!(weekday, Weekday::Sat | Weekday::Sun)
}
