//! Loading of external records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use shiftforge::{Employee, PlannerConfig, SequenceRuleTable};
use tracing::{debug, warn};

/// Configuration read when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "shiftforge.toml";

pub fn load_employees(path: &Path) -> Result<Vec<Employee>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read employees from {}", path.display()))?;
    let employees: Vec<Employee> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse employees in {}", path.display()))?;
    debug!(count = employees.len(), path = %path.display(), "Employees loaded");
    Ok(employees)
}

/// Reads the rule table; a missing file yields an empty table.
pub fn load_rules(path: &Path) -> Result<SequenceRuleTable> {
    if !path.exists() {
        warn!(path = %path.display(), "Rule table not found; planning without sequence rules");
        return Ok(SequenceRuleTable::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse rules in {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(PlannerConfig::load(DEFAULT_CONFIG_PATH).unwrap_or_default()),
    }
}
