//! Configuration system for ShiftForge.
//!
//! Load planner configuration from TOML or YAML files to control the
//! allocation strategy, hour tolerance, time budget, shift catalog and
//! coverage requirements without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use shiftforge_config::{PlannerConfig, Strategy};
//! use std::time::Duration;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     strategy = "constraint"
//!     tolerance = 0.15
//!
//!     [termination]
//!     seconds_spent_limit = 10
//!
//!     [catalog]
//!     starts = [6, 9, 14.5]
//!     duration_hours = 8
//!
//!     [[coverage]]
//!     role = "cvd"
//!     shift = 6
//!     required = 1
//! "#).unwrap();
//!
//! assert_eq!(config.strategy, Strategy::Constraint);
//! assert_eq!(config.time_limit(), Duration::from_secs(10));
//! assert_eq!(config.catalog().unwrap().len(), 3);
//! assert_eq!(config.coverage.len(), 1);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use shiftforge_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("planner.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shiftforge_core::{CoverageRequirement, EmployeeFlags, RoleTag, ShiftCatalog, ShiftStart};
use thiserror::Error;

/// Time budget used when the configuration sets none.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Default hour tolerance fraction (±10%).
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Default start hour before which a shift counts as early.
pub const DEFAULT_EARLY_SHIFT_CUTOFF: f64 = 9.0;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main planner configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Which allocator produces the schedule.
    #[serde(default)]
    pub strategy: Strategy,

    /// Fraction by which hour bounds widen around the contracted hours.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Termination configuration.
    #[serde(default)]
    pub termination: TerminationConfig,

    /// Shift catalog shared by all employees.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Daily coverage requirements.
    #[serde(default = "CoverageRequirement::newsroom_defaults")]
    pub coverage: Vec<CoverageRequirement>,

    /// Role reported in the grid's coverage column.
    #[serde(default = "default_coverage_role")]
    pub coverage_role: RoleTag,

    /// Early-only employees may only take shifts starting before this hour.
    #[serde(default = "default_early_shift_cutoff")]
    pub early_shift_cutoff: f64,

    /// Whether transitions from or to a rest day are constrained.
    #[serde(default)]
    pub rest_transitions: RestTransitions,

    /// Settings of the greedy allocator.
    #[serde(default)]
    pub greedy: GreedyConfig,

    /// Random seed for reproducible search diversification.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Flags merged into every employee.
    #[serde(default)]
    pub default_flags: EmployeeFlags,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_coverage_role() -> RoleTag {
    RoleTag::new("cvd")
}

fn default_early_shift_cutoff() -> f64 {
    DEFAULT_EARLY_SHIFT_CUTOFF
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            tolerance: DEFAULT_TOLERANCE,
            termination: TerminationConfig::default(),
            catalog: CatalogConfig::default(),
            coverage: CoverageRequirement::newsroom_defaults(),
            coverage_role: default_coverage_role(),
            early_shift_cutoff: DEFAULT_EARLY_SHIFT_CUTOFF,
            rest_transitions: RestTransitions::default(),
            greedy: GreedyConfig::default(),
            random_seed: None,
            default_flags: EmployeeFlags::default(),
        }
    }
}

impl PlannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing YAML for `.yaml`/`.yml`
    /// and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, doesn't parse, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses and validates configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the allocation strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the hour tolerance fraction.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the termination time limit, replacing any configured limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.termination.seconds_spent_limit = None;
        self.termination.minutes_spent_limit = None;
        self.termination.millis_spent_limit = Some(limit.as_millis() as u64);
        self
    }

    /// Sets the termination time limit in seconds.
    pub fn with_termination_seconds(self, seconds: u64) -> Self {
        self.with_time_limit(Duration::from_secs(seconds))
    }

    /// Caps the number of search nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.termination.node_limit = Some(nodes);
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Replaces the shift catalog.
    pub fn with_catalog(mut self, starts: Vec<f64>, duration_hours: f64) -> Self {
        self.catalog = CatalogConfig {
            starts,
            duration_hours,
        };
        self
    }

    /// Replaces the coverage requirements.
    pub fn with_coverage(mut self, coverage: Vec<CoverageRequirement>) -> Self {
        self.coverage = coverage;
        self
    }

    /// Sets how rest-day transitions are constrained.
    pub fn with_rest_transitions(mut self, rest_transitions: RestTransitions) -> Self {
        self.rest_transitions = rest_transitions;
        self
    }

    /// Sets the flags merged into every employee.
    pub fn with_default_flags(mut self, flags: EmployeeFlags) -> Self {
        self.default_flags = flags;
        self
    }

    /// Returns the termination time limit, falling back to 30 seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftforge_config::PlannerConfig;
    /// use std::time::Duration;
    ///
    /// assert_eq!(PlannerConfig::default().time_limit(), Duration::from_secs(30));
    /// ```
    pub fn time_limit(&self) -> Duration {
        self.termination
            .time_limit()
            .unwrap_or(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS))
    }

    /// Builds the configured shift catalog.
    pub fn catalog(&self) -> Result<ShiftCatalog, ConfigError> {
        self.catalog.build()
    }

    /// Checks every field for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || !(0.0..1.0).contains(&self.tolerance) {
            return Err(ConfigError::Invalid(format!(
                "tolerance {} must lie in [0, 1)",
                self.tolerance
            )));
        }
        if !self.early_shift_cutoff.is_finite() || !(0.0..=24.0).contains(&self.early_shift_cutoff)
        {
            return Err(ConfigError::Invalid(format!(
                "early shift cutoff {} must lie in [0, 24]",
                self.early_shift_cutoff
            )));
        }

        let catalog = self.catalog()?;
        for requirement in &self.coverage {
            if catalog.index_of(requirement.shift).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "coverage shift {} for role {} is not in the catalog",
                    requirement.shift, requirement.role
                )));
            }
        }

        let greedy_start = ShiftStart::from_hours(self.greedy.start).and_then(|s| catalog.index_of(s));
        if greedy_start.is_none() {
            return Err(ConfigError::Invalid(format!(
                "greedy start {} is not in the catalog",
                self.greedy.start
            )));
        }
        if self.greedy.max_work_days == 0 || self.greedy.max_work_days > 7 {
            return Err(ConfigError::Invalid(format!(
                "greedy max_work_days {} must lie in [1, 7]",
                self.greedy.max_work_days
            )));
        }
        Ok(())
    }
}

/// Allocation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Constraint model solved by search.
    #[default]
    Constraint,

    /// Weekly-hours distributor without constraint reasoning.
    Greedy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Constraint => write!(f, "constraint"),
            Strategy::Greedy => write!(f, "greedy"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constraint" | "cp" => Ok(Strategy::Constraint),
            "greedy" => Ok(Strategy::Greedy),
            other => Err(ConfigError::Invalid(format!("unknown strategy '{other}'"))),
        }
    }
}

/// How sequence rules apply to transitions from or to a rest day.
///
/// # Examples
///
/// ```
/// use shiftforge_config::RestTransitions;
///
/// let strict: RestTransitions = "strict".parse().unwrap();
/// assert!(strict.constrains(false));
/// assert!(!RestTransitions::Inferred.constrains(false));
/// assert!(RestTransitions::Inferred.constrains(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestTransitions {
    /// Constrained only for employees whose rules mention rest.
    #[default]
    Inferred,

    /// Always constrained: a rest transition is legal only when listed.
    Strict,

    /// Never constrained.
    Lenient,
}

impl RestTransitions {
    /// Whether rest transitions are constrained for an employee whose
    /// resolved rules do or do not mention rest.
    pub fn constrains(self, rules_mention_rest: bool) -> bool {
        match self {
            RestTransitions::Inferred => rules_mention_rest,
            RestTransitions::Strict => true,
            RestTransitions::Lenient => false,
        }
    }
}

impl fmt::Display for RestTransitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestTransitions::Inferred => write!(f, "inferred"),
            RestTransitions::Strict => write!(f, "strict"),
            RestTransitions::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for RestTransitions {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inferred" => Ok(RestTransitions::Inferred),
            "strict" => Ok(RestTransitions::Strict),
            "lenient" => Ok(RestTransitions::Lenient),
            other => Err(ConfigError::Invalid(format!(
                "unknown rest transition mode '{other}'"
            ))),
        }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of search nodes.
    pub node_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self.millis_spent_limit.unwrap_or(0)
            + self.seconds_spent_limit.unwrap_or(0) * 1_000
            + self.minutes_spent_limit.unwrap_or(0) * 60_000;
        let configured = self.millis_spent_limit.is_some()
            || self.seconds_spent_limit.is_some()
            || self.minutes_spent_limit.is_some();
        if configured {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Shift catalog configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogConfig {
    /// Shift start times in fractional hours, in scan order.
    #[serde(default = "default_starts")]
    pub starts: Vec<f64>,

    /// Duration shared by every template.
    #[serde(default = "default_duration_hours")]
    pub duration_hours: f64,
}

fn default_starts() -> Vec<f64> {
    ShiftCatalog::DEFAULT_STARTS.to_vec()
}

fn default_duration_hours() -> f64 {
    ShiftCatalog::DEFAULT_DURATION_HOURS
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            starts: default_starts(),
            duration_hours: default_duration_hours(),
        }
    }
}

impl CatalogConfig {
    /// Builds the catalog, rejecting empty or duplicate starts.
    pub fn build(&self) -> Result<ShiftCatalog, ConfigError> {
        ShiftCatalog::new(&self.starts, self.duration_hours)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Greedy allocator configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GreedyConfig {
    /// Start hour of the shift the greedy allocator hands out.
    #[serde(default = "default_greedy_start")]
    pub start: f64,

    /// Maximum work days per week chunk.
    #[serde(default = "default_max_work_days")]
    pub max_work_days: usize,
}

fn default_greedy_start() -> f64 {
    9.0
}

fn default_max_work_days() -> usize {
    5
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            start: default_greedy_start(),
            max_work_days: default_max_work_days(),
        }
    }
}
