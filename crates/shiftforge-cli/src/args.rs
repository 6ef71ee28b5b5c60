use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use shiftforge::{RestTransitions, Strategy};

/// Shift planner for employees, horizons and role coverage
///
/// Reads employee records and a sequence rule table, assigns every
/// employee at most one shift per day so that contracted hours, legal
/// day-to-day transitions and role coverage all hold, and writes the
/// resulting schedule grid.
#[derive(Parser)]
#[command(version, about, name = "shiftforge")]
pub struct Args {
    /// Suppress the banner and progress output on stderr
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan a horizon and write the schedule grid
    #[command(alias = "p")]
    Plan(PlanArgs),
}

#[derive(clap::Args)]
pub struct PlanArgs {
    /// First day (YYYY-MM-DD); without START and END, plans tomorrow
    /// through seven days from today
    pub start: Option<String>,

    /// Last day, inclusive (YYYY-MM-DD)
    pub end: Option<String>,

    /// Employee records (JSON array)
    #[arg(long, short, default_value = "data/employees.json")]
    pub employees: PathBuf,

    /// Sequence rule table (JSON object); a missing file means no rules
    #[arg(long, short, default_value = "data/rules.json")]
    pub rules: PathBuf,

    /// Planner configuration (TOML or YAML). Defaults to ./shiftforge.toml
    /// when present
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write the grid to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Allocation strategy: constraint or greedy
    #[arg(long, short)]
    pub strategy: Option<Strategy>,

    /// Solver time budget in seconds
    #[arg(long, short = 't')]
    pub time_limit: Option<u64>,

    /// Hour tolerance fraction, e.g. 0.1 for +/-10%
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Seed for reproducible search order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rest-day transitions: inferred, strict or lenient
    #[arg(long)]
    pub rest_transitions: Option<RestTransitions>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Table,
    Json,
}
