//! ShiftForge CLI
//!
//! `shiftforge plan [START] [END]` plans the horizon and writes the
//! schedule grid to stdout or a file.

mod args;
mod input;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands, OutputFormat, PlanArgs};
use clap::Parser;
use owo_colors::OwoColorize;
use shiftforge::{
    CsvWriter, Horizon, LoggingListener, PlanError, PlanOutcome, Planner, ScheduleGrid, TableView,
    ValidationError,
};
use tracing::{info, warn};

/// Exit code when no schedule satisfies the rules.
const EXIT_INFEASIBLE: u8 = 2;

/// Exit code when the time budget ran out.
const EXIT_TIMEOUT: u8 = 3;

fn main() -> ExitCode {
    let Args {
        quiet,
        no_color,
        command,
    } = Args::parse();

    if quiet {
        shiftforge::console::init_quiet();
    } else {
        shiftforge::console::init();
    }

    let result = match command {
        Commands::Plan(plan) => run_plan(plan, quiet, no_color),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if no_color {
                eprintln!("error: {err:#}");
            } else {
                eprintln!("{} {err:#}", "error:".bright_red().bold());
            }
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run_plan(args: PlanArgs, quiet: bool, no_color: bool) -> Result<()> {
    let horizon = resolve_horizon(args.start.as_deref(), args.end.as_deref())?;

    let mut config = input::load_config(args.config.as_deref())?;
    if let Some(strategy) = args.strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(seconds) = args.time_limit {
        config = config.with_time_limit(Duration::from_secs(seconds));
    }
    if let Some(tolerance) = args.tolerance {
        config = config.with_tolerance(tolerance);
    }
    if let Some(seed) = args.seed {
        config = config.with_random_seed(seed);
    }
    if let Some(rest_transitions) = args.rest_transitions {
        config = config.with_rest_transitions(rest_transitions);
    }

    let employees = input::load_employees(&args.employees)?;
    let rules = input::load_rules(&args.rules)?;

    let mut planner = Planner::new(config)?;
    if !quiet {
        planner = planner.with_listener(Arc::new(LoggingListener::new()));
    }
    let outcome = planner.plan(&employees, &horizon, &rules)?;

    for violation in &outcome.violations {
        warn!(%violation, "Schedule violation");
    }
    write_grid(&outcome.grid, args.format, args.output.as_deref())?;
    if let Some(path) = &args.output {
        info!(path = %path.display(), "Schedule written");
    }
    if !quiet {
        print_summary(&outcome, &horizon, no_color);
    }
    Ok(())
}

/// Both dates or neither: a lone date falls back to the default horizon.
fn resolve_horizon(start: Option<&str>, end: Option<&str>) -> Result<Horizon, ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) => Horizon::parse(start, end),
        (None, None) => Ok(Horizon::default_from_today()),
        _ => {
            warn!("START and END must be given together; using the default horizon");
            Ok(Horizon::default_from_today())
        }
    }
}

fn write_grid(grid: &ScheduleGrid, format: OutputFormat, output: Option<&std::path::Path>) -> Result<()> {
    let mut out: Box<dyn Write> = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Csv => CsvWriter::new().write(grid, &mut out)?,
        OutputFormat::Table => write!(out, "{}", TableView::new(grid))?,
        OutputFormat::Json => writeln!(out, "{}", grid.to_json()?)?,
    }
    out.flush()?;
    Ok(())
}

fn print_summary(outcome: &PlanOutcome, horizon: &Horizon, no_color: bool) {
    let status = outcome.status.to_string();
    let status = if no_color {
        status
    } else if outcome.is_valid() {
        status.bright_green().bold().to_string()
    } else {
        status.yellow().bold().to_string()
    };
    eprintln!(
        "Planned {} employees from {} to {} with the {} strategy: {} in {:.2}s",
        outcome.grid.rows().len(),
        horizon.start(),
        horizon.end(),
        outcome.strategy,
        status,
        outcome.elapsed.as_secs_f64()
    );
    if !outcome.is_valid() {
        eprintln!("{} invariant violations, see the log", outcome.violations.len());
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PlanError>() {
        Some(PlanError::Infeasible { .. }) => EXIT_INFEASIBLE,
        Some(PlanError::Timeout { .. }) => EXIT_TIMEOUT,
        _ => 1,
    }
}
