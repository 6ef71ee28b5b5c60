//! Colorful console output for planning runs.
//!
//! Provides a custom `tracing` layer that formats planning events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (plan/model/solve start and end)
//! - **DEBUG**: Per-employee hour bounds and legal sequence sets
//! - **TRACE**: Individual forbidden transitions

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static PLAN_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "shiftforge=info";

/// Initializes the planner console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the ShiftForge banner and sets up tracing.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();
        install();
    });
}

/// Initializes tracing without the banner.
pub fn init_quiet() {
    INIT.get_or_init(install);
}

// Crate targets enabled at INFO unless `RUST_LOG` says otherwise.
const DEFAULT_TARGETS: [&str; 3] = [DEFAULT_DIRECTIVE, "shiftforge_solver=info", "shiftforge_cli=info"];

fn install() {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        for directive in DEFAULT_TARGETS {
            if let Ok(directive) = directive.parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }
    }

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(PlannerConsoleLayer)
        .try_init();
}

// Marks the start of a planning run for elapsed time tracking.
fn mark_plan_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    PLAN_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since the plan started.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = PLAN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____  _     _  __ _   _____
/ ___|| |__ (_)/ _| |_|  ___|__  _ __ __ _  ___
\___ \| '_ \| | |_| __| |_ / _ \| '__/ _` |/ _ \
 ___) | | | | |  _| |_|  _| (_) | | | (_| |  __/
|____/|_| |_|_|_|  \__|_|  \___/|_|  \__, |\___|
                                     |___/
"#;

    let version_line = format!("                v{} - Shift Planner\n", VERSION);

    // Banner goes to stderr so stdout stays free for the schedule.
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", banner.bright_cyan());
    let _ = writeln!(stderr, "{}", version_line.bright_white().bold());
    let _ = stderr.flush();
}

/// A tracing layer that formats planning events with colors.
pub struct PlannerConsoleLayer;

impl<S: Subscriber> Layer<S> for PlannerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("shiftforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    label: Option<String>,
    strategy: Option<String>,
    status: Option<String>,
    employees: Option<u64>,
    days: Option<u64>,
    variables: Option<u64>,
    constraints: Option<u64>,
    fixed: Option<u64>,
    budget_ms: Option<u64>,
    elapsed_ms: Option<u64>,
    violations: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "label" => self.label = Some(s),
            "strategy" => self.strategy = Some(s),
            "status" => self.status = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "employees" => self.employees = Some(value),
            "days" => self.days = Some(value),
            "variables" => self.variables = Some(value),
            "constraints" => self.constraints = Some(value),
            "fixed" => self.fixed = Some(value),
            "budget_ms" => self.budget_ms = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            "violations" => self.violations = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "label" => self.label = Some(value.to_string()),
            "strategy" => self.strategy = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "plan_start" => format_plan_start(v),
        "plan_end" => format_plan_end(v),
        "model_built" => format_model_built(v),
        "solve_started" => format_solve_started(v),
        "status_received" => format_status_received(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_label(v: &EventVisitor) -> String {
    match v.label.as_deref() {
        Some(label) if !label.is_empty() => format!("[{}] ", label.cyan()),
        _ => String::new(),
    }
}

fn format_plan_start(v: &EventVisitor) -> String {
    mark_plan_start();
    let employees = v.employees.unwrap_or(0);
    let days = v.days.unwrap_or(0);
    let strategy = v.strategy.as_deref().unwrap_or("constraint");

    format!(
        "{} {} {}Planning │ {} employees │ {} days │ {} strategy",
        format_elapsed(),
        "▶".bright_green().bold(),
        format_label(v),
        employees.to_formatted_string(&Locale::en).bright_yellow(),
        days.to_formatted_string(&Locale::en).bright_yellow(),
        strategy.white().bold()
    )
}

fn format_model_built(v: &EventVisitor) -> String {
    let variables = v.variables.unwrap_or(0);
    let constraints = v.constraints.unwrap_or(0);

    let mut output = format!(
        "{} {} {}Model built │ {} variables │ {} constraints │ space {}",
        format_elapsed(),
        "◆".bright_blue(),
        format_label(v),
        variables.to_formatted_string(&Locale::en).bright_yellow(),
        constraints.to_formatted_string(&Locale::en).bright_yellow(),
        search_space(variables as usize).bright_magenta()
    );

    if let Some(fixed) = v.fixed.filter(|&f| f > 0) {
        output.push_str(&format!(
            " │ {} fixed",
            fixed.to_formatted_string(&Locale::en).bright_yellow()
        ));
    }

    output
}

fn format_solve_started(v: &EventVisitor) -> String {
    let budget = v.budget_ms.unwrap_or(0);

    format!(
        "{} {} {}Solving │ {} limit",
        format_elapsed(),
        "▶".bright_blue(),
        format_label(v),
        format_duration_ms(budget).yellow()
    )
}

fn format_status_received(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let elapsed = v.elapsed_ms.unwrap_or(0);

    format!(
        "{} {} {}Solver finished │ {} │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        format_label(v),
        format_duration_ms(elapsed).yellow(),
        format_status(status)
    )
}

fn format_plan_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let violations = v.violations.unwrap_or(0);

    let mut output = format!(
        "{} {} {}Planning complete │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_label(v),
        format_status(status)
    );
    if violations > 0 {
        output.push_str(&format!(
            " │ {} violations",
            violations.to_formatted_string(&Locale::en).bright_red().bold()
        ));
    }
    output
}

fn format_status(status: &str) -> String {
    match status {
        "optimal" | "feasible" => status.to_uppercase().bright_green().bold().to_string(),
        "infeasible" => status.to_uppercase().bright_red().bold().to_string(),
        _ => status.to_uppercase().yellow().bold().to_string(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

// Size of the raw boolean search space, 2^variables, in scientific notation.
fn search_space(variables: usize) -> String {
    if variables == 0 {
        return "1".to_string();
    }

    let log_scale = (variables as f64) * 2f64.log10();
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{:.3} x 10^{}", mantissa, exponent)
}

#[cfg(test)]
mod tests;
