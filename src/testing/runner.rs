//! Scenario runner
//!
//! Authenticates once, then executes the steps strictly in declared order.
//! A failing step is recorded and the run moves on; steps whose data
//! precondition is unmet fail before any request is sent.

use std::time::Instant;

use colored::Colorize;
use serde::Serialize;

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::session::Session;

use super::scenario::{ScenarioContext, Step};
use super::steps::story_crud_steps;

/// How a run should be carried out
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only run steps with these names (declared order is kept)
    pub only: Vec<String>,
    /// Print per-step progress to stdout
    pub echo: bool,
    /// Include request details in the progress output
    pub verbose: bool,
}

/// Outcome of a single step
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    /// Position in the full scenario, starting at 1
    pub order: usize,
    pub name: &'static str,
    pub passed: bool,
    /// HTTP status code, when a request was sent
    pub status: Option<u16>,
    pub error: Option<String>,
    pub elapsed_ms: u128,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub base_url: String,
    pub steps: Vec<StepResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.steps.iter().filter(|s| s.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Look up a step result by name
    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.name == name)
    }
}

/// Keep only the named steps, preserving declared order
///
/// Returns `(order, step)` pairs where `order` is the 1-based position in
/// the full scenario. An empty selection keeps everything.
pub fn select_steps(steps: &[Step], only: &[String]) -> Result<Vec<(usize, Step)>> {
    for name in only {
        if !steps.iter().any(|s| s.name == name) {
            let available: Vec<&str> = steps.iter().map(|s| s.name).collect();
            return Err(Error::unknown_step(name, &available));
        }
    }

    Ok(steps
        .iter()
        .enumerate()
        .filter(|(_, s)| only.is_empty() || only.iter().any(|n| n == s.name))
        .map(|(i, s)| (i + 1, *s))
        .collect())
}

/// Authenticate and run the CRUD scenario against the configured service
///
/// Errors returned from here are setup failures; step failures are inside
/// the report.
pub async fn run_suite(config: &Config, options: &RunOptions) -> Result<SuiteReport> {
    let steps = story_crud_steps();
    let selected = select_steps(&steps, &options.only)?;

    if options.echo {
        println!(
            "\n{} {}",
            "Running Suite:".blue().bold(),
            config.api_root().white().bold()
        );
        println!("\n{}", "Setup:".cyan());
    }

    let session = Session::bootstrap(config).await?;

    if options.echo {
        println!(
            "  {} Authenticated as {}",
            "✓".green(),
            config.credentials.username.dimmed()
        );
    }

    let mut ctx = ScenarioContext::new();
    let report = run_steps(&session, &selected, &mut ctx, options).await;

    if options.echo {
        print_summary(&report);
    }

    Ok(report)
}

/// Execute already selected steps against an authenticated session
pub async fn run_steps(
    session: &Session,
    steps: &[(usize, Step)],
    ctx: &mut ScenarioContext,
    options: &RunOptions,
) -> SuiteReport {
    if options.echo {
        println!("\n{}", "Steps:".cyan());
    }

    let mut results = Vec::with_capacity(steps.len());
    for (order, step) in steps {
        let result = execute_step(session, *order, step, ctx, options.verbose).await;

        match &result.error {
            None => tracing::info!(step = step.name, status = ?result.status, "step passed"),
            Some(e) => tracing::warn!(step = step.name, status = ?result.status, error = %e, "step failed"),
        }

        if options.echo {
            print_step(&result, step);
        }
        results.push(result);
    }

    SuiteReport {
        base_url: session.base_url().to_string(),
        steps: results,
    }
}

/// Execute a single step
async fn execute_step(
    session: &Session,
    order: usize,
    step: &Step,
    ctx: &mut ScenarioContext,
    verbose: bool,
) -> StepResult {
    let started = Instant::now();
    let finish = |status: Option<u16>, outcome: Result<()>| StepResult {
        order,
        name: step.name,
        passed: outcome.is_ok(),
        status,
        error: outcome.err().map(|e| e.to_string()),
        elapsed_ms: started.elapsed().as_millis(),
    };

    let request = match (step.build)(ctx) {
        Ok(request) => request,
        Err(e) => return finish(None, Err(e)),
    };

    if verbose {
        println!(
            "    {} {}",
            request.method.as_str().dimmed(),
            session.client().url(&request.path).dimmed()
        );
    }

    let response = match session.client().send(&request).await {
        Ok(response) => response,
        Err(e) => return finish(None, Err(e)),
    };

    let outcome = (step.verify)(&response, ctx);
    finish(Some(response.status.as_u16()), outcome)
}

fn print_step(result: &StepResult, step: &Step) {
    let status = result
        .status
        .map(|s| format!(" [{}]", s))
        .unwrap_or_default();

    match &result.error {
        None => println!(
            "  {} Step {}: {}{}",
            "✓".green(),
            result.order,
            step.name,
            status.dimmed()
        ),
        Some(e) => println!(
            "  {} Step {}: {}{}: {}",
            "✗".red(),
            result.order,
            step.name,
            status.dimmed(),
            e
        ),
    }
}

fn print_summary(report: &SuiteReport) {
    if report.all_passed() {
        println!(
            "\n{} {}\n",
            "✓".green().bold(),
            format!("All {} steps passed", report.steps.len()).green().bold()
        );
    } else {
        println!(
            "\n{} {}\n",
            "✗".red().bold(),
            format!("{} of {} steps failed", report.failed(), report.steps.len())
                .red()
                .bold()
        );
    }
}
