//! One-shot `vigil check` runner.
//!
//! Runs every probe once, streams progress while results settle, prints the
//! table (or JSON) report and maps the verdict to a process exit code.

mod report;

use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use vigil_core::{ChannelObserver, Orchestrator, ProbeRegistry, RunEvent, Status, SystemHealth};

pub use self::report::{Labels, render};
use crate::TRACING_TARGET_CHECK;
use crate::config::CheckArgs;

/// Exit code when the system is operational.
pub const EXIT_OPERATIONAL: i32 = 0;

/// Exit code when the overall verdict is unhealthy.
pub const EXIT_UNHEALTHY: i32 = 1;

/// Output options of a check run.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Prints JSON instead of the table and skips progress lines.
    pub json: bool,
    /// Skips progress lines.
    pub quiet: bool,
    /// Also writes the JSON report here.
    pub output: Option<PathBuf>,
}

impl From<&CheckArgs> for CheckOptions {
    fn from(args: &CheckArgs) -> Self {
        Self {
            json: args.json,
            quiet: args.service.quiet,
            output: args.output.clone(),
        }
    }
}

/// Builds the standard registry and runs one check.
///
/// # Errors
///
/// Returns an error if the registry cannot be built or the report cannot be
/// serialized. Unhealthy components are never errors.
pub async fn run(args: &CheckArgs) -> anyhow::Result<i32> {
    let orchestrator = args
        .service
        .build_orchestrator()
        .context("failed to build the probe registry")?;

    execute(orchestrator, &CheckOptions::from(args)).await
}

/// Runs one check over `orchestrator` and returns the exit code.
pub async fn execute(orchestrator: Orchestrator, options: &CheckOptions) -> anyhow::Result<i32> {
    let labels = labels(orchestrator.registry());
    let (observer, receiver) = ChannelObserver::new();
    let orchestrator = orchestrator.with_observer(observer);

    let progress = (!options.json && !options.quiet)
        .then(|| tokio::spawn(print_progress(receiver, labels.clone())));

    let started = Instant::now();
    let health = orchestrator.run_all().await;
    let elapsed = started.elapsed();

    // Drops the last sender so the progress task drains and exits.
    drop(orchestrator);
    if let Some(progress) = progress {
        let _ = progress.await;
    }

    if options.json {
        let json = serde_json::to_string_pretty(&health).context("failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{}", render(&health, &labels, elapsed));
    }

    if let Some(path) = &options.output {
        write_report(path, &health).await;
    }

    Ok(exit_code(&health))
}

/// Maps the overall verdict to a process exit code.
pub fn exit_code(health: &SystemHealth) -> i32 {
    if health.is_operational() {
        EXIT_OPERATIONAL
    } else {
        EXIT_UNHEALTHY
    }
}

fn labels(registry: &ProbeRegistry) -> Labels {
    registry
        .iter()
        .map(|probe| (probe.name().to_owned(), probe.label().to_owned()))
        .collect()
}

async fn print_progress(mut receiver: UnboundedReceiver<RunEvent>, labels: Labels) {
    while let Some(event) = receiver.recv().await {
        match event {
            RunEvent::Started(probes) => {
                println!("{}", format!("Checking {} components...", probes.len()).cyan());
            }
            RunEvent::Checked(status) => {
                let label = labels
                    .get(&status.component)
                    .map_or(status.component.as_str(), String::as_str);
                let line = match status.status {
                    Status::Healthy => format!("  ✓ {label}").green(),
                    Status::Degraded => format!("  ~ {label}").yellow(),
                    Status::Unhealthy => format!("  ✗ {label}").red(),
                    Status::Unknown => format!("  ? {label}").bright_black(),
                };
                println!("{line}");
            }
            RunEvent::Completed(_) => break,
        }
    }
}

/// Writes the JSON report; failures are logged and never change the exit code.
async fn write_report(path: &Path, health: &SystemHealth) {
    let written = match serde_json::to_vec_pretty(health) {
        Ok(bytes) => tokio::fs::write(path, bytes).await,
        Err(error) => Err(error.into()),
    };

    match written {
        Ok(()) => tracing::info!(
            target: TRACING_TARGET_CHECK,
            path = %path.display(),
            "Report written"
        ),
        Err(error) => tracing::warn!(
            target: TRACING_TARGET_CHECK,
            path = %path.display(),
            error = %error,
            "Failed to write report"
        ),
    }
}
