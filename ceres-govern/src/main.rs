//! `ceres-govern`: validates the governance contracts of an agent hub.
//!
//! Prints one confirmation line (or a JSON report) on stdout and exits 0 when
//! every contract holds; prints `ERROR: <message>` on stderr and exits 1 on
//! the first violation.

#![warn(missing_docs, clippy::pedantic)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use ceres_governance::config::HubLayout;
use ceres_governance::telemetry::{TelemetryConfig, init_tracing};
use ceres_governance::{Invocation, govern};
use clap::Parser;
use tracing::debug;

/// Validate CERES governance contracts.
#[derive(Debug, Parser)]
#[command(name = "ceres-govern", version, about, long_about = None)]
struct Cli {
    /// Hub root containing `governance/`, `AGENTS.md` and friends.
    #[arg(long, env = "CERES_HUB_ROOT", default_value = ".")]
    hub_root: PathBuf,

    /// Active phase; authorization runs when `--agent` is also given.
    #[arg(long)]
    phase: Option<String>,

    /// Agent requesting authorization.
    #[arg(long)]
    agent: Option<String>,

    /// Pattern the agent intends to run; empty means none.
    #[arg(long)]
    pattern: Option<String>,

    /// Task class checked against the reflection obligation.
    #[arg(long)]
    task_class: Option<String>,

    /// Task the reflection evidence must reference.
    #[arg(long)]
    task_id: Option<String>,

    /// Observability event stream, overriding `logs/events.jsonl`.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Emit the report as JSON instead of a confirmation line.
    #[arg(long)]
    json: bool,

    /// Diagnostic level used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn layout(&self) -> HubLayout {
        let layout = HubLayout::new(self.hub_root.clone());
        match &self.events {
            Some(events) => layout.with_events(events.clone()),
            None => layout,
        }
    }

    fn invocation(&self) -> Invocation {
        Invocation::new()
            .with_phase(self.phase.clone())
            .with_agent(self.agent.clone())
            .with_pattern(self.pattern.clone())
            .with_task_class(self.task_class.clone())
            .with_task_id(self.task_id.clone())
    }
}

fn run(cli: &Cli) -> Result<String> {
    init_tracing(&TelemetryConfig::default().with_default_level(&cli.log_level))
        .context("failed to initialise tracing")?;

    let layout = cli.layout();
    debug!(root = %layout.root().display(), "evaluating hub");
    let report = govern(&layout, &cli.invocation())?;

    if cli.json {
        serde_json::to_string_pretty(&report).context("failed to encode report")
    } else {
        Ok(report.to_string())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
