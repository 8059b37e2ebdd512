//! Command line entry point.
//!
//! Loads configuration, runs one refresh pass over the fixture source and
//! prints the resulting status report.
//!
//! # Usage
//!
//! ```bash
//! # Refresh whatever is due and print the report
//! servicedesk-state desk.toml
//!
//! # Force a user-requested refresh of every context
//! servicedesk-state desk.toml --all
//!
//! # Override configuration values
//! servicedesk-state --set fixtures_dir=/srv/fixtures --set max_age.users=3600
//!
//! # Print context summaries as JSON
//! servicedesk-state desk.toml --json
//! ```

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use servicedesk_state::observability::init_tracing;
use servicedesk_state::source::FixtureSource;
use servicedesk_state::storage::JsonSnapshotStore;
use servicedesk_state::ui::{render_report, render_summaries_json, ReportViewModel};
use servicedesk_state::{initialize, Config, DeskError, Event, Result, Runtime};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "servicedesk-state")]
#[command(version)]
#[command(about = "Refresh service desk data contexts and print their status")]
struct Cli {
    /// TOML configuration file
    config: Option<PathBuf>,

    /// Configuration override as key=value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Refresh every context instead of only the due ones
    #[arg(long)]
    all: bool,

    /// Print context summaries as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("servicedesk-state: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.apply_overrides(&parse_overrides(&cli.overrides)?);

    init_tracing(&config);
    let _span = tracing::info_span!("cli_run", all = cli.all).entered();

    let dashboard = initialize(&config)?;
    let mut runtime = Runtime::new(dashboard, FixtureSource::new(config.fixtures_dir()));
    if config.persist_snapshots {
        let store = JsonSnapshotStore::new(config.snapshot_path())?;
        runtime = runtime.with_store(Box::new(store))?;
    }

    let event = if cli.all {
        Event::RefreshAll
    } else {
        Event::RefreshDue {
            now: chrono::Utc::now(),
        }
    };
    let changed = runtime.dispatch(event)?;
    tracing::info!(changed, "refresh pass complete");

    if cli.json {
        println!("{}", render_summaries_json(runtime.dashboard())?);
    } else {
        let vm = ReportViewModel::compute(runtime.dashboard(), chrono::Utc::now());
        print!("{}", render_report(&vm));
    }

    Ok(())
}

fn parse_overrides(raw: &[String]) -> Result<BTreeMap<String, String>> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
                .ok_or_else(|| DeskError::Config(format!("expected KEY=VALUE, got '{pair}'")))
        })
        .collect()
}
