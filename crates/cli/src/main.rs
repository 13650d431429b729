mod config;
mod provenance;
mod report;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use csp::interval::partition_intervals;
use csp::prelude::*;
use serde_json::json;
use tracing::info;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

use config::{Mode, RunConfig};
use provenance::Payload;
use report::ResultDoc;

#[derive(Parser)]
#[command(name = "csp")]
#[command(about = "Clinical space partition of binary predictors", version = csp::VERSION)]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Partition the cost triangle using sensitivity, specificity and coverage
    Co(RunArgs),
    /// Partition the cost segment using sensitivity and specificity only
    Noco(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// JSON run configuration with `rho` and `predictors`
    #[arg(long, conflicts_with_all = ["rho", "predictors"])]
    config: Option<PathBuf>,
    /// Prevalence, used with --predictors
    #[arg(long, requires = "predictors")]
    rho: Option<f64>,
    /// CSV table with name, sensitivity, specificity and coverage columns
    #[arg(long, requires = "rho")]
    predictors: Option<PathBuf>,
    /// Write a JSON result (plus provenance sidecar) instead of the text report
    #[arg(long)]
    out: Option<PathBuf>,
}

impl RunArgs {
    fn load(&self, mode: Mode) -> Result<RunConfig> {
        match (&self.config, self.rho, &self.predictors) {
            (Some(path), _, _) => RunConfig::from_json(path, mode),
            (None, Some(rho), Some(table)) => RunConfig::from_csv(table, rho, mode),
            _ => bail!("pass --config, or --rho together with --predictors"),
        }
    }

    fn payload(&self, mode: Mode, cfg: &RunConfig) -> Payload {
        let params = json!({
            "mode": mode.label(),
            "rho": cfg.rho,
            "predictors": cfg.predictors.iter().map(|p| json!({
                "name": p.name,
                "sensitivity": p.sensitivity,
                "specificity": p.specificity,
                "coverage": p.coverage,
            })).collect::<Vec<_>>(),
        });
        self.config
            .iter()
            .chain(self.predictors.iter())
            .fold(Payload::new(params), |p, input| p.with_input(input))
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Co(args) => run_co(args),
        Action::Noco(args) => run_noco(args),
    }
}

fn run_co(args: RunArgs) -> Result<()> {
    let cfg = args.load(Mode::Coverage)?;
    info!(rho = cfg.rho, predictors = cfg.predictors.len(), "co");
    let part = partition_with_retry(cfg.rho, &cfg.predictors, PartitionCfg::default())
        .context("computing the cost space partition")?;
    info!(
        precision = part.precision.0,
        faces = part.faces.len(),
        "partition_done"
    );
    match &args.out {
        Some(out) => {
            let doc = ResultDoc::coverage(cfg.rho, &cfg.predictors, &part);
            write_result(out, &doc, args.payload(Mode::Coverage, &cfg))
        }
        None => {
            report::write_coverage(&mut io::stdout().lock(), cfg.rho, &cfg.predictors, &part)?;
            Ok(())
        }
    }
}

fn run_noco(args: RunArgs) -> Result<()> {
    let cfg = args.load(Mode::NoCoverage)?;
    info!(rho = cfg.rho, predictors = cfg.predictors.len(), "noco");
    let part = partition_intervals(cfg.rho, &cfg.predictors)
        .context("computing the interval partition")?;
    info!(intervals = part.intervals.len(), "partition_done");
    match &args.out {
        Some(out) => {
            let doc = ResultDoc::intervals(cfg.rho, &cfg.predictors, &part);
            write_result(out, &doc, args.payload(Mode::NoCoverage, &cfg))
        }
        None => {
            report::write_intervals(&mut io::stdout().lock(), cfg.rho, &cfg.predictors, &part)?;
            Ok(())
        }
    }
}

fn write_result(out: &Path, doc: &ResultDoc<'_>, payload: Payload) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }
    fs::write(out, serde_json::to_vec_pretty(doc)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let sidecar = provenance::write_sidecar(out, payload)?;
    info!(out = %out.display(), provenance = %sidecar.display(), "result_written");
    Ok(())
}
