//! Run holistic projections for a batch of households
//!
//! Reads a JSON array of household snapshots and writes one summary row per household

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};

use retirement_system::{Assumptions, FinancialSnapshot, ProjectionConfig, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Batch household projections")]
struct Args {
    /// JSON array of snapshots, each with an `id`
    #[arg(short, long)]
    input: PathBuf,

    /// Valuation date shared by every household
    #[arg(long)]
    as_of: NaiveDate,

    /// Summary CSV
    #[arg(short, long, default_value = "batch_summary.csv")]
    output: PathBuf,

    /// Assumptions directory (built-in tables when omitted)
    #[arg(long)]
    assumptions: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Household {
    id: String,
    #[serde(flatten)]
    snapshot: FinancialSnapshot,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    id: String,
    current_age: u32,
    retirement_age: u32,
    starting_assets: f64,
    starting_liabilities: f64,
    monthly_pension: f64,
    replacement_ratio: f64,
    assets_at_retirement_nominal: f64,
    assets_at_retirement_real: f64,
    first_month_disposable_nominal: f64,
    first_month_disposable_real: f64,
    depletion_age: Option<u32>,
    validation_errors: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let file = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let households: Vec<Household> =
        serde_json::from_reader(file).context("parsing household snapshots")?;
    println!("Loaded {} households in {:?}", households.len(), start.elapsed());

    let runner = match &args.assumptions {
        Some(path) => ScenarioRunner::with_assumptions(Assumptions::from_csv_path(path)?),
        None => ScenarioRunner::new(),
    };
    let config = ProjectionConfig::new(args.as_of);

    let proj_start = Instant::now();
    let snapshots: Vec<FinancialSnapshot> =
        households.iter().map(|h| h.snapshot.clone()).collect();
    let results = runner.run_batch(&snapshots, &config);
    println!("Projected {} households in {:?}", results.len(), proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for (household, result) in households.iter().zip(&results) {
        writer.serialize(SummaryRow {
            id: household.id.clone(),
            current_age: household.snapshot.plan.current_age,
            retirement_age: household.snapshot.plan.retirement_age,
            starting_assets: result.starting_assets,
            starting_liabilities: result.starting_liabilities,
            monthly_pension: result.retirement.summary.total_monthly_pension,
            replacement_ratio: result.retirement.summary.replacement_ratio,
            assets_at_retirement_nominal: result.summary.assets_at_retirement_nominal,
            assets_at_retirement_real: result.summary.assets_at_retirement_real,
            first_month_disposable_nominal: result.summary.first_month_disposable_income_nominal,
            first_month_disposable_real: result.summary.first_month_disposable_income_real,
            depletion_age: result.depletion_age(),
            validation_errors: result.validation_errors.len(),
        })?;
    }
    writer.flush()?;

    println!("Wrote summary to {}", args.output.display());
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
