//! Retirement System CLI
//!
//! Command-line interface for pension analysis, household projections and loan tools

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use retirement_system::debt::{roll_forward_all, DebtSummary};
use retirement_system::plan::{
    load_holdings, load_liabilities, load_plan, load_quotes, STALE_PLAN_DAYS,
};
use retirement_system::{Assumptions, InMemoryDataSource, ProjectionConfig, RetirementService};

const CLI_USER: &str = "cli";

#[derive(Parser, Debug)]
#[command(
    name = "retirement_system",
    version,
    about = "Retirement and financial-freedom projections"
)]
struct Cli {
    /// Directory with annuity factors, retirement age ramp and policy rules
    /// (built-in tables when omitted)
    #[arg(long, global = true)]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Labor pension + labor insurance analysis for a plan
    Analyze {
        #[arg(long)]
        plan: PathBuf,
    },
    /// Year-by-year projection of assets, debts and retirement income
    Project {
        #[arg(long)]
        plan: PathBuf,
        #[arg(long)]
        holdings: Option<PathBuf>,
        #[arg(long)]
        liabilities: Option<PathBuf>,
        #[arg(long)]
        quotes: Option<PathBuf>,
        /// USD to TWD rate
        #[arg(long)]
        fx_rate: Option<f64>,
        /// Valuation date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Timeseries CSV output (summary only when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Monthly payments of a loan
    Amortize {
        #[arg(long)]
        principal: f64,
        /// Annual interest rate (%)
        #[arg(long)]
        rate: f64,
        /// Term in years
        #[arg(long)]
        term: u32,
        /// Interest-only years at the start of the term
        #[arg(long, default_value_t = 0)]
        grace: u32,
    },
    /// Recompute outstanding balances of liabilities as of a date
    Rollforward {
        #[arg(long)]
        liabilities: PathBuf,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let assumptions = match &cli.assumptions {
        Some(path) => Assumptions::from_csv_path(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => Assumptions::taiwan_2024(),
    };

    match cli.command {
        Command::Analyze { plan } => analyze(assumptions, &plan),
        Command::Project {
            plan,
            holdings,
            liabilities,
            quotes,
            fx_rate,
            as_of,
            output,
        } => {
            let mut source = InMemoryDataSource::new()
                .with_plan(CLI_USER, load_plan(&plan).context("loading plan")?);
            if let Some(path) = holdings {
                let holdings = load_holdings(&path).context("loading holdings")?;
                source = source.with_holdings(CLI_USER, holdings);
            }
            if let Some(path) = liabilities {
                let liabilities = load_liabilities(&path).context("loading liabilities")?;
                source = source.with_liabilities(CLI_USER, liabilities);
            }
            if let Some(path) = quotes {
                let quotes = load_quotes(&path).context("loading quotes")?;
                source = source.with_quotes(quotes.into_values().collect());
            }
            if let Some(rate) = fx_rate {
                source = source.with_usd_rate(rate);
            }
            project(assumptions, source, as_of.unwrap_or_else(today), output)
        }
        Command::Amortize {
            principal,
            rate,
            term,
            grace,
        } => {
            let service = RetirementService::new(Arc::new(InMemoryDataSource::new()), assumptions);
            let payments = service.amortize_loan(principal, rate, term, grace);
            println!("Principal:            {:>14.2}", principal);
            println!("Grace period payment: {:>14.2}", payments.grace_period_payment);
            println!("Regular payment:      {:>14.2}", payments.regular_payment);
            Ok(())
        }
        Command::Rollforward { liabilities, as_of } => {
            let liabilities = load_liabilities(&liabilities).context("loading liabilities")?;
            let as_of = as_of.unwrap_or_else(today);
            let snapshots = roll_forward_all(&liabilities, as_of);

            println!("Liabilities as of {}", as_of);
            println!(
                "{:<16} {:>8} {:>16} {:>12} {:>6}",
                "Id", "Months", "Outstanding", "Payment", "Grace"
            );
            for snapshot in &snapshots {
                println!(
                    "{:<16} {:>8} {:>16.0} {:>12.0} {:>6}",
                    snapshot.liability_id,
                    snapshot.months_elapsed,
                    snapshot.outstanding_balance,
                    snapshot.current_payment,
                    if snapshot.in_grace_period { "yes" } else { "" }
                );
            }
            let summary = DebtSummary::from_snapshots(&snapshots);
            println!(
                "Total outstanding {:.0}, monthly payment {:.0}",
                summary.total_outstanding, summary.total_monthly_payment
            );
            Ok(())
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn analyze(assumptions: Assumptions, plan_path: &Path) -> Result<()> {
    let plan = load_plan(plan_path).context("loading plan")?;
    if plan.is_stale(Local::now().naive_local()) {
        println!("Note: plan has not been updated in over {} days\n", STALE_PLAN_DAYS);
    }

    let service = RetirementService::new(Arc::new(InMemoryDataSource::new()), assumptions);
    let analysis = service.run_retirement_analysis(&plan);

    for error in &analysis.validation_errors {
        println!("Validation: {}", error);
    }

    let dc = &analysis.labor_pension;
    println!("Labor pension (individual account)");
    println!("  Balance at retirement: {:>14.0}", dc.balance_at_retirement);
    println!("  Balance at age {}:     {:>14.0}", dc.claim_age, dc.final_balance);
    println!("  Today's money:         {:>14.0}", dc.real_value);
    println!(
        "  Monthly pension:       {:>14.0}{}",
        dc.monthly_pension,
        if dc.can_pay_monthly { "" } else { "  (lump sum only)" }
    );

    let db = &analysis.labor_insurance;
    println!("Labor insurance (old-age annuity)");
    println!("  Legal age:             {:>14}", db.legal_age);
    match &db.remark {
        Some(remark) => println!("  Not eligible: {}", remark),
        None => println!(
            "  Monthly pension:       {:>14.0}  (formula {:?}, delay bonus {:.0}%)",
            db.monthly_pension,
            db.formula_used,
            db.delay_bonus_rate * 100.0
        ),
    }

    println!(
        "Total {:.0}/month, replacement ratio {:.1}% ({:?})",
        analysis.summary.total_monthly_pension,
        analysis.summary.replacement_ratio,
        analysis.summary.level
    );

    println!("\nIncome stages");
    for stage in analysis.income_stages() {
        let end = stage
            .end_age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "+".to_string());
        println!(
            "  {:>3} - {:<3} {:?}: {:.0}/month",
            stage.start_age, end, stage.kind, stage.monthly_income
        );
    }

    println!("\nSensitivity (account return)");
    for point in &analysis.sensitivity {
        println!(
            "  {:>4.1}%  final {:>14.0}  monthly {:>10.0}  real {:>14.0}",
            point.rate_pct, point.final_amount, point.monthly_pension, point.real_value
        );
    }
    Ok(())
}

fn project(
    assumptions: Assumptions,
    source: InMemoryDataSource,
    as_of: NaiveDate,
    output: Option<PathBuf>,
) -> Result<()> {
    let service = RetirementService::new(Arc::new(source), assumptions);
    let result = service.run_holistic_projection(CLI_USER, &ProjectionConfig::new(as_of));

    for error in &result.validation_errors {
        println!("Validation: {}", error);
    }

    let summary = &result.summary;
    println!("Projection as of {}", as_of);
    println!("  Starting assets:            {:>16.0}", result.starting_assets);
    println!("  Starting liabilities:       {:>16.0}", result.starting_liabilities);
    println!(
        "  Assets at retirement:       {:>16.0}  (today's money {:.0})",
        summary.assets_at_retirement_nominal, summary.assets_at_retirement_real
    );
    println!(
        "  First-month disposable:     {:>16.0}  (today's money {:.0})",
        summary.first_month_disposable_income_nominal, summary.first_month_disposable_income_real
    );
    if let Some(age) = result.depletion_age() {
        println!("  Assets run out at age {}", age);
    }

    if let Some(path) = output {
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        result.write_csv(file)?;
        println!("Wrote {} rows to {}", result.timeseries.len(), path.display());
    }
    Ok(())
}
