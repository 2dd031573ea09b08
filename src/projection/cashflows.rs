//! Yearly output rows and the projection result

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::pension::RetirementAnalysis;

/// Life phase of a projection year; switches once, at the retirement age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Accumulation,
    Decumulation,
}

/// One projected year; `_real` fields are in today's money
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    // Timing
    pub age: u32,
    pub calendar_year: i32,
    pub years_from_now: u32,
    pub phase: Phase,

    // Flows
    pub annual_investment_nominal: f64,
    pub investment_gain_nominal: f64,
    pub debt_payment_nominal: f64,

    /// Withdrawal as a percentage of start-of-year assets (0 while accumulating)
    pub withdrawal_percentage: f64,

    // Balances at year end
    pub year_end_assets_nominal: f64,
    pub year_end_assets_real: f64,
    pub year_end_liabilities_nominal: f64,
    pub year_end_liabilities_real: f64,

    // Income
    pub asset_income_nominal: f64,
    pub asset_income_real: f64,
    pub pension_income_nominal: f64,
    pub pension_income_real: f64,
    pub total_income_nominal: f64,
    pub total_income_real: f64,
    pub disposable_income_nominal: f64,
    pub disposable_income_real: f64,
    pub monthly_disposable_income_nominal: f64,
    pub monthly_disposable_income_real: f64,
}

/// Headline figures for the first retirement year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub assets_at_retirement_nominal: f64,
    pub assets_at_retirement_real: f64,
    pub first_year_disposable_income_nominal: f64,
    pub first_year_disposable_income_real: f64,
    pub first_month_disposable_income_nominal: f64,
    pub first_month_disposable_income_real: f64,
    pub first_year_asset_income_nominal: f64,
    pub first_year_pension_income_nominal: f64,
    pub first_year_total_income_nominal: f64,
}

impl ProjectionSummary {
    pub fn from_row(row: &ProjectionYear) -> Self {
        Self {
            assets_at_retirement_nominal: row.year_end_assets_nominal,
            assets_at_retirement_real: row.year_end_assets_real,
            first_year_disposable_income_nominal: row.disposable_income_nominal,
            first_year_disposable_income_real: row.disposable_income_real,
            first_month_disposable_income_nominal: row.monthly_disposable_income_nominal,
            first_month_disposable_income_real: row.monthly_disposable_income_real,
            first_year_asset_income_nominal: row.asset_income_nominal,
            first_year_pension_income_nominal: row.pension_income_nominal,
            first_year_total_income_nominal: row.total_income_nominal,
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub summary: ProjectionSummary,
    pub timeseries: Vec<ProjectionYear>,

    /// Pension analysis feeding the retirement income
    pub retirement: RetirementAnalysis,
    pub starting_assets: f64,
    pub starting_liabilities: f64,

    /// Input problems that were absorbed rather than raised
    pub validation_errors: Vec<ValidationError>,
}

impl ProjectionResult {
    /// Row for a given age, if projected
    pub fn year_at_age(&self, age: u32) -> Option<&ProjectionYear> {
        self.timeseries.iter().find(|row| row.age == age)
    }

    /// First age at which year-end assets turn negative
    pub fn depletion_age(&self) -> Option<u32> {
        self.timeseries
            .iter()
            .find(|row| row.year_end_assets_nominal < 0.0)
            .map(|row| row.age)
    }

    /// Write the timeseries as CSV, one row per year
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.timeseries {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
