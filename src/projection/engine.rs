//! Holistic year-by-year projection of assets, debts and retirement income

use chrono::{Datelike, NaiveDate};
use log::{debug, info};

use super::cashflows::{Phase, ProjectionResult, ProjectionSummary, ProjectionYear};
use super::snapshot::FinancialSnapshot;
use super::state::ProjectionState;
use crate::assumptions::Assumptions;
use crate::pension::{RetirementAnalysis, RetirementAnalyzer};
use crate::portfolio::safe_ratio;

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Valuation date; the first projected year is this date's calendar year
    pub as_of: NaiveDate,

    /// Last age projected (inclusive)
    pub max_age: u32,
}

impl ProjectionConfig {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            max_age: 100,
        }
    }

    pub fn with_max_age(mut self, max_age: u32) -> Self {
        self.max_age = max_age;
        self
    }
}

/// Yearly pension cash flows resolved from a retirement analysis
#[derive(Debug, Clone, Copy)]
struct PensionSchedule {
    labor_pension_annual: f64,
    labor_insurance_annual: f64,
    labor_pension_age: u32,
    legal_age: u32,
}

impl PensionSchedule {
    fn new(analysis: &RetirementAnalysis, labor_pension_age: u32) -> Self {
        Self {
            labor_pension_annual: analysis.labor_pension.payable_monthly() * 12.0,
            labor_insurance_annual: analysis.labor_insurance.payable_monthly() * 12.0,
            labor_pension_age,
            legal_age: analysis.labor_insurance.legal_age,
        }
    }

    fn income_at(&self, age: u32) -> f64 {
        if age >= self.legal_age {
            self.labor_pension_annual + self.labor_insurance_annual
        } else if age >= self.labor_pension_age {
            self.labor_pension_annual
        } else {
            0.0
        }
    }
}

/// Main projection engine
pub struct HolisticProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl HolisticProjectionEngine {
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self {
            assumptions,
            config,
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project a household from the current age to `max_age`
    ///
    /// Never fails: invalid inputs are reported on the result and contribute zero.
    pub fn project(&self, snapshot: &FinancialSnapshot) -> ProjectionResult {
        let plan = &snapshot.plan;
        let retirement = RetirementAnalyzer::new(&self.assumptions).analyze(plan);
        let pensions = PensionSchedule::new(&retirement, self.assumptions.labor_pension.claim_age);

        let mut validation_errors = retirement.validation_errors.clone();
        validation_errors.extend(snapshot.validate_positions());

        let starting_assets = snapshot.asset_value();
        let mut state = ProjectionState::new(
            plan.current_age,
            self.config.as_of.year(),
            starting_assets,
            &snapshot.liabilities,
        );
        let starting_liabilities = state.total_liabilities();

        let asset_return = plan.asset_return_rate / 100.0;
        let dividend_yield = plan.dividend_yield / 100.0;
        let withdrawal_rate = plan.withdrawal_rate / 100.0;
        let inflation = plan.inflation_rate / 100.0;

        let mut timeseries = Vec::new();
        while state.age <= self.config.max_age {
            let phase = if state.age < plan.retirement_age {
                Phase::Accumulation
            } else {
                Phase::Decumulation
            };

            let debt_payment = state.debt_payment(phase);
            state.apply_debt_payment(debt_payment);

            let (annual_investment, investment_gain, asset_income, pension_income, withdrawal_pct) =
                match phase {
                    Phase::Accumulation => {
                        let invested = state.assets + plan.annual_investment;
                        let gain = invested * asset_return;
                        state.assets = invested + gain - debt_payment;
                        (plan.annual_investment, gain, 0.0, 0.0, 0.0)
                    }
                    Phase::Decumulation => {
                        let income_base = state.assets.max(0.0);
                        let dividends = income_base * dividend_yield;
                        let withdrawal = income_base * withdrawal_rate;
                        let withdrawal_pct = safe_ratio(withdrawal, income_base) * 100.0;

                        // Only the withdrawal erodes principal; dividends are paid out of yield.
                        // Debt service comes out of income, not assets.
                        let remaining = state.assets - withdrawal;
                        let gain = remaining * asset_return;
                        state.assets = remaining + gain;
                        (
                            0.0,
                            gain,
                            dividends + withdrawal,
                            pensions.income_at(state.age),
                            withdrawal_pct,
                        )
                    }
                };

            let total_income = asset_income + pension_income;
            let disposable_income = total_income - debt_payment;
            let deflator = (1.0 + inflation).powi(state.years_from_now as i32 + 1);
            let liabilities = state.total_liabilities();

            timeseries.push(ProjectionYear {
                age: state.age,
                calendar_year: state.calendar_year,
                years_from_now: state.years_from_now,
                phase,
                annual_investment_nominal: annual_investment,
                investment_gain_nominal: investment_gain,
                debt_payment_nominal: debt_payment,
                withdrawal_percentage: withdrawal_pct,
                year_end_assets_nominal: state.assets,
                year_end_assets_real: state.assets / deflator,
                year_end_liabilities_nominal: liabilities,
                year_end_liabilities_real: liabilities / deflator,
                asset_income_nominal: asset_income,
                asset_income_real: asset_income / deflator,
                pension_income_nominal: pension_income,
                pension_income_real: pension_income / deflator,
                total_income_nominal: total_income,
                total_income_real: total_income / deflator,
                disposable_income_nominal: disposable_income,
                disposable_income_real: disposable_income / deflator,
                monthly_disposable_income_nominal: disposable_income / 12.0,
                monthly_disposable_income_real: disposable_income / 12.0 / deflator,
            });

            state.advance_year();
        }

        let summary = timeseries
            .iter()
            .find(|row| row.age == plan.retirement_age)
            .map(ProjectionSummary::from_row)
            .unwrap_or_default();

        debug!(
            "Projected {} years from age {}: {} validation error(s)",
            timeseries.len(),
            plan.current_age,
            validation_errors.len()
        );
        info!(
            "Assets at retirement {:.0} (real {:.0}), first-month disposable income {:.0}",
            summary.assets_at_retirement_nominal,
            summary.assets_at_retirement_real,
            summary.first_month_disposable_income_nominal
        );

        ProjectionResult {
            summary,
            timeseries,
            retirement,
            starting_assets,
            starting_liabilities,
            validation_errors,
        }
    }
}
