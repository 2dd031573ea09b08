use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::service_traits::FinancialDataSource;
use crate::assumptions::Assumptions;
use crate::debt::{amortize, refresh_balances, DebtSnapshot, DebtSummary, LoanPayments};
use crate::pension::{RetirementAnalysis, RetirementAnalyzer};
use crate::plan::{Liability, PlanParameters};
use crate::portfolio::{FxTable, FALLBACK_USD_RATE};
use crate::projection::{
    FinancialSnapshot, HolisticProjectionEngine, ProjectionConfig, ProjectionResult,
};

/// Liabilities of a user after rolling their balances forward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRefresh {
    pub liabilities: Vec<Liability>,
    pub snapshots: Vec<DebtSnapshot>,
    pub summary: DebtSummary,
}

/// Entry points exposed to callers: pension analysis, holistic projection and debt tools
#[derive(Clone)]
pub struct RetirementService {
    source: Arc<dyn FinancialDataSource>,
    assumptions: Assumptions,
}

impl RetirementService {
    pub fn new(source: Arc<dyn FinancialDataSource>, assumptions: Assumptions) -> Self {
        Self {
            source,
            assumptions,
        }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn run_retirement_analysis(&self, plan: &PlanParameters) -> RetirementAnalysis {
        RetirementAnalyzer::new(&self.assumptions).analyze(plan)
    }

    /// Gather a user's records into a snapshot, substituting defaults for missing data
    pub fn build_snapshot(&self, user_id: &str) -> FinancialSnapshot {
        let plan = match self.source.plan_parameters(user_id) {
            Some(plan) => plan,
            None => {
                warn!("No plan parameters for user {}. Using the default plan.", user_id);
                PlanParameters::default()
            }
        };

        let usd_rate = match self.source.usd_to_local_rate() {
            Some(rate) => rate,
            None => {
                warn!(
                    "No USD exchange rate available. Using fallback {}.",
                    FALLBACK_USD_RATE
                );
                FALLBACK_USD_RATE
            }
        };

        let snapshot = FinancialSnapshot {
            plan,
            holdings: self.source.holdings(user_id),
            quotes: self.source.quotes(),
            fx: FxTable::from_usd_rate(usd_rate),
            liabilities: self.source.liabilities(user_id),
            current_asset_value: None,
        };
        debug!(
            "Snapshot for {}: {} holdings, {} liabilities",
            user_id,
            snapshot.holdings.len(),
            snapshot.liabilities.len()
        );
        snapshot
    }

    pub fn run_holistic_projection(
        &self,
        user_id: &str,
        config: &ProjectionConfig,
    ) -> ProjectionResult {
        let snapshot = self.build_snapshot(user_id);
        HolisticProjectionEngine::new(self.assumptions.clone(), config.clone()).project(&snapshot)
    }

    pub fn amortize_loan(
        &self,
        principal: f64,
        annual_rate_pct: f64,
        term_years: u32,
        grace_years: u32,
    ) -> LoanPayments {
        amortize(principal, annual_rate_pct, term_years, grace_years)
    }

    /// Recompute the outstanding balance of each of a user's liabilities as of `as_of`
    pub fn refresh_debt_balances(&self, user_id: &str, as_of: NaiveDate) -> DebtRefresh {
        let mut liabilities = self.source.liabilities(user_id);
        let snapshots = refresh_balances(&mut liabilities, as_of);
        let summary = DebtSummary::from_snapshots(&snapshots);
        DebtRefresh {
            liabilities,
            snapshots,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{AssetClass, Currency, DebtType, Holding, Quote};
    use crate::service::InMemoryDataSource;
    use approx::assert_relative_eq;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn vt(quantity: f64) -> Holding {
        Holding {
            symbol: "VT".to_string(),
            name: String::new(),
            asset_class: AssetClass::Etf,
            quantity,
            cost_basis: 90.0,
            currency: Currency::Usd,
        }
    }

    fn vt_quote() -> Quote {
        Quote {
            symbol: "VT".to_string(),
            price: 100.0,
            previous_close: None,
        }
    }

    #[test]
    fn test_missing_plan_and_rate_use_defaults() {
        let source = InMemoryDataSource::new()
            .with_holdings("alice", vec![vt(10.0)])
            .with_quotes(vec![vt_quote()]);
        let service = RetirementService::new(Arc::new(source), Assumptions::default());

        let snapshot = service.build_snapshot("alice");
        assert_eq!(snapshot.plan, PlanParameters::default());
        assert_eq!(snapshot.fx.rate(Currency::Usd), FALLBACK_USD_RATE);

        let result = service.run_holistic_projection("alice", &ProjectionConfig::new(as_of()));
        assert_relative_eq!(result.starting_assets, 30_000.0);
    }

    #[test]
    fn test_source_asset_value_matches_projection_start() {
        let source = InMemoryDataSource::new()
            .with_plan("bob", PlanParameters::default())
            .with_holdings("bob", vec![vt(50.0)])
            .with_quotes(vec![vt_quote()])
            .with_usd_rate(32.0);
        assert_relative_eq!(source.current_asset_value("bob"), 160_000.0);

        let service = RetirementService::new(Arc::new(source), Assumptions::default());
        let result = service.run_holistic_projection("bob", &ProjectionConfig::new(as_of()));
        assert_relative_eq!(result.starting_assets, 160_000.0);
    }

    #[test]
    fn test_refresh_debt_balances() {
        let liability = Liability {
            id: "student".to_string(),
            name: "Student loan".to_string(),
            debt_type: DebtType::Student,
            total_amount: 360_000.0,
            outstanding_balance: 360_000.0,
            interest_rate: 0.0,
            loan_period_years: 3,
            grace_period_years: 0,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            monthly_payment: 10_000.0,
            grace_period_payment: 0.0,
        };
        let source = InMemoryDataSource::new().with_liabilities("carol", vec![liability]);
        let service = RetirementService::new(Arc::new(source), Assumptions::default());

        let refresh = service.refresh_debt_balances("carol", as_of());
        assert_relative_eq!(refresh.liabilities[0].outstanding_balance, 120_000.0);
        assert_eq!(refresh.summary.count, 1);
        assert_relative_eq!(refresh.summary.total_monthly_payment, 10_000.0);
    }

    #[test]
    fn test_amortize_loan_delegates() {
        let service =
            RetirementService::new(Arc::new(InMemoryDataSource::new()), Assumptions::default());
        assert_eq!(
            service.amortize_loan(1_000_000.0, 2.0, 20, 1),
            amortize(1_000_000.0, 2.0, 20, 1)
        );
    }
}
