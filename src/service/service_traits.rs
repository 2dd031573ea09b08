use std::collections::HashMap;

use crate::plan::{Holding, Liability, PlanParameters, Quote};
use crate::portfolio::{AssetMetricsCalculator, FxTable, FALLBACK_USD_RATE};

/// Source of per-user records and market data consumed by the retirement service
pub trait FinancialDataSource: Send + Sync {
    fn plan_parameters(&self, user_id: &str) -> Option<PlanParameters>;
    fn holdings(&self, user_id: &str) -> Vec<Holding>;
    fn liabilities(&self, user_id: &str) -> Vec<Liability>;

    /// Latest quotes keyed by normalized symbol
    fn quotes(&self) -> HashMap<String, Quote>;
    fn usd_to_local_rate(&self) -> Option<f64>;

    /// Local-currency value of a user's holdings
    fn current_asset_value(&self, user_id: &str) -> f64 {
        let fx = FxTable::from_usd_rate(self.usd_to_local_rate().unwrap_or(FALLBACK_USD_RATE));
        AssetMetricsCalculator::total_value(&self.holdings(user_id), &self.quotes(), &fx)
    }
}
