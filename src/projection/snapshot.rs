//! Everything a projection needs about one household, gathered up front

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::plan::{Holding, Liability, PlanParameters, Quote};
use crate::portfolio::{AssetMetricsCalculator, FxTable};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    #[serde(default)]
    pub plan: PlanParameters,
    #[serde(default)]
    pub holdings: Vec<Holding>,

    /// Latest quotes keyed by normalized symbol
    #[serde(default)]
    pub quotes: HashMap<String, Quote>,
    #[serde(default)]
    pub fx: FxTable,
    #[serde(default)]
    pub liabilities: Vec<Liability>,

    /// Pre-computed portfolio value; takes precedence over valuing `holdings`
    #[serde(default)]
    pub current_asset_value: Option<f64>,
}

impl FinancialSnapshot {
    /// Snapshot with a plan only
    pub fn from_plan(plan: PlanParameters) -> Self {
        Self {
            plan,
            ..Default::default()
        }
    }

    /// Local-currency value of the investable assets
    pub fn asset_value(&self) -> f64 {
        match self.current_asset_value {
            Some(value) => value,
            None => AssetMetricsCalculator::total_value(&self.holdings, &self.quotes, &self.fx),
        }
    }

    pub fn total_liabilities(&self) -> f64 {
        self.liabilities.iter().map(|l| l.outstanding_balance).sum()
    }

    /// Validation errors of the holdings and liabilities (plan errors are reported by the
    /// pension analysis)
    pub fn validate_positions(&self) -> Vec<ValidationError> {
        self.holdings
            .iter()
            .flat_map(|h| h.validate())
            .chain(self.liabilities.iter().flat_map(|l| l.validate()))
            .collect()
    }
}
