//! Portfolio valuation in local currency

mod fx;
mod metrics;

pub use fx::{FxTable, FALLBACK_USD_RATE};
pub use metrics::{
    safe_ratio, AllocationSlice, AssetMetricsCalculator, EnrichedHolding, PortfolioTotals,
    PortfolioValuation,
};
