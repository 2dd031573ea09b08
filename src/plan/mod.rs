//! Plan parameters, holdings and liabilities with their loaders

mod data;
pub mod loader;

pub use data::{
    normalize_symbol, AssetClass, Currency, DebtType, Holding, Liability, PlanParameters, Quote,
    STALE_PLAN_DAYS,
};
pub use loader::{index_quotes, load_holdings, load_liabilities, load_plan, load_quotes};
