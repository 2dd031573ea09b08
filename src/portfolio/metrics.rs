//! Per-holding valuation, P&L and allocation

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::fx::FxTable;
use crate::plan::{AssetClass, Currency, Holding, Quote};

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// A holding with its derived market metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedHolding {
    pub symbol: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub currency: Currency,
    pub quantity: f64,
    pub cost_basis: f64,

    // Pricing
    pub price: f64,
    pub previous_close: f64,
    /// No quote was found; `price` fell back to the cost basis
    pub quote_missing: bool,

    // Holding currency
    pub market_value: f64,
    pub cost: f64,
    pub pnl: f64,
    pub pnl_ratio_pct: f64,
    pub day_change: f64,
    pub day_change_pct: f64,

    // Local currency
    pub fx_rate: f64,
    pub market_value_local: f64,
    pub cost_local: f64,
    pub weight_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub market_value: f64,
    pub cost: f64,
    pub pnl: f64,
    pub pnl_ratio_pct: f64,
    pub day_change: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub market_value: f64,
    pub weight_pct: f64,
}

/// Valuation of a whole portfolio in local currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub holdings: Vec<EnrichedHolding>,
    pub totals: PortfolioTotals,
    pub allocation_by_class: BTreeMap<AssetClass, AllocationSlice>,
    pub allocation_by_currency: BTreeMap<Currency, AllocationSlice>,
}

impl PortfolioValuation {
    pub fn total_market_value(&self) -> f64 {
        self.totals.market_value
    }
}

pub struct AssetMetricsCalculator;

impl AssetMetricsCalculator {
    /// Value every holding against a quote snapshot keyed by normalized symbol
    pub fn enrich(
        holdings: &[Holding],
        quotes: &HashMap<String, Quote>,
        fx: &FxTable,
    ) -> PortfolioValuation {
        let mut rows: Vec<EnrichedHolding> = holdings
            .iter()
            .map(|holding| Self::enrich_holding(holding, quotes, fx))
            .collect();

        let mut totals = PortfolioTotals::default();
        let mut day_change_local = 0.0;
        for row in &rows {
            totals.market_value += row.market_value_local;
            totals.cost += row.cost_local;
            day_change_local += row.day_change * row.fx_rate;
        }
        totals.pnl = totals.market_value - totals.cost;
        totals.pnl_ratio_pct = safe_ratio(totals.pnl, totals.cost) * 100.0;
        totals.day_change = day_change_local;

        let mut allocation_by_class: BTreeMap<AssetClass, AllocationSlice> = BTreeMap::new();
        let mut allocation_by_currency: BTreeMap<Currency, AllocationSlice> = BTreeMap::new();
        for row in rows.iter_mut() {
            row.weight_pct = safe_ratio(row.market_value_local, totals.market_value) * 100.0;

            let slice = allocation_by_class.entry(row.asset_class).or_default();
            slice.market_value += row.market_value_local;
            slice.weight_pct += row.weight_pct;

            let slice = allocation_by_currency.entry(row.currency).or_default();
            slice.market_value += row.market_value_local;
            slice.weight_pct += row.weight_pct;
        }

        debug!(
            "Valued {} holdings: total {:.0}, P&L {:.0}",
            rows.len(),
            totals.market_value,
            totals.pnl
        );

        PortfolioValuation {
            holdings: rows,
            totals,
            allocation_by_class,
            allocation_by_currency,
        }
    }

    /// Total local-currency market value of the holdings
    pub fn total_value(
        holdings: &[Holding],
        quotes: &HashMap<String, Quote>,
        fx: &FxTable,
    ) -> f64 {
        Self::enrich(holdings, quotes, fx).total_market_value()
    }

    fn enrich_holding(
        holding: &Holding,
        quotes: &HashMap<String, Quote>,
        fx: &FxTable,
    ) -> EnrichedHolding {
        let (price, previous_close, quote_missing) = if holding.asset_class == AssetClass::Cash {
            (1.0, 1.0, false)
        } else {
            match quotes.get(&holding.quote_key()) {
                Some(quote) => (
                    quote.price,
                    quote.previous_close.unwrap_or(quote.price),
                    false,
                ),
                None => {
                    warn!(
                        "No quote for {}. Using cost basis {} as price.",
                        holding.symbol, holding.cost_basis
                    );
                    (holding.cost_basis, holding.cost_basis, true)
                }
            }
        };

        let quantity = holding.quantity;
        let market_value = quantity * price;
        let cost = quantity * holding.cost_basis;
        let pnl = market_value - cost;
        let day_move = price - previous_close;
        let fx_rate = fx.rate(holding.currency);

        EnrichedHolding {
            symbol: holding.symbol.clone(),
            name: holding.name.clone(),
            asset_class: holding.asset_class,
            currency: holding.currency,
            quantity,
            cost_basis: holding.cost_basis,
            price,
            previous_close,
            quote_missing,
            market_value,
            cost,
            pnl,
            pnl_ratio_pct: safe_ratio(pnl, cost) * 100.0,
            day_change: day_move * quantity,
            day_change_pct: safe_ratio(day_move, previous_close) * 100.0,
            fx_rate,
            market_value_local: market_value * fx_rate,
            cost_local: cost * fx_rate,
            weight_pct: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::index_quotes;
    use approx::assert_relative_eq;

    fn holding(symbol: &str, class: AssetClass, qty: f64, cost: f64, ccy: Currency) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            name: String::new(),
            asset_class: class,
            quantity: qty,
            cost_basis: cost,
            currency: ccy,
        }
    }

    fn quote(symbol: &str, price: f64, previous_close: Option<f64>) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price,
            previous_close,
        }
    }

    #[test]
    fn test_single_usd_holding() {
        let holdings = vec![holding("vt", AssetClass::Etf, 10.0, 100.0, Currency::Usd)];
        let quotes = index_quotes(vec![quote("VT", 110.0, Some(108.0))]);
        let valuation =
            AssetMetricsCalculator::enrich(&holdings, &quotes, &FxTable::from_usd_rate(30.0));

        let row = &valuation.holdings[0];
        assert_relative_eq!(row.market_value, 1_100.0);
        assert_relative_eq!(row.pnl, 100.0);
        assert_relative_eq!(row.pnl_ratio_pct, 10.0, epsilon = 1e-9);
        assert_relative_eq!(row.day_change, 20.0);
        assert_relative_eq!(row.day_change_pct, 2.0 / 108.0 * 100.0, epsilon = 1e-9);
        assert_relative_eq!(row.market_value_local, 33_000.0);
        assert_relative_eq!(row.weight_pct, 100.0);
        assert!(!row.quote_missing);
    }

    #[test]
    fn test_cash_is_priced_at_par() {
        let holdings = vec![holding("CASH", AssetClass::Cash, 250_000.0, 1.0, Currency::Twd)];
        let valuation =
            AssetMetricsCalculator::enrich(&holdings, &HashMap::new(), &FxTable::default());

        let row = &valuation.holdings[0];
        assert_eq!(row.price, 1.0);
        assert_eq!(row.day_change, 0.0);
        assert!(!row.quote_missing);
        assert_eq!(valuation.totals.market_value, 250_000.0);
    }

    #[test]
    fn test_missing_quote_falls_back_to_cost() {
        let holdings = vec![holding("2330", AssetClass::Equity, 100.0, 600.0, Currency::Twd)];
        let valuation =
            AssetMetricsCalculator::enrich(&holdings, &HashMap::new(), &FxTable::default());

        let row = &valuation.holdings[0];
        assert!(row.quote_missing);
        assert_eq!(row.price, 600.0);
        assert_eq!(row.pnl, 0.0);
        assert_eq!(row.day_change_pct, 0.0);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let holdings = vec![holding("FREE", AssetClass::Other, 5.0, 0.0, Currency::Twd)];
        let quotes = index_quotes(vec![quote("FREE", 10.0, Some(0.0))]);
        let valuation = AssetMetricsCalculator::enrich(&holdings, &quotes, &FxTable::default());

        let row = &valuation.holdings[0];
        assert_eq!(row.pnl_ratio_pct, 0.0);
        assert_eq!(row.day_change_pct, 0.0);
        assert_eq!(valuation.totals.pnl_ratio_pct, 0.0);

        let empty = AssetMetricsCalculator::enrich(&[], &quotes, &FxTable::default());
        assert_eq!(empty.totals, PortfolioTotals::default());
        assert!(empty.allocation_by_class.is_empty());
    }

    #[test]
    fn test_allocation_sums_to_total() {
        let holdings = vec![
            holding("0050", AssetClass::Etf, 1_000.0, 120.0, Currency::Twd),
            holding("VT", AssetClass::Etf, 100.0, 90.0, Currency::Usd),
            holding("BTC", AssetClass::Crypto, 0.1, 30_000.0, Currency::Usdt),
            holding("CASH", AssetClass::Cash, 100_000.0, 1.0, Currency::Twd),
        ];
        let quotes = index_quotes(vec![
            quote("0050", 150.0, None),
            quote("VT", 100.0, None),
            quote("BTC", 60_000.0, None),
        ]);
        let valuation =
            AssetMetricsCalculator::enrich(&holdings, &quotes, &FxTable::from_usd_rate(30.0));

        // 150000 + 300000 + 180000 + 100000
        assert_relative_eq!(valuation.totals.market_value, 730_000.0, epsilon = 1e-6);
        assert_relative_eq!(
            valuation.allocation_by_class[&AssetClass::Etf].market_value,
            450_000.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            valuation.allocation_by_currency[&Currency::Twd].market_value,
            250_000.0,
            epsilon = 1e-6
        );

        let weight: f64 = valuation
            .allocation_by_class
            .values()
            .map(|slice| slice.weight_pct)
            .sum();
        assert_relative_eq!(weight, 100.0, epsilon = 1e-9);
    }
}
