//! Exchange rates into the local (base) currency

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::plan::Currency;

/// USD to TWD rate used when no live rate is available
pub const FALLBACK_USD_RATE: f64 = 30.0;

/// Conversion rates into `base`, expressed as base units per unit of currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxTable {
    pub base: Currency,
    pub rates: BTreeMap<Currency, f64>,
}

impl FxTable {
    /// TWD-based table from a single USD rate; USDT converts at the USD rate
    pub fn from_usd_rate(usd_to_twd: f64) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(Currency::Twd, 1.0);
        rates.insert(Currency::Usd, usd_to_twd);
        rates.insert(Currency::Usdt, usd_to_twd);
        Self {
            base: Currency::Twd,
            rates,
        }
    }

    /// Rate for a currency; 1.0 for the base and for currencies missing from the table
    pub fn rate(&self, currency: Currency) -> f64 {
        if currency == self.base {
            return 1.0;
        }
        match self.rates.get(&currency) {
            Some(rate) => *rate,
            None => {
                warn!(
                    "No FX rate for {:?} -> {:?}. Using 1.0.",
                    currency, self.base
                );
                1.0
            }
        }
    }

    pub fn to_local(&self, amount: f64, currency: Currency) -> f64 {
        amount * self.rate(currency)
    }
}

impl Default for FxTable {
    fn default() -> Self {
        Self::from_usd_rate(FALLBACK_USD_RATE)
    }
}
