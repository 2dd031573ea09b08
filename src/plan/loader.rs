//! Load plans (JSON) and holdings, liabilities and quotes (CSV)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use log::debug;
use serde::de::DeserializeOwned;

use super::data::{normalize_symbol, Holding, Liability, PlanParameters, Quote};
use crate::error::Result;

/// Load plan parameters from a JSON file; missing fields take the default plan values
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<PlanParameters> {
    let file = File::open(path)?;
    let plan = serde_json::from_reader(file)?;
    Ok(plan)
}

/// Load holdings from a CSV file
pub fn load_holdings<P: AsRef<Path>>(path: P) -> Result<Vec<Holding>> {
    load_holdings_from_reader(File::open(path)?)
}

/// Load holdings from any reader
pub fn load_holdings_from_reader<R: Read>(reader: R) -> Result<Vec<Holding>> {
    let holdings: Vec<Holding> = read_records(reader)?;
    debug!("Loaded {} holdings", holdings.len());
    Ok(holdings)
}

/// Load liabilities from a CSV file
pub fn load_liabilities<P: AsRef<Path>>(path: P) -> Result<Vec<Liability>> {
    load_liabilities_from_reader(File::open(path)?)
}

/// Load liabilities from any reader
pub fn load_liabilities_from_reader<R: Read>(reader: R) -> Result<Vec<Liability>> {
    let liabilities: Vec<Liability> = read_records(reader)?;
    debug!("Loaded {} liabilities", liabilities.len());
    Ok(liabilities)
}

/// Load a quote snapshot from a CSV file, keyed by normalized symbol
pub fn load_quotes<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Quote>> {
    load_quotes_from_reader(File::open(path)?)
}

/// Load a quote snapshot from any reader
///
/// A symbol listed twice keeps its last row.
pub fn load_quotes_from_reader<R: Read>(reader: R) -> Result<HashMap<String, Quote>> {
    let quotes: Vec<Quote> = read_records(reader)?;
    Ok(index_quotes(quotes))
}

/// Index quotes by normalized symbol
pub fn index_quotes(quotes: Vec<Quote>) -> HashMap<String, Quote> {
    quotes
        .into_iter()
        .map(|quote| (normalize_symbol(&quote.symbol), quote))
        .collect()
}

fn read_records<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::plan::{AssetClass, Currency, DebtType};
    use chrono::NaiveDate;

    #[test]
    fn test_load_holdings_from_reader() {
        let data = "\
symbol,name,asset_class,quantity,cost_basis,currency
0050,Taiwan 50,etf,1000,120.5,TWD
VT,Vanguard Total World,etf,20,95,USD
CASH,Savings,cash,300000,1,TWD
";
        let holdings = load_holdings_from_reader(data.as_bytes()).unwrap();
        assert_eq!(holdings.len(), 3);
        assert_eq!(holdings[0].symbol, "0050");
        assert_eq!(holdings[1].currency, Currency::Usd);
        assert_eq!(holdings[2].asset_class, AssetClass::Cash);
    }

    #[test]
    fn test_load_liabilities_from_reader() {
        let data = "\
id,name,debt_type,total_amount,outstanding_balance,interest_rate,loan_period_years,grace_period_years,start_date,monthly_payment,grace_period_payment
home,My house,mortgage,8000000,7500000,2.1,30,2,2022-03-15,31000,14000
";
        let liabilities = load_liabilities_from_reader(data.as_bytes()).unwrap();
        assert_eq!(liabilities.len(), 1);
        let home = &liabilities[0];
        assert_eq!(home.debt_type, DebtType::Mortgage);
        assert_eq!(home.start_date, NaiveDate::from_ymd_opt(2022, 3, 15).unwrap());
        assert_eq!(home.grace_period_years, 2);
    }

    #[test]
    fn test_load_quotes_indexes_by_symbol() {
        let data = "\
symbol,price,previous_close
vt,110.2,109.8
0050,150,
";
        let quotes = load_quotes_from_reader(data.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes["VT"].previous_close, Some(109.8));
        assert_eq!(quotes["0050"].previous_close, None);
    }

    #[test]
    fn test_bad_record_is_csv_error() {
        let data = "\
symbol,name,asset_class,quantity,cost_basis,currency
VT,,etf,many,95,USD
";
        let result = load_holdings_from_reader(data.as_bytes());
        assert!(matches!(result, Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_load_sample_plan() {
        let plan = load_plan("data/sample/plan.json").expect("Failed to load sample plan");
        assert!(plan.validate().is_empty());
    }
}
