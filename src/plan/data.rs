//! Per-user input records: plan parameters, holdings, quotes and liabilities

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, ValidationError};

/// A plan whose last update is older than this is flagged as stale
pub const STALE_PLAN_DAYS: i64 = 180;

/// Retirement plan parameters (one per user)
///
/// Every rate is a percentage: `5.0` means 5% per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanParameters {
    pub current_age: u32,
    pub birth_year: i32,
    pub retirement_age: u32,

    /// Average monthly salary before tax
    pub avg_monthly_salary: f64,

    /// Current balance of the labor pension individual account
    pub current_pension_principal: f64,

    /// Voluntary employee contribution (0-6%)
    pub self_contribution_rate: f64,

    /// Service years accrued so far (shared by labor insurance and labor pension)
    pub current_total_seniority: f64,

    /// Annual return of the labor pension account
    pub expected_return_rate: f64,
    pub salary_growth_rate: f64,

    /// Annual return of the general investment portfolio
    pub asset_return_rate: f64,
    pub dividend_yield: f64,

    /// Share of assets drawn each retirement year on top of dividends
    pub withdrawal_rate: f64,
    pub inflation_rate: f64,

    /// New money invested each year before retirement
    pub annual_investment: f64,

    pub last_updated: Option<NaiveDateTime>,
}

impl Default for PlanParameters {
    fn default() -> Self {
        Self {
            current_age: 35,
            birth_year: 1990,
            retirement_age: 65,
            avg_monthly_salary: 50_000.0,
            current_pension_principal: 500_000.0,
            self_contribution_rate: 6.0,
            current_total_seniority: 10.0,
            expected_return_rate: 5.0,
            salary_growth_rate: 2.0,
            asset_return_rate: 7.0,
            dividend_yield: 2.5,
            withdrawal_rate: 4.0,
            inflation_rate: 2.0,
            annual_investment: 0.0,
            last_updated: None,
        }
    }
}

impl PlanParameters {
    /// Years left until retirement; negative for an inconsistent plan
    pub fn years_to_retirement(&self) -> i32 {
        self.retirement_age as i32 - self.current_age as i32
    }

    /// Check the plan invariants, returning every violation found
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.retirement_age <= self.current_age {
            errors.push(ValidationError::RetirementBeforeCurrentAge {
                current_age: self.current_age,
                retirement_age: self.retirement_age,
            });
        }
        if !(0.0..=6.0).contains(&self.self_contribution_rate) {
            errors.push(ValidationError::ContributionRateOutOfRange(
                self.self_contribution_rate,
            ));
        }

        check_non_negative(&mut errors, "avg_monthly_salary", self.avg_monthly_salary);
        check_non_negative(
            &mut errors,
            "current_pension_principal",
            self.current_pension_principal,
        );
        check_non_negative(
            &mut errors,
            "current_total_seniority",
            self.current_total_seniority,
        );
        check_non_negative(&mut errors, "annual_investment", self.annual_investment);

        errors
    }

    /// Whether the plan has not been saved within [`STALE_PLAN_DAYS`] of `as_of`
    ///
    /// A plan that was never saved is not considered stale.
    pub fn is_stale(&self, as_of: NaiveDateTime) -> bool {
        match self.last_updated {
            Some(updated) => (as_of - updated).num_days() > STALE_PLAN_DAYS,
            None => false,
        }
    }
}

/// Asset class of a holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Equity,
    Etf,
    Bond,
    Crypto,
    Cash,
    Other,
}

/// Currency a holding or quote is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[serde(alias = "twd")]
    Twd,
    #[serde(alias = "usd")]
    Usd,
    /// Dollar stablecoin, converted at the USD rate
    #[serde(alias = "usdt")]
    Usdt,
}

/// A single asset position
///
/// Market value is never stored; it is derived from a quote at valuation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub asset_class: AssetClass,
    pub quantity: f64,

    /// Average cost per unit
    pub cost_basis: f64,
    pub currency: Currency,
}

impl Holding {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.symbol.trim().is_empty() && (self.quantity > 0.0 || self.cost_basis > 0.0) {
            errors.push(ValidationError::MissingSymbol);
        }
        check_non_negative(&mut errors, "quantity", self.quantity);
        check_non_negative(&mut errors, "cost_basis", self.cost_basis);

        errors
    }

    /// Lookup key into a quote snapshot
    pub fn quote_key(&self) -> String {
        normalize_symbol(&self.symbol)
    }
}

/// Latest price for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    #[serde(default)]
    pub previous_close: Option<f64>,
}

/// Canonical form of a ticker symbol used for quote lookups
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Kind of debt instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtType {
    Mortgage,
    Personal,
    Auto,
    Student,
    Other,
}

/// A debt instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liability {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub debt_type: DebtType,
    pub total_amount: f64,
    pub outstanding_balance: f64,

    /// Annual interest rate (%)
    pub interest_rate: f64,
    pub loan_period_years: u32,
    #[serde(default)]
    pub grace_period_years: u32,
    pub start_date: NaiveDate,

    /// Regular monthly payment; derived from the amortization formula but user-editable
    pub monthly_payment: f64,
    #[serde(default)]
    pub grace_period_payment: f64,
}

impl Liability {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        check_non_negative(&mut errors, "total_amount", self.total_amount);
        check_non_negative(&mut errors, "outstanding_balance", self.outstanding_balance);
        check_non_negative(&mut errors, "interest_rate", self.interest_rate);
        check_non_negative(&mut errors, "monthly_payment", self.monthly_payment);

        if self.outstanding_balance > self.total_amount {
            errors.push(ValidationError::BalanceExceedsTotal {
                id: self.id.clone(),
                outstanding: self.outstanding_balance,
                total: self.total_amount,
            });
        }

        errors
    }

    /// Label for display: the custom name when set, else the id
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
