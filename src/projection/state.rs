//! Year-over-year state of a household projection

use chrono::Datelike;

use super::cashflows::Phase;
use crate::plan::Liability;

/// A liability as tracked through the projection
#[derive(Debug, Clone)]
pub struct TrackedLiability {
    pub id: String,
    pub balance: f64,

    /// `monthly_payment * 12`
    pub annual_payment: f64,

    /// Last calendar year in which payments are made
    pub final_year: i32,
}

impl TrackedLiability {
    pub fn from_liability(liability: &Liability) -> Self {
        Self {
            id: liability.id.clone(),
            balance: liability.outstanding_balance.max(0.0),
            annual_payment: liability.monthly_payment.max(0.0) * 12.0,
            final_year: liability.start_date.year() + liability.loan_period_years as i32,
        }
    }

    /// Within its contractual term, whether or not the balance is repaid
    pub fn is_within_term(&self, calendar_year: i32) -> bool {
        calendar_year <= self.final_year
    }
}

/// State at the start of a projection year
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Years since the valuation date (0 for the first projected year)
    pub years_from_now: u32,
    pub age: u32,
    pub calendar_year: i32,

    /// Investable assets in nominal terms
    pub assets: f64,
    pub liabilities: Vec<TrackedLiability>,
}

impl ProjectionState {
    pub fn new(age: u32, calendar_year: i32, assets: f64, liabilities: &[Liability]) -> Self {
        Self {
            years_from_now: 0,
            age,
            calendar_year,
            assets,
            liabilities: liabilities.iter().map(TrackedLiability::from_liability).collect(),
        }
    }

    pub fn total_liabilities(&self) -> f64 {
        self.liabilities.iter().fold(0.0, |acc, l| acc + l.balance)
    }

    /// Debt service due this calendar year
    ///
    /// While accumulating, every liability still inside its term pays. Once retired,
    /// every liability pays for as long as any balance is outstanding.
    pub fn debt_payment(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Accumulation => self
                .liabilities
                .iter()
                .filter(|l| l.is_within_term(self.calendar_year))
                .fold(0.0, |acc, l| acc + l.annual_payment),
            Phase::Decumulation if self.total_liabilities() > 0.0 => self
                .liabilities
                .iter()
                .fold(0.0, |acc, l| acc + l.annual_payment),
            Phase::Decumulation => 0.0,
        }
    }

    /// Reduce the aggregate balance by `payment` (capped at the total owed),
    /// spread across liabilities in proportion to their balances
    pub fn apply_debt_payment(&mut self, payment: f64) {
        let total = self.total_liabilities();
        if total <= 0.0 || payment <= 0.0 {
            return;
        }
        let reduction = payment.min(total);
        for liability in self.liabilities.iter_mut() {
            let share = liability.balance / total;
            liability.balance = (liability.balance - reduction * share).max(0.0);
        }
    }

    /// Move to the next year
    pub fn advance_year(&mut self) {
        self.years_from_now += 1;
        self.age += 1;
        self.calendar_year += 1;
    }
}
