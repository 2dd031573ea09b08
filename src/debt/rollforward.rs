//! Roll a liability forward from its start date to a valuation date

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use super::amortization::amortize;
use crate::plan::Liability;

/// State of a liability on a valuation date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSnapshot {
    pub liability_id: String,
    pub months_elapsed: u32,
    pub outstanding_balance: f64,
    pub in_grace_period: bool,

    /// Payment due for the current month; 0 once repaid
    pub current_payment: f64,
    pub remaining_months: u32,
}

/// Aggregate of several liabilities on one date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub count: usize,
    pub total_outstanding: f64,
    pub total_monthly_payment: f64,
}

impl DebtSummary {
    pub fn from_snapshots(snapshots: &[DebtSnapshot]) -> Self {
        Self {
            count: snapshots.len(),
            total_outstanding: snapshots.iter().map(|s| s.outstanding_balance).sum(),
            total_monthly_payment: snapshots.iter().map(|s| s.current_payment).sum(),
        }
    }
}

/// Whole months from `start` to `end`; a partial month does not count
///
/// Negative when `end` precedes `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months
}

/// Amortize `liability` month by month from its start date up to `as_of`
///
/// Starts from `total_amount` and ignores the stored `outstanding_balance`.
pub fn roll_forward(liability: &Liability, as_of: NaiveDate) -> DebtSnapshot {
    let term_months = liability.loan_period_years * 12;
    let grace_months = liability.grace_period_years.min(liability.loan_period_years) * 12;
    let months_elapsed =
        months_between(liability.start_date, as_of).clamp(0, term_months as i32) as u32;

    let monthly_rate = liability.interest_rate / 100.0 / 12.0;
    let regular_payment = if liability.monthly_payment > 0.0 {
        liability.monthly_payment
    } else {
        amortize(
            liability.total_amount,
            liability.interest_rate,
            liability.loan_period_years,
            liability.grace_period_years,
        )
        .regular_payment
    };

    let grace_payment = |balance: f64| {
        if liability.grace_period_payment > 0.0 {
            liability.grace_period_payment
        } else {
            balance * monthly_rate
        }
    };

    let mut balance = liability.total_amount.max(0.0);
    for month in 0..months_elapsed {
        let interest = balance * monthly_rate;
        let payment = if month < grace_months {
            grace_payment(balance)
        } else {
            regular_payment
        };
        let principal_paid = (payment - interest).max(0.0);
        balance = (balance - principal_paid).max(0.0);
    }

    let in_grace_period = months_elapsed < grace_months;
    let current_payment = if balance <= 0.0 || months_elapsed >= term_months {
        0.0
    } else if in_grace_period {
        grace_payment(balance)
    } else {
        regular_payment
    };

    debug!(
        "Rolled {} forward {} months to {}: balance {:.0}",
        liability.id, months_elapsed, as_of, balance
    );

    DebtSnapshot {
        liability_id: liability.id.clone(),
        months_elapsed,
        outstanding_balance: balance,
        in_grace_period,
        current_payment,
        remaining_months: term_months - months_elapsed,
    }
}

pub fn roll_forward_all(liabilities: &[Liability], as_of: NaiveDate) -> Vec<DebtSnapshot> {
    liabilities
        .iter()
        .map(|liability| roll_forward(liability, as_of))
        .collect()
}

/// Roll every liability forward and store the new outstanding balances
pub fn refresh_balances(liabilities: &mut [Liability], as_of: NaiveDate) -> Vec<DebtSnapshot> {
    liabilities
        .iter_mut()
        .map(|liability| {
            let snapshot = roll_forward(liability, as_of);
            liability.outstanding_balance = snapshot.outstanding_balance;
            snapshot
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::DebtType;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(total: f64, rate: f64, years: u32, grace: u32, start: NaiveDate) -> Liability {
        let payments = amortize(total, rate, years, grace);
        Liability {
            id: "loan".to_string(),
            name: String::new(),
            debt_type: DebtType::Personal,
            total_amount: total,
            outstanding_balance: total,
            interest_rate: rate,
            loan_period_years: years,
            grace_period_years: grace,
            start_date: start,
            monthly_payment: payments.regular_payment,
            grace_period_payment: payments.grace_period_payment,
        }
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2020, 1, 15), date(2020, 1, 31)), 0);
        assert_eq!(months_between(date(2020, 1, 15), date(2020, 2, 14)), 0);
        assert_eq!(months_between(date(2020, 1, 15), date(2020, 2, 15)), 1);
        assert_eq!(months_between(date(2020, 11, 30), date(2022, 1, 1)), 13);
        assert_eq!(months_between(date(2021, 5, 1), date(2020, 5, 1)), -12);
    }

    #[test]
    fn test_fully_elapsed_loan_is_repaid() {
        let liability = loan(1_000_000.0, 2.0, 20, 0, date(2000, 1, 1));
        let snapshot = roll_forward(&liability, date(2030, 6, 1));

        assert_eq!(snapshot.months_elapsed, 240);
        assert_eq!(snapshot.remaining_months, 0);
        assert_abs_diff_eq!(snapshot.outstanding_balance, 0.0, epsilon = 1e-4);
        assert_eq!(snapshot.current_payment, 0.0);
    }

    #[test]
    fn test_grace_months_do_not_reduce_principal() {
        let liability = loan(2_400_000.0, 2.0, 20, 2, date(2024, 1, 10));
        let snapshot = roll_forward(&liability, date(2025, 7, 10));

        assert_eq!(snapshot.months_elapsed, 18);
        assert!(snapshot.in_grace_period);
        assert_abs_diff_eq!(snapshot.outstanding_balance, 2_400_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(snapshot.current_payment, 4_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_balance_never_increases() {
        let liability = loan(600_000.0, 3.5, 5, 0, date(2023, 2, 15));
        let mut previous = liability.total_amount;
        for months in 0..=60 {
            let as_of = liability.start_date + chrono::Months::new(months);
            let snapshot = roll_forward(&liability, as_of);
            assert!(snapshot.outstanding_balance <= previous + 1e-9);
            previous = snapshot.outstanding_balance;
        }
    }

    #[test]
    fn test_zero_stored_payment_uses_amortization() {
        let mut liability = loan(600_000.0, 3.5, 5, 0, date(2023, 1, 1));
        let expected = roll_forward(&liability, date(2024, 1, 1));
        liability.monthly_payment = 0.0;
        let fallback = roll_forward(&liability, date(2024, 1, 1));

        assert_abs_diff_eq!(
            fallback.outstanding_balance,
            expected.outstanding_balance,
            epsilon = 1e-9
        );
        assert!(fallback.current_payment > 0.0);
    }

    #[test]
    fn test_payment_below_interest_keeps_balance() {
        let mut liability = loan(1_000_000.0, 6.0, 10, 0, date(2020, 1, 1));
        liability.monthly_payment = 1_000.0;
        let snapshot = roll_forward(&liability, date(2021, 1, 1));
        assert_eq!(snapshot.outstanding_balance, 1_000_000.0);
    }

    #[test]
    fn test_before_start_date() {
        let liability = loan(500_000.0, 2.0, 10, 0, date(2026, 1, 1));
        let snapshot = roll_forward(&liability, date(2025, 1, 1));
        assert_eq!(snapshot.months_elapsed, 0);
        assert_eq!(snapshot.outstanding_balance, 500_000.0);
        assert_eq!(snapshot.remaining_months, 120);
    }

    #[test]
    fn test_refresh_balances_and_summary() {
        let mut liabilities = vec![
            loan(1_000_000.0, 2.0, 20, 0, date(2020, 1, 1)),
            loan(300_000.0, 0.0, 3, 0, date(2024, 1, 1)),
        ];
        let snapshots = refresh_balances(&mut liabilities, date(2025, 1, 1));

        // 12 of 36 straight-line payments made
        assert_abs_diff_eq!(liabilities[1].outstanding_balance, 200_000.0, epsilon = 1e-6);
        assert!(liabilities[0].outstanding_balance < 1_000_000.0);

        let summary = DebtSummary::from_snapshots(&snapshots);
        assert_eq!(summary.count, 2);
        assert_abs_diff_eq!(
            summary.total_outstanding,
            liabilities[0].outstanding_balance + 200_000.0,
            epsilon = 1e-6
        );
    }
}
