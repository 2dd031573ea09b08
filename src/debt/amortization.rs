//! Level-payment loan amortization with an optional interest-only grace period

use serde::{Deserialize, Serialize};

/// Monthly payments of a loan
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanPayments {
    /// Interest-only payment during the grace period; 0 without one
    pub grace_period_payment: f64,

    /// Level payment once principal repayment starts
    pub regular_payment: f64,
}

/// Monthly payments for a loan of `principal` at `annual_rate_pct` over `term_years`,
/// the first `grace_years` of which are interest-only
///
/// A non-positive principal, zero term or negative rate yields zero payments.
pub fn amortize(
    principal: f64,
    annual_rate_pct: f64,
    term_years: u32,
    grace_years: u32,
) -> LoanPayments {
    if principal <= 0.0 || term_years == 0 || annual_rate_pct < 0.0 {
        return LoanPayments::default();
    }

    let monthly_rate = annual_rate_pct / 100.0 / 12.0;

    let grace_period_payment = if grace_years > 0 {
        principal * monthly_rate
    } else {
        0.0
    };

    let repayment_months = (term_years as i64 - grace_years as i64) * 12;
    let regular_payment = if repayment_months <= 0 {
        0.0
    } else {
        level_payment(principal, monthly_rate, repayment_months as i32)
    };

    LoanPayments {
        grace_period_payment,
        regular_payment,
    }
}

/// Annuity payment `P*r*(1+r)^n / ((1+r)^n - 1)`; straight-line when `r` is 0
pub fn level_payment(principal: f64, monthly_rate: f64, months: i32) -> f64 {
    if months <= 0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal / months as f64;
    }
    let growth = (1.0 + monthly_rate).powi(months);
    principal * monthly_rate * growth / (growth - 1.0)
}
