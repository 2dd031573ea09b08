//! Loan amortization and liability rollforward

mod amortization;
mod rollforward;

pub use amortization::{amortize, level_payment, LoanPayments};
pub use rollforward::{
    months_between, refresh_balances, roll_forward, roll_forward_all, DebtSnapshot, DebtSummary,
};
