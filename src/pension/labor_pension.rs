//! Labor pension individual account (defined contribution)
//!
//! The account is projected year by year until retirement:
//!
//! ```text
//! salary_y      = salary * (1 + g)^(y - 1)
//! contribution  = min(salary_y, cap) * (employer% + employee%) * 12
//! balance       = balance * (1 + r) + contribution
//! ```
//!
//! Contributions land at year end and earn no return in the year they are paid.
//! If retirement comes before the claim age, the balance keeps compounding without
//! contributions until the account can be drawn.

use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::{check_non_negative, ValidationError};

/// Inputs of a single account simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborPensionInput {
    pub current_principal: f64,
    pub monthly_salary: f64,
    pub employer_rate_pct: f64,
    pub employee_rate_pct: f64,

    /// Contribution years left until retirement
    pub years_to_simulate: i32,
    pub annual_return_pct: f64,
    pub retirement_age: u32,

    /// Service years already accrued
    pub contributed_years: f64,
    pub salary_growth_pct: f64,
}

/// One projected contribution year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub year: u32,
    pub monthly_salary: f64,
    pub capped_salary: f64,
    pub annual_contribution: f64,
    pub opening_balance: f64,
    pub investment_return: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborPensionResult {
    /// Balance on the retirement date
    pub balance_at_retirement: f64,

    /// Balance at the claim age (equal to `balance_at_retirement` when retiring at 60 or later)
    pub final_balance: f64,

    /// Zero unless `can_pay_monthly`
    pub monthly_pension: f64,
    pub can_pay_monthly: bool,
    pub claim_age: u32,
    pub total_service_years: f64,

    /// Return actually credited after the guaranteed floor
    pub effective_return_pct: f64,
    pub contribution_records: Vec<ContributionRecord>,

    /// `final_balance` in today's money
    pub real_value: f64,
    pub validation_errors: Vec<ValidationError>,
}

impl LaborPensionResult {
    fn rejected(validation_errors: Vec<ValidationError>) -> Self {
        Self {
            validation_errors,
            ..Default::default()
        }
    }

    /// Monthly amount actually payable as an annuity
    pub fn payable_monthly(&self) -> f64 {
        if self.can_pay_monthly {
            self.monthly_pension
        } else {
            0.0
        }
    }
}

/// Simulates the individual account against a set of assumptions
pub struct LaborPensionAccount<'a> {
    assumptions: &'a Assumptions,
}

impl<'a> LaborPensionAccount<'a> {
    pub fn new(assumptions: &'a Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn validate(&self, input: &LaborPensionInput) -> Vec<ValidationError> {
        let rules = &self.assumptions.labor_pension;
        let mut errors = Vec::new();

        if input.monthly_salary <= 0.0 {
            errors.push(ValidationError::NonPositiveSalary(input.monthly_salary));
        }
        if input.years_to_simulate < 0 {
            errors.push(ValidationError::NegativeYears(input.years_to_simulate));
        }
        if !(0.0..=rules.max_employee_rate_pct).contains(&input.employee_rate_pct) {
            errors.push(ValidationError::ContributionRateOutOfRange(
                input.employee_rate_pct,
            ));
        }
        check_non_negative(&mut errors, "current_principal", input.current_principal);

        errors
    }

    /// Project the account to retirement and convert it into a monthly annuity
    ///
    /// Invalid input yields a zeroed result carrying the validation errors.
    pub fn simulate(&self, input: &LaborPensionInput) -> LaborPensionResult {
        let errors = self.validate(input);
        if !errors.is_empty() {
            return LaborPensionResult::rejected(errors);
        }

        let rules = &self.assumptions.labor_pension;
        let effective_return_pct = input.annual_return_pct.max(rules.guaranteed_min_return_pct);
        let r = effective_return_pct / 100.0;
        let g = input.salary_growth_pct / 100.0;
        let contribution_rate = (input.employer_rate_pct + input.employee_rate_pct) / 100.0;

        let mut balance = input.current_principal;
        let mut contribution_records = Vec::with_capacity(input.years_to_simulate as usize);

        for year in 1..=input.years_to_simulate {
            let monthly_salary = input.monthly_salary * (1.0 + g).powi(year - 1);
            let capped_salary = monthly_salary.min(rules.contribution_cap);
            let annual_contribution = capped_salary * contribution_rate * 12.0;

            let opening_balance = balance;
            let investment_return = opening_balance * r;
            balance = opening_balance + investment_return + annual_contribution;

            contribution_records.push(ContributionRecord {
                year: year as u32,
                monthly_salary,
                capped_salary,
                annual_contribution,
                opening_balance,
                investment_return,
                closing_balance: balance,
            });
        }

        let balance_at_retirement = balance;

        // Early retirees wait for the claim age; the account keeps earning meanwhile
        let claim_age = input.retirement_age.max(rules.claim_age);
        let gap_years = (claim_age - input.retirement_age) as i32;
        let final_balance = balance_at_retirement * (1.0 + r).powi(gap_years);

        let total_service_years = input.contributed_years + input.years_to_simulate as f64;
        let can_pay_monthly = total_service_years >= rules.min_service_years;
        let monthly_pension = if can_pay_monthly {
            self.assumptions
                .annuity
                .monthly_annuity(final_balance, claim_age as f64)
        } else {
            0.0
        };

        let inflation = rules.default_inflation_pct / 100.0;
        let real_value =
            final_balance / (1.0 + inflation).powi(input.years_to_simulate + gap_years);

        LaborPensionResult {
            balance_at_retirement,
            final_balance,
            monthly_pension,
            can_pay_monthly,
            claim_age,
            total_service_years,
            effective_return_pct,
            contribution_records,
            real_value,
            validation_errors: Vec::new(),
        }
    }
}
