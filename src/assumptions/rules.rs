//! Statutory constants for the labor pension, labor insurance and result grading

use serde::{Deserialize, Serialize};

/// Defined-contribution individual account (labor pension) rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborPensionRules {
    /// Mandatory employer contribution (% of capped salary)
    pub employer_rate_pct: f64,

    /// Upper bound of the voluntary employee contribution (%)
    pub max_employee_rate_pct: f64,

    /// Monthly salary ceiling used as the contribution base
    pub contribution_cap: f64,

    /// Guaranteed minimum annual return (%); the account never compounds below this
    pub guaranteed_min_return_pct: f64,

    /// Age from which the account can be drawn, regardless of retirement age
    pub claim_age: u32,

    /// Service years needed to draw a monthly annuity instead of a lump sum
    pub min_service_years: f64,

    /// Inflation used to express the balance at claim age in today's money (%)
    pub default_inflation_pct: f64,
}

impl Default for LaborPensionRules {
    fn default() -> Self {
        Self {
            employer_rate_pct: 6.0,
            max_employee_rate_pct: 6.0,
            contribution_cap: 150_000.0,
            guaranteed_min_return_pct: 1.5,
            claim_age: 60,
            min_service_years: 15.0,
            default_inflation_pct: 2.0,
        }
    }
}

/// Defined-benefit old-age annuity (labor insurance) rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborInsuranceRules {
    /// Insured salary ceiling
    pub salary_cap: f64,

    /// Insured years needed for any annuity
    pub min_insured_years: f64,

    /// Formula A: accrual rate for the first `tier_years`
    pub formula_a_base_rate: f64,

    /// Formula A: accrual rate for years beyond `tier_years`
    pub formula_a_extended_rate: f64,

    /// Formula A: years covered by the base accrual rate
    pub tier_years: f64,

    /// Formula A: flat monthly supplement
    pub formula_a_supplement: f64,

    /// Formula B: flat accrual rate per insured year
    pub formula_b_rate: f64,

    /// Bonus per full year claimed after legal age
    pub delay_bonus_per_year: f64,

    /// Delay years that earn a bonus
    pub max_delay_years: u32,

    /// Ceiling of the total delay bonus
    pub max_delay_bonus: f64,
}

impl Default for LaborInsuranceRules {
    fn default() -> Self {
        Self {
            salary_cap: 45_800.0,
            min_insured_years: 15.0,
            formula_a_base_rate: 0.00775,
            formula_a_extended_rate: 0.01,
            tier_years: 15.0,
            formula_a_supplement: 3_000.0,
            formula_b_rate: 0.0155,
            delay_bonus_per_year: 0.04,
            max_delay_years: 5,
            max_delay_bonus: 0.20,
        }
    }
}

/// Replacement-ratio grading thresholds (%)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementThresholds {
    pub fair: f64,
    pub good: f64,
    pub excellent: f64,
}

impl Default for ReplacementThresholds {
    fn default() -> Self {
        Self {
            fair: 50.0,
            good: 70.0,
            excellent: 80.0,
        }
    }
}

/// Return rates (%) swept by the pension sensitivity analysis
pub fn default_sensitivity_rates() -> Vec<f64> {
    vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
}
