//! Labor insurance old-age annuity (defined benefit)

use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;

/// Which statutory formula produced the base benefit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitFormula {
    /// Tiered accrual plus a flat supplement
    A,
    /// Flat accrual on all insured years
    B,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborInsuranceResult {
    pub eligible: bool,
    pub monthly_pension: f64,

    /// Benefit before the delayed-claim bonus
    pub base_monthly_pension: f64,
    pub formula_a: f64,
    pub formula_b: f64,

    /// `None` when ineligible
    pub formula_used: Option<BenefitFormula>,

    /// The requested claim age was below the legal age, so the benefit starts at the legal age
    pub is_projected_at_legal_age: bool,

    /// Years claimed after the legal age (bonus stops accruing after the statutory maximum)
    pub delay_years: u32,
    pub delay_bonus_rate: f64,
    pub legal_age: u32,
    pub effective_claim_age: u32,
    pub remark: Option<String>,
}

impl LaborInsuranceResult {
    /// Monthly amount actually payable
    pub fn payable_monthly(&self) -> f64 {
        if self.eligible {
            self.monthly_pension
        } else {
            0.0
        }
    }
}

pub struct LaborInsurance<'a> {
    assumptions: &'a Assumptions,
}

impl<'a> LaborInsurance<'a> {
    pub fn new(assumptions: &'a Assumptions) -> Self {
        Self { assumptions }
    }

    /// Legal claim age for a birth cohort
    pub fn legal_age(&self, birth_year: i32) -> u32 {
        self.assumptions.retirement_age.legal_age(birth_year)
    }

    /// Compute the old-age annuity for an insured salary and service record
    pub fn simulate(
        &self,
        avg_insured_salary: f64,
        insured_years: f64,
        claim_age: u32,
        birth_year: i32,
    ) -> LaborInsuranceResult {
        let rules = &self.assumptions.labor_insurance;
        let legal_age = self.legal_age(birth_year);
        let effective_claim_age = claim_age.max(legal_age);

        if insured_years < rules.min_insured_years {
            return LaborInsuranceResult {
                eligible: false,
                legal_age,
                effective_claim_age,
                remark: Some(format!(
                    "{:.1} insured years, {} required for the old-age annuity",
                    insured_years, rules.min_insured_years
                )),
                ..Default::default()
            };
        }

        let salary = avg_insured_salary.min(rules.salary_cap);

        let base_years = insured_years.min(rules.tier_years);
        let extended_years = (insured_years - rules.tier_years).max(0.0);
        let formula_a = salary
            * (base_years * rules.formula_a_base_rate
                + extended_years * rules.formula_a_extended_rate)
            + rules.formula_a_supplement;
        let formula_b = salary * insured_years * rules.formula_b_rate;

        let (base_monthly_pension, formula_used) = if formula_a >= formula_b {
            (formula_a, BenefitFormula::A)
        } else {
            (formula_b, BenefitFormula::B)
        };

        let delay_years = effective_claim_age - legal_age;
        let bonus_years = delay_years.min(rules.max_delay_years);
        let delay_bonus_rate =
            (bonus_years as f64 * rules.delay_bonus_per_year).min(rules.max_delay_bonus);

        LaborInsuranceResult {
            eligible: true,
            monthly_pension: base_monthly_pension * (1.0 + delay_bonus_rate),
            base_monthly_pension,
            formula_a,
            formula_b,
            formula_used: Some(formula_used),
            is_projected_at_legal_age: claim_age < legal_age,
            delay_years,
            delay_bonus_rate,
            legal_age,
            effective_claim_age,
            remark: None,
        }
    }
}
