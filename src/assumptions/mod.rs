//! Policy assumptions: annuity factors, retirement-age ramp and statutory constants

mod annuity;
mod rules;
pub mod loader;

pub use annuity::{AnnuityTable, RetirementAgeSchedule};
pub use rules::{
    default_sensitivity_rates, LaborInsuranceRules, LaborPensionRules, ReplacementThresholds,
};
pub use loader::{LoadedAssumptions, PolicyRules};

use std::path::Path;

use crate::error::Result;

/// Container for all policy assumptions used by the calculators
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub annuity: AnnuityTable,
    pub retirement_age: RetirementAgeSchedule,
    pub labor_pension: LaborPensionRules,
    pub labor_insurance: LaborInsuranceRules,
    pub replacement: ReplacementThresholds,
    /// Return rates (%) swept by the pension sensitivity analysis
    pub sensitivity_rates: Vec<f64>,
}

impl Assumptions {
    /// Taiwan labor pension / labor insurance rules as of 2024
    pub fn taiwan_2024() -> Self {
        Self {
            annuity: AnnuityTable::taiwan_labor_pension(),
            retirement_age: RetirementAgeSchedule::taiwan_labor_insurance(),
            labor_pension: LaborPensionRules::default(),
            labor_insurance: LaborInsuranceRules::default(),
            replacement: ReplacementThresholds::default(),
            sensitivity_rates: default_sensitivity_rates(),
        }
    }

    /// Load assumptions from the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;
        Ok(Self::from_loaded(loaded))
    }

    pub fn from_loaded(loaded: LoadedAssumptions) -> Self {
        let rules = loaded.rules;
        Self {
            annuity: AnnuityTable::new(loaded.annuity_factors, rules.annuity_publish_date),
            retirement_age: RetirementAgeSchedule::new(
                loaded.retirement_age_steps,
                loaded.ultimate_retirement_age,
            ),
            labor_pension: rules.labor_pension,
            labor_insurance: rules.labor_insurance,
            replacement: rules.replacement,
            sensitivity_rates: rules.sensitivity_rates,
        }
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::taiwan_2024()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_matches_builtin() {
        let loaded = Assumptions::from_csv().expect("Failed to load assumptions");
        let builtin = Assumptions::taiwan_2024();

        for age in [50.0, 57.0, 60.0, 62.5, 65.0, 72.0, 85.0] {
            assert_eq!(loaded.annuity.factor(age), builtin.annuity.factor(age));
        }
        for year in 1950..1970 {
            assert_eq!(
                loaded.retirement_age.legal_age(year),
                builtin.retirement_age.legal_age(year)
            );
        }
        assert_eq!(loaded.sensitivity_rates, builtin.sensitivity_rates);
        assert_eq!(loaded.annuity.publish_date(), Some("2024-01"));
    }
}
