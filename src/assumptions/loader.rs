//! CSV/JSON assumption loader
//!
//! Loads policy tables from `data/assumptions/`:
//! - `annuity_factors.csv` (age, factor)
//! - `legal_retirement_age.csv` (birth_year, legal_age); the last row applies to all later cohorts
//! - `policy_rules.json` (optional; statutory constants, defaults when absent)

use std::fs::File;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use super::rules::{
    default_sensitivity_rates, LaborInsuranceRules, LaborPensionRules, ReplacementThresholds,
};
use crate::error::{LoadError, Result};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

#[derive(Debug, Deserialize)]
struct AnnuityRow {
    age: f64,
    factor: f64,
}

#[derive(Debug, Deserialize)]
struct RetirementAgeRow {
    birth_year: i32,
    legal_age: u32,
}

/// Statutory constants as stored in `policy_rules.json`
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyRules {
    #[serde(default)]
    pub labor_pension: LaborPensionRules,
    #[serde(default)]
    pub labor_insurance: LaborInsuranceRules,
    #[serde(default)]
    pub replacement: ReplacementThresholds,
    #[serde(default = "default_sensitivity_rates")]
    pub sensitivity_rates: Vec<f64>,
    #[serde(default)]
    pub annuity_publish_date: Option<String>,
}

impl Default for PolicyRules {
    fn default() -> Self {
        Self {
            labor_pension: LaborPensionRules::default(),
            labor_insurance: LaborInsuranceRules::default(),
            replacement: ReplacementThresholds::default(),
            sensitivity_rates: default_sensitivity_rates(),
            annuity_publish_date: None,
        }
    }
}

/// Load annuity factors as (age, factor) pairs
pub fn load_annuity_factors(path: &Path) -> Result<Vec<(f64, f64)>> {
    let file = File::open(path.join("annuity_factors.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut points = Vec::new();
    for result in reader.deserialize() {
        let row: AnnuityRow = result?;
        if row.factor <= 0.0 {
            return Err(LoadError::InvalidRecord {
                source_name: "annuity_factors.csv".to_string(),
                message: format!("non-positive factor {} at age {}", row.factor, row.age),
            });
        }
        points.push((row.age, row.factor));
    }

    if points.is_empty() {
        return Err(LoadError::InvalidRecord {
            source_name: "annuity_factors.csv".to_string(),
            message: "table is empty".to_string(),
        });
    }

    Ok(points)
}

/// Load the legal retirement age ramp
///
/// Returns the ramp steps and the ultimate age taken from the last row.
pub fn load_retirement_age_ramp(path: &Path) -> Result<(Vec<(i32, u32)>, u32)> {
    let file = File::open(path.join("legal_retirement_age.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RetirementAgeRow = result?;
        rows.push((row.birth_year, row.legal_age));
    }
    rows.sort_by_key(|(year, _)| *year);

    match rows.pop() {
        Some((_, ultimate_age)) => Ok((rows, ultimate_age)),
        None => Err(LoadError::InvalidRecord {
            source_name: "legal_retirement_age.csv".to_string(),
            message: "table is empty".to_string(),
        }),
    }
}

/// Load statutory constants, falling back to defaults when the file is absent
pub fn load_policy_rules(path: &Path) -> Result<PolicyRules> {
    let rules_path = path.join("policy_rules.json");
    if !rules_path.exists() {
        debug!("{} not found, using default policy rules", rules_path.display());
        return Ok(PolicyRules::default());
    }

    let file = File::open(&rules_path)?;
    let rules: PolicyRules = serde_json::from_reader(file)?;
    Ok(rules)
}

/// All tables loaded from one directory
pub struct LoadedAssumptions {
    pub annuity_factors: Vec<(f64, f64)>,
    pub retirement_age_steps: Vec<(i32, u32)>,
    pub ultimate_retirement_age: u32,
    pub rules: PolicyRules,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let annuity_factors = load_annuity_factors(path)?;
        let (retirement_age_steps, ultimate_retirement_age) = load_retirement_age_ramp(path)?;
        let rules = load_policy_rules(path)?;

        info!(
            "Loaded assumptions from {} ({} annuity factors, {} retirement age steps)",
            path.display(),
            annuity_factors.len(),
            retirement_age_steps.len()
        );

        Ok(Self {
            annuity_factors,
            retirement_age_steps,
            ultimate_retirement_age,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let loaded = result.unwrap();
        assert!(loaded.annuity_factors.len() >= 5);
        assert_eq!(loaded.ultimate_retirement_age, 65);
        assert_eq!(loaded.retirement_age_steps.first(), Some(&(1956, 60)));
        assert_eq!(loaded.retirement_age_steps.last(), Some(&(1960, 64)));
        assert_eq!(loaded.rules.labor_pension.claim_age, 60);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let result = LoadedAssumptions::load_from(Path::new("data/does-not-exist"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_partial_rules_use_defaults() {
        let rules: PolicyRules =
            serde_json::from_str(r#"{ "sensitivity_rates": [2.0, 4.0] }"#).unwrap();
        assert_eq!(rules.sensitivity_rates, vec![2.0, 4.0]);
        assert_eq!(rules.labor_insurance.salary_cap, 45_800.0);
    }
}
