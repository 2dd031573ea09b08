//! Taiwan retirement pensions
//!
//! - [`LaborPensionAccount`]: the defined-contribution individual account
//! - [`LaborInsurance`]: the defined-benefit old-age annuity
//! - [`RetirementAnalyzer`]: runs both for a plan, grades the replacement ratio and
//!   sweeps the account return for a sensitivity table

mod analysis;
mod labor_insurance;
mod labor_pension;

pub use analysis::{
    IncomeStage, IncomeStageKind, PensionSummary, ReplacementLevel, RetirementAnalysis,
    RetirementAnalyzer, SensitivityPoint,
};
pub use labor_insurance::{BenefitFormula, LaborInsurance, LaborInsuranceResult};
pub use labor_pension::{
    ContributionRecord, LaborPensionAccount, LaborPensionInput, LaborPensionResult,
};
