//! Combined retirement analysis: labor pension + labor insurance + grading

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::labor_insurance::{LaborInsurance, LaborInsuranceResult};
use super::labor_pension::{LaborPensionAccount, LaborPensionInput, LaborPensionResult};
use crate::assumptions::Assumptions;
use crate::error::ValidationError;
use crate::plan::PlanParameters;

/// Grade of the replacement ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementLevel {
    Insufficient,
    Fair,
    Good,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionSummary {
    pub total_monthly_pension: f64,

    /// Total pension over current monthly salary (%)
    pub replacement_ratio: f64,
    pub level: ReplacementLevel,
}

/// Labor pension outcome at one return assumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub rate_pct: f64,
    pub final_amount: f64,
    pub monthly_pension: f64,
    pub real_value: f64,
}

/// Which pensions are paying during a stage of retirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStageKind {
    NoPension,
    LaborPensionOnly,
    FullPension,
}

/// A contiguous age range with a constant monthly pension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStage {
    pub kind: IncomeStageKind,
    pub start_age: u32,

    /// Exclusive; `None` for the open-ended last stage
    pub end_age: Option<u32>,
    pub monthly_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementAnalysis {
    pub retirement_age: u32,
    pub labor_pension: LaborPensionResult,
    pub labor_insurance: LaborInsuranceResult,
    pub summary: PensionSummary,
    pub sensitivity: Vec<SensitivityPoint>,
    pub validation_errors: Vec<ValidationError>,
}

impl RetirementAnalysis {
    /// Age from which the labor pension pays
    pub fn labor_pension_start_age(&self) -> u32 {
        self.labor_pension.claim_age.max(self.retirement_age)
    }

    /// Age from which the labor insurance annuity pays
    pub fn labor_insurance_start_age(&self) -> u32 {
        self.labor_insurance.effective_claim_age.max(self.retirement_age)
    }

    /// Retirement cash-flow stages from the retirement age onward
    ///
    /// Stages are ordered and never overlap; a stage with an empty age range is omitted.
    pub fn income_stages(&self) -> Vec<IncomeStage> {
        let dc = self.labor_pension.payable_monthly();
        let db = self.labor_insurance.payable_monthly();

        let dc_start = self.labor_pension_start_age();
        let db_start = self.labor_insurance_start_age().max(dc_start);

        let mut stages = Vec::with_capacity(3);
        if self.retirement_age < dc_start {
            stages.push(IncomeStage {
                kind: IncomeStageKind::NoPension,
                start_age: self.retirement_age,
                end_age: Some(dc_start),
                monthly_income: 0.0,
            });
        }
        if dc_start < db_start {
            stages.push(IncomeStage {
                kind: IncomeStageKind::LaborPensionOnly,
                start_age: dc_start,
                end_age: Some(db_start),
                monthly_income: dc,
            });
        }
        stages.push(IncomeStage {
            kind: IncomeStageKind::FullPension,
            start_age: db_start,
            end_age: None,
            monthly_income: dc + db,
        });

        stages
    }
}

/// Runs both pension calculators for a plan and grades the result
pub struct RetirementAnalyzer<'a> {
    assumptions: &'a Assumptions,
}

impl<'a> RetirementAnalyzer<'a> {
    pub fn new(assumptions: &'a Assumptions) -> Self {
        Self { assumptions }
    }

    /// Labor pension input derived from a plan
    pub fn labor_pension_input(&self, plan: &PlanParameters) -> LaborPensionInput {
        LaborPensionInput {
            current_principal: plan.current_pension_principal,
            monthly_salary: plan.avg_monthly_salary,
            employer_rate_pct: self.assumptions.labor_pension.employer_rate_pct,
            employee_rate_pct: plan.self_contribution_rate,
            years_to_simulate: plan.years_to_retirement(),
            annual_return_pct: plan.expected_return_rate,
            retirement_age: plan.retirement_age,
            contributed_years: plan.current_total_seniority,
            salary_growth_pct: plan.salary_growth_rate,
        }
    }

    pub fn analyze(&self, plan: &PlanParameters) -> RetirementAnalysis {
        let mut validation_errors = plan.validate();

        let account = LaborPensionAccount::new(self.assumptions);
        let input = self.labor_pension_input(plan);
        let labor_pension = account.simulate(&input);
        for error in &labor_pension.validation_errors {
            if !validation_errors.contains(error) {
                validation_errors.push(error.clone());
            }
        }

        let insured_years =
            plan.current_total_seniority + plan.years_to_retirement().max(0) as f64;
        let labor_insurance = LaborInsurance::new(self.assumptions).simulate(
            plan.avg_monthly_salary,
            insured_years,
            plan.retirement_age,
            plan.birth_year,
        );

        let summary = self.summarize(plan, &labor_pension, &labor_insurance);
        let sensitivity = self.sensitivity(&account, &input);

        if !validation_errors.is_empty() {
            warn!(
                "Plan has {} validation error(s); affected pensions are zeroed",
                validation_errors.len()
            );
        }
        debug!(
            "Retirement analysis: total monthly pension {:.0}, replacement {:.1}%",
            summary.total_monthly_pension, summary.replacement_ratio
        );

        RetirementAnalysis {
            retirement_age: plan.retirement_age,
            labor_pension,
            labor_insurance,
            summary,
            sensitivity,
            validation_errors,
        }
    }

    fn summarize(
        &self,
        plan: &PlanParameters,
        labor_pension: &LaborPensionResult,
        labor_insurance: &LaborInsuranceResult,
    ) -> PensionSummary {
        let total_monthly_pension =
            labor_pension.payable_monthly() + labor_insurance.payable_monthly();

        let replacement_ratio = if plan.avg_monthly_salary > 0.0 {
            total_monthly_pension / plan.avg_monthly_salary * 100.0
        } else {
            0.0
        };

        PensionSummary {
            total_monthly_pension,
            replacement_ratio,
            level: self.grade(replacement_ratio),
        }
    }

    /// Bucket a replacement ratio (%) into a level
    pub fn grade(&self, replacement_ratio: f64) -> ReplacementLevel {
        let thresholds = &self.assumptions.replacement;
        if replacement_ratio < thresholds.fair {
            ReplacementLevel::Insufficient
        } else if replacement_ratio < thresholds.good {
            ReplacementLevel::Fair
        } else if replacement_ratio < thresholds.excellent {
            ReplacementLevel::Good
        } else {
            ReplacementLevel::Excellent
        }
    }

    fn sensitivity(
        &self,
        account: &LaborPensionAccount,
        input: &LaborPensionInput,
    ) -> Vec<SensitivityPoint> {
        self.assumptions
            .sensitivity_rates
            .iter()
            .map(|&rate_pct| {
                let result = account.simulate(&LaborPensionInput {
                    annual_return_pct: rate_pct,
                    ..input.clone()
                });
                SensitivityPoint {
                    rate_pct,
                    final_amount: result.final_balance,
                    monthly_pension: result.payable_monthly(),
                    real_value: result.real_value,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_plan_analysis() {
        let assumptions = Assumptions::default();
        let analysis = RetirementAnalyzer::new(&assumptions).analyze(&PlanParameters::default());

        assert!(analysis.validation_errors.is_empty());
        assert_relative_eq!(
            analysis.labor_pension.monthly_pension,
            38_498.707,
            epsilon = 0.01
        );
        // 10 years of seniority plus 30 to go
        assert_relative_eq!(analysis.labor_insurance.monthly_pension, 28_396.0, epsilon = 1e-6);
        assert_relative_eq!(
            analysis.summary.total_monthly_pension,
            38_498.707 + 28_396.0,
            epsilon = 0.01
        );
        assert_relative_eq!(analysis.summary.replacement_ratio, 133.79, epsilon = 0.01);
        assert_eq!(analysis.summary.level, ReplacementLevel::Excellent);
    }

    #[test]
    fn test_sensitivity_is_ordered_and_non_decreasing() {
        let assumptions = Assumptions::default();
        let analysis = RetirementAnalyzer::new(&assumptions).analyze(&PlanParameters::default());

        let rates: Vec<f64> = analysis.sensitivity.iter().map(|p| p.rate_pct).collect();
        assert_eq!(rates, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        for pair in analysis.sensitivity.windows(2) {
            assert!(pair[1].final_amount >= pair[0].final_amount);
        }
        // 1% is below the guaranteed floor
        let account = LaborPensionAccount::new(&assumptions);
        let at_floor = account.simulate(&LaborPensionInput {
            annual_return_pct: 1.5,
            ..RetirementAnalyzer::new(&assumptions).labor_pension_input(&PlanParameters::default())
        });
        assert_relative_eq!(analysis.sensitivity[0].final_amount, at_floor.final_balance);
        assert_relative_eq!(
            analysis.sensitivity[4].final_amount,
            analysis.labor_pension.final_balance
        );
    }

    #[test]
    fn test_grading_boundaries() {
        let assumptions = Assumptions::default();
        let analyzer = RetirementAnalyzer::new(&assumptions);

        assert_eq!(analyzer.grade(0.0), ReplacementLevel::Insufficient);
        assert_eq!(analyzer.grade(49.99), ReplacementLevel::Insufficient);
        assert_eq!(analyzer.grade(50.0), ReplacementLevel::Fair);
        assert_eq!(analyzer.grade(70.0), ReplacementLevel::Good);
        assert_eq!(analyzer.grade(79.99), ReplacementLevel::Good);
        assert_eq!(analyzer.grade(80.0), ReplacementLevel::Excellent);
    }

    #[test]
    fn test_zero_salary_is_reported_not_raised() {
        let assumptions = Assumptions::default();
        let plan = PlanParameters {
            avg_monthly_salary: 0.0,
            ..Default::default()
        };
        let analysis = RetirementAnalyzer::new(&assumptions).analyze(&plan);

        assert!(analysis
            .validation_errors
            .contains(&ValidationError::NonPositiveSalary(0.0)));
        assert_eq!(analysis.labor_pension.monthly_pension, 0.0);
        assert_eq!(analysis.summary.replacement_ratio, 0.0);
        assert_eq!(analysis.summary.level, ReplacementLevel::Insufficient);
    }

    #[test]
    fn test_retired_plan_has_no_future_years() {
        let assumptions = Assumptions::default();
        let plan = PlanParameters {
            current_age: 66,
            retirement_age: 65,
            ..Default::default()
        };
        let analysis = RetirementAnalyzer::new(&assumptions).analyze(&plan);

        assert!(analysis
            .validation_errors
            .contains(&ValidationError::NegativeYears(-1)));
        // Insured years do not go below the seniority already accrued
        assert!(!analysis.labor_insurance.eligible);
        assert_eq!(analysis.labor_insurance.legal_age, 65);
    }

    #[test]
    fn test_income_stages_for_early_retirement() {
        let assumptions = Assumptions::default();
        let plan = PlanParameters {
            current_age: 40,
            retirement_age: 55,
            current_total_seniority: 15.0,
            ..Default::default()
        };
        let analysis = RetirementAnalyzer::new(&assumptions).analyze(&plan);
        let stages = analysis.income_stages();

        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0].kind, IncomeStageKind::NoPension);
        assert_eq!((stages[0].start_age, stages[0].end_age), (55, Some(60)));
        assert_eq!(stages[1].kind, IncomeStageKind::LaborPensionOnly);
        assert_eq!((stages[1].start_age, stages[1].end_age), (60, Some(65)));
        assert_relative_eq!(stages[1].monthly_income, analysis.labor_pension.monthly_pension);
        assert_eq!(stages[2].kind, IncomeStageKind::FullPension);
        assert_eq!((stages[2].start_age, stages[2].end_age), (65, None));

        for pair in stages.windows(2) {
            assert_eq!(pair[0].end_age, Some(pair[1].start_age));
        }
    }

    #[test]
    fn test_income_stages_between_claim_and_legal_age() {
        let assumptions = Assumptions::default();
        let plan = PlanParameters {
            retirement_age: 62,
            ..Default::default()
        };
        let stages = RetirementAnalyzer::new(&assumptions)
            .analyze(&plan)
            .income_stages();

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].kind, IncomeStageKind::LaborPensionOnly);
        assert_eq!(stages[0].start_age, 62);
        assert_eq!(stages[1].start_age, 65);
    }

    #[test]
    fn test_income_stages_at_legal_age() {
        let assumptions = Assumptions::default();
        let stages = RetirementAnalyzer::new(&assumptions)
            .analyze(&PlanParameters::default())
            .income_stages();

        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].kind, IncomeStageKind::FullPension);
        assert_eq!(stages[0].start_age, 65);
    }
}
