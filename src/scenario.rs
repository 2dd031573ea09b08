//! Scenario runner for batch projections
//!
//! Loads assumptions once, then runs many households or many return
//! assumptions without re-reading the CSV tables.

use rayon::prelude::*;

use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::projection::{
    FinancialSnapshot, HolisticProjectionEngine, ProjectionConfig, ProjectionResult,
};

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let config = ProjectionConfig::new(as_of);
///
/// for result in runner.run_return_scenarios(&snapshot, &[4.0, 6.0, 8.0], &config) {
///     println!("{:.0}", result.summary.assets_at_retirement_real);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with the built-in assumptions
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::taiwan_2024(),
        }
    }

    /// Create runner by loading assumptions from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner from specific assumptions directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    pub fn run(&self, snapshot: &FinancialSnapshot, config: &ProjectionConfig) -> ProjectionResult {
        let engine = HolisticProjectionEngine::new(self.base_assumptions.clone(), config.clone());
        engine.project(snapshot)
    }

    /// Project many households in parallel; results keep the input order
    pub fn run_batch(
        &self,
        snapshots: &[FinancialSnapshot],
        config: &ProjectionConfig,
    ) -> Vec<ProjectionResult> {
        let engine = HolisticProjectionEngine::new(self.base_assumptions.clone(), config.clone());
        snapshots.par_iter().map(|s| engine.project(s)).collect()
    }

    /// Project one household under several asset return assumptions (%)
    pub fn run_return_scenarios(
        &self,
        snapshot: &FinancialSnapshot,
        asset_returns_pct: &[f64],
        config: &ProjectionConfig,
    ) -> Vec<ProjectionResult> {
        let engine = HolisticProjectionEngine::new(self.base_assumptions.clone(), config.clone());
        asset_returns_pct
            .par_iter()
            .map(|&rate| {
                let mut scenario = snapshot.clone();
                scenario.plan.asset_return_rate = rate;
                engine.project(&scenario)
            })
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Mutable access for what-if changes to the policy rules
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
