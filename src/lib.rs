//! Retirement System - Holistic retirement and financial-freedom projections
//!
//! This library provides:
//! - Taiwan labor pension (individual account) and labor insurance (old-age annuity) models
//! - Retirement analysis with replacement-ratio grading and return sensitivity
//! - Portfolio valuation with FX normalization, P&L and allocation
//! - Loan amortization and liability rollforward
//! - Year-by-year household projection from today to age 100
//! - Batch and multi-scenario runs

pub mod assumptions;
pub mod debt;
pub mod error;
pub mod pension;
pub mod plan;
pub mod portfolio;
pub mod projection;
pub mod scenario;
pub mod service;

// Re-export commonly used types
pub use assumptions::{AnnuityTable, Assumptions, RetirementAgeSchedule};
pub use error::{LoadError, ValidationError};
pub use pension::{RetirementAnalysis, RetirementAnalyzer};
pub use plan::{Holding, Liability, PlanParameters, Quote};
pub use portfolio::{AssetMetricsCalculator, FxTable};
pub use projection::{
    FinancialSnapshot, HolisticProjectionEngine, ProjectionConfig, ProjectionResult,
    ProjectionYear,
};
pub use scenario::ScenarioRunner;
pub use service::{FinancialDataSource, InMemoryDataSource, RetirementService};
