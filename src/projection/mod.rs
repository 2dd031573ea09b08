//! Holistic household projection: accumulation until retirement, decumulation after

mod cashflows;
mod engine;
mod snapshot;
mod state;

pub use cashflows::{Phase, ProjectionResult, ProjectionSummary, ProjectionYear};
pub use engine::{HolisticProjectionEngine, ProjectionConfig};
pub use snapshot::FinancialSnapshot;
pub use state::{ProjectionState, TrackedLiability};
