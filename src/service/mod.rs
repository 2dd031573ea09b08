//! Service layer over an external data source

mod memory_source;
mod retirement_service;
mod service_traits;

pub use memory_source::InMemoryDataSource;
pub use retirement_service::{DebtRefresh, RetirementService};
pub use service_traits::FinancialDataSource;
