//! Error types shared across the crate
//!
//! Two families are kept apart on purpose:
//! - [`ValidationError`] describes a bad input value. Calculators collect these into a list
//!   on their result and fall back to a zeroed output instead of returning `Err`.
//! - [`LoadError`] is a real failure while reading plans, holdings or assumption tables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An input value outside its permitted domain
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("monthly salary must be positive, got {0}")]
    NonPositiveSalary(f64),

    #[error("years to simulate must not be negative, got {0}")]
    NegativeYears(i32),

    #[error("self contribution rate must be within 0-6%, got {0}%")]
    ContributionRateOutOfRange(f64),

    #[error("retirement age {retirement_age} must be greater than current age {current_age}")]
    RetirementBeforeCurrentAge { current_age: u32, retirement_age: u32 },

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: String, value: f64 },

    #[error("holding with quantity or cost basis needs a symbol")]
    MissingSymbol,

    #[error("outstanding balance {outstanding} exceeds total amount {total} for liability '{id}'")]
    BalanceExceedsTotal { id: String, outstanding: f64, total: f64 },
}

impl ValidationError {
    /// Shorthand for a negative monetary field
    pub fn negative(field: &str, value: f64) -> Self {
        ValidationError::NegativeAmount {
            field: field.to_string(),
            value,
        }
    }
}

/// Push a [`ValidationError::NegativeAmount`] when `value` is below zero
pub(crate) fn check_non_negative(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if value < 0.0 {
        errors.push(ValidationError::negative(field, value));
    }
}

/// Failure while loading input records or assumption tables
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid record in {source_name}: {message}")]
    InvalidRecord { source_name: String, message: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;
