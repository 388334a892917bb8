//! Work order domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the work order domain
#[derive(Debug, Error)]
pub enum WorkOrderError {
    /// Entry data is malformed (negative duration, negative cost, ...)
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// The work order failed validation
    #[error("Work order validation failed: {0}")]
    Validation(String),

    /// The work order is not in a state that allows the operation
    #[error("Work order {work_order} is {status}, expected {expected}")]
    InvalidStatus {
        work_order: String,
        status: String,
        expected: String,
    },

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl WorkOrderError {
    pub fn invalid_entry(message: impl Into<String>) -> Self {
        WorkOrderError::InvalidEntry(message.into())
    }

    /// Creates a Validation error from the collected validation errors
    pub fn validation_failed(errors: Vec<String>) -> Self {
        WorkOrderError::Validation(errors.join("; "))
    }
}
