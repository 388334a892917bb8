//! Claims domain errors

use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// A claim was requested for a work order with no warranty card
    #[error("Work order {0} has no warranty card; a warranty claim cannot be filed")]
    MissingWarrantyCard(String),

    #[error("Claim could not be built: {0}")]
    InvalidClaim(String),
}
