//! Warranty Claims Domain
//!
//! When a work order's cost is (partly) covered by warranty, the covered
//! work is filed as a claim against the product's warranty card. This crate
//! owns the claim request shape, the policy that fixes claim type, priority
//! and severity, and the port through which claims are submitted.

pub mod claim;
pub mod ports;
pub mod error;

pub use claim::{
    WarrantyClaimRequest, ClaimType, ClaimPriority, ClaimSeverity, ClaimEvidence, ClaimPolicy,
};
pub use ports::WarrantyClaimPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockWarrantyClaimPort;
pub use error::ClaimError;
