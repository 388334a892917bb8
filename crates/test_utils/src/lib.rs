//! Test Utilities Crate
//!
//! Shared test infrastructure for the billing engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder for completed work orders
//! - `assertions`: Custom assertion helpers for money and cost splits
//! - `generators`: Property-based test data generators
//!
//! Only `core_kernel` and `domain_workorder` types appear here, so every
//! crate above them can use this one as a dev-dependency.

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
