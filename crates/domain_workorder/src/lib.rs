//! Work Order Domain
//!
//! A work order records what a technician did to resolve a service request:
//! hours of labor, parts consumed and flat-priced ancillary services. Once
//! the work is logged complete the order becomes the read-only input to the
//! billing assessment.
//!
//! # Cost categories
//!
//! Every entry belongs to one of three categories that are aggregated and
//! split independently:
//!
//! - **Labor**: duration × hourly rate
//! - **Parts**: quantity × unit cost
//! - **Services**: flat cost
//!
//! Each entry also carries its own warranty-eligibility flag, independent of
//! the category-level verdict returned by warranty verification.

pub mod entry;
pub mod work_order;
pub mod coverage;
pub mod validation;
pub mod error;

pub use entry::{CostCategory, CostEntry, LaborEntry, PartsEntry, ServiceEntry};
pub use work_order::{WorkOrder, WorkOrderStatus, CustomerRef, ProductRef};
pub use coverage::{CoverageVerdict, CoverageCheckRequest, CoverageCheckResponse, CoverageDetails};
pub use validation::{WorkOrderValidator, ValidationResult};
pub use error::WorkOrderError;
