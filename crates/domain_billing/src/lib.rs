//! Billing Domain - Warranty-Aware Assessment Engine
//!
//! Given a completed work order and a warranty coverage verdict, this crate
//! decides how much of the cost warranty pays for and how much the customer
//! owes, classifies the outcome, and drives the downstream records.
//!
//! # Components
//!
//! Pure, no I/O:
//! - [`split_category`] / [`calculate`]: covered vs billable split per category
//! - [`classify`]: `warranty_covered`, `billable` or `mixed`
//! - [`generate_sales_order`]: line items for entries not eligible for warranty
//! - [`build_claim`]: warranty claim for the covered cost
//!
//! I/O, through ports:
//! - [`AssessmentRecorder`]: persists the [`BillingAssessment`]
//! - [`BillingAssessmentService`]: runs the whole flow under a per-work-order
//!   lock, with an idempotency key on every side-effecting call
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{calculate, classify};
//!
//! let calculation = calculate(&work_order, &verdict)?;
//! let status = classify(&verdict, &calculation);
//! ```

pub mod calculation;
pub mod classification;
pub mod sales_order;
pub mod warranty_claim;
pub mod assessment;
pub mod outcome;
pub mod lifecycle;
pub mod locks;
pub mod ports;
pub mod config;
pub mod service;
pub mod error;

pub use calculation::{calculate, split_category, BillingCalculation, CategorySplit, CostBreakdown};
pub use classification::{classify, BillingStatus};
pub use sales_order::{
    generate_sales_order, SalesOrderItem, SalesOrderItemType, SalesOrderRequest, SalesOrderStatus,
    SalesOrderType,
};
pub use warranty_claim::build_claim;
pub use assessment::{
    AssessmentInput, AssessmentRecorder, BillingAssessment, CategoryAmounts, PaymentStatus,
};
pub use outcome::{SideEffectOutcome, SideEffects};
pub use lifecycle::{AssessmentRun, AssessmentStage, SideEffectBranch, StageTransition};
pub use locks::{WorkOrderGuard, WorkOrderLocks};
pub use ports::{AssessmentPort, CoveragePort, SalesOrderPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockAssessmentPort, MockCoveragePort, MockSalesOrderPort};
pub use config::EngineConfig;
pub use service::{AssessmentOutcome, AssessmentRequest, BillingAssessmentService};
pub use error::BillingError;
