//! Core Kernel - Foundational types for the warranty billing engine
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers for work orders, assessments and references
//! - Port infrastructure for collaborator adapters

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{
    WorkOrderId, ServiceRequestId, AssessmentId, CustomerId, ProductId,
    TechnicianId, PartId, WarrantyCardId, AttemptId,
    SalesOrderRef, WarrantyClaimRef, IdempotencyKey,
};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    OperationMetadata, CircuitBreakerConfig,
};
