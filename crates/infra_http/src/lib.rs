//! HTTP Infrastructure Layer
//!
//! Adapters that implement the billing engine's collaborator ports against
//! JSON-over-HTTP services.
//!
//! # Architecture
//!
//! One [`CollaboratorClient`] owns the connection pool, the timeout and the
//! retry policy. Each adapter wraps it together with its own circuit breaker,
//! so a failing sales-order service does not trip the coverage adapter:
//!
//! - [`HttpCoverageAdapter`]: `POST` coverage check, plain JSON answer
//! - [`HttpSalesOrderAdapter`]: `POST` sales order, `{success, data, error}` envelope
//! - [`HttpWarrantyClaimAdapter`]: `POST` warranty claim, envelope
//! - [`HttpAssessmentAdapter`]: `POST` / `GET` assessment records, envelope
//!
//! Side-effecting calls carry the run's idempotency key in the
//! `Idempotency-Key` header, so a retried request is safe.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_http::{CollaboratorClient, CollaboratorConfig, HttpSalesOrderAdapter};
//!
//! let client = CollaboratorClient::new(CollaboratorConfig::from_env()?)?;
//! let sales_orders = Arc::new(HttpSalesOrderAdapter::new(client.clone()));
//! ```

pub mod adapters;
pub mod circuit_breaker;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;

pub use adapters::{
    HttpAssessmentAdapter, HttpCoverageAdapter, HttpSalesOrderAdapter, HttpWarrantyClaimAdapter,
};
pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use client::{CollaboratorClient, Endpoint};
pub use config::CollaboratorConfig;
pub use envelope::{ApiEnvelope, CreatedRecord};
pub use error::HttpError;
