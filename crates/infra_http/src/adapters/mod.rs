//! Port implementations over HTTP
//!
//! Each adapter implements one collaborator port plus `HealthCheckable`.
//! Health is read from the adapter's circuit breaker rather than probed, so
//! a readiness check never adds load to a struggling collaborator.

mod assessment;
mod coverage;
mod sales_order;
mod warranty_claim;

pub use assessment::HttpAssessmentAdapter;
pub use coverage::HttpCoverageAdapter;
pub use sales_order::HttpSalesOrderAdapter;
pub use warranty_claim::HttpWarrantyClaimAdapter;

use chrono::Utc;

use core_kernel::{AdapterHealth, HealthCheckResult};

use crate::circuit_breaker::BreakerState;
use crate::client::Endpoint;

async fn endpoint_health(adapter_id: &str, endpoint: &Endpoint) -> HealthCheckResult {
    let (status, message) = match endpoint.breaker().state().await {
        BreakerState::Closed => (AdapterHealth::Healthy, None),
        BreakerState::HalfOpen => (
            AdapterHealth::Degraded,
            Some(format!("Circuit breaker for {} is half-open", endpoint.url())),
        ),
        BreakerState::Open => (
            AdapterHealth::Degraded,
            Some(format!("Circuit breaker for {} is open", endpoint.url())),
        ),
    };

    HealthCheckResult {
        adapter_id: adapter_id.to_string(),
        status,
        latency_ms: 0,
        message,
        checked_at: Utc::now(),
    }
}
