//! Billing Domain Ports
//!
//! Collaborators the assessment engine calls but does not own:
//!
//! - **CoveragePort**: warranty verification, answers with a [`CoverageVerdict`]
//! - **SalesOrderPort**: creates a sales order for billable work
//! - **AssessmentPort**: stores and lists assessment records
//!
//! The warranty-claim port lives in `domain_claims`. HTTP adapters for all
//! four are in `infra_http`; the in-memory mocks below back the unit tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_billing::BillingAssessmentService;
//!
//! let service = BillingAssessmentService::new(
//!     Arc::new(HttpCoverageAdapter::new(client.clone())),
//!     Arc::new(HttpSalesOrderAdapter::new(client.clone())),
//!     Arc::new(HttpWarrantyClaimAdapter::new(client.clone())),
//!     Arc::new(HttpAssessmentAdapter::new(client)),
//!     EngineConfig::default(),
//! );
//! ```

use async_trait::async_trait;

use core_kernel::{
    DomainPort, HealthCheckable, OperationMetadata, PortError, SalesOrderRef, WorkOrderId,
};
use domain_workorder::{CoverageCheckRequest, CoverageVerdict};

use crate::assessment::BillingAssessment;
use crate::sales_order::SalesOrderRequest;

/// Port for the warranty verification service
#[async_trait]
pub trait CoveragePort: DomainPort + HealthCheckable {
    /// Asks whether the work order is covered, overall and per category
    async fn check_coverage(
        &self,
        request: &CoverageCheckRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<CoverageVerdict, PortError>;
}

/// Port for the sales-order service
#[async_trait]
pub trait SalesOrderPort: DomainPort + HealthCheckable {
    /// Creates a sales order and returns its reference
    ///
    /// Adapters forward `metadata.idempotency_key` so that a retried call
    /// returns the order created by the first one.
    async fn create_sales_order(
        &self,
        request: &SalesOrderRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<SalesOrderRef, PortError>;
}

/// Port for the assessment store
#[async_trait]
pub trait AssessmentPort: DomainPort + HealthCheckable {
    /// Stores a new assessment and returns it as stored
    async fn save(
        &self,
        assessment: &BillingAssessment,
        metadata: Option<OperationMetadata>,
    ) -> Result<BillingAssessment, PortError>;

    /// Lists a work order's assessments, newest first
    async fn find_by_work_order(
        &self,
        work_order_id: WorkOrderId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<BillingAssessment>, PortError>;
}

/// Mock implementations of the billing ports for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{HealthCheckResult, IdempotencyKey};

    fn unavailable(service: &str) -> PortError {
        PortError::ServiceUnavailable {
            service: service.to_string(),
        }
    }

    /// Coverage service answering from a table of verdicts
    ///
    /// Work orders without an entry get the default verdict.
    #[derive(Debug, Default)]
    pub struct MockCoveragePort {
        verdicts: Arc<RwLock<HashMap<WorkOrderId, CoverageVerdict>>>,
        default_verdict: Arc<RwLock<CoverageVerdict>>,
        requests: Arc<RwLock<Vec<CoverageCheckRequest>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockCoveragePort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Mock that answers `verdict` for every work order
        pub fn answering(verdict: CoverageVerdict) -> Self {
            Self {
                default_verdict: Arc::new(RwLock::new(verdict)),
                ..Self::default()
            }
        }

        pub async fn set_verdict(&self, work_order_id: WorkOrderId, verdict: CoverageVerdict) {
            self.verdicts.write().await.insert(work_order_id, verdict);
        }

        pub async fn set_unavailable(&self) {
            *self.unavailable.write().await = true;
        }

        pub async fn requests(&self) -> Vec<CoverageCheckRequest> {
            self.requests.read().await.clone()
        }
    }

    impl DomainPort for MockCoveragePort {}

    #[async_trait]
    impl HealthCheckable for MockCoveragePort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-coverage-port", 0)
        }
    }

    #[async_trait]
    impl CoveragePort for MockCoveragePort {
        async fn check_coverage(
            &self,
            request: &CoverageCheckRequest,
            _metadata: Option<OperationMetadata>,
        ) -> Result<CoverageVerdict, PortError> {
            if *self.unavailable.read().await {
                return Err(unavailable("warranty-verification"));
            }
            self.requests.write().await.push(request.clone());

            let verdict = self.verdicts.read().await.get(&request.work_order_id).copied();
            match verdict {
                Some(verdict) => Ok(verdict),
                None => Ok(*self.default_verdict.read().await),
            }
        }
    }

    /// In-memory sales-order service
    ///
    /// Calls repeating an idempotency key return the first reference.
    #[derive(Debug, Default)]
    pub struct MockSalesOrderPort {
        orders: Arc<RwLock<Vec<(SalesOrderRequest, Option<OperationMetadata>)>>>,
        issued: Arc<RwLock<HashMap<IdempotencyKey, SalesOrderRef>>>,
        rejection: Arc<RwLock<Option<String>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockSalesOrderPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent calls answer `success: false` with this message
        pub async fn reject_with(&self, message: impl Into<String>) {
            *self.rejection.write().await = Some(message.into());
        }

        pub async fn set_unavailable(&self) {
            *self.unavailable.write().await = true;
        }

        pub async fn submitted(&self) -> Vec<SalesOrderRequest> {
            self.orders.read().await.iter().map(|(r, _)| r.clone()).collect()
        }

        pub async fn submitted_metadata(&self) -> Vec<Option<OperationMetadata>> {
            self.orders.read().await.iter().map(|(_, m)| m.clone()).collect()
        }

        pub async fn call_count(&self) -> usize {
            self.orders.read().await.len()
        }
    }

    impl DomainPort for MockSalesOrderPort {}

    #[async_trait]
    impl HealthCheckable for MockSalesOrderPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-sales-order-port", 0)
        }
    }

    #[async_trait]
    impl SalesOrderPort for MockSalesOrderPort {
        async fn create_sales_order(
            &self,
            request: &SalesOrderRequest,
            metadata: Option<OperationMetadata>,
        ) -> Result<SalesOrderRef, PortError> {
            if *self.unavailable.read().await {
                return Err(unavailable("sales-order"));
            }
            if let Some(message) = self.rejection.read().await.clone() {
                return Err(PortError::rejected(message));
            }

            let key = metadata.as_ref().and_then(|m| m.idempotency_key);
            if let Some(key) = key {
                if let Some(existing) = self.issued.read().await.get(&key) {
                    return Ok(existing.clone());
                }
            }

            let mut orders = self.orders.write().await;
            orders.push((request.clone(), metadata));
            let order_ref = SalesOrderRef::new(format!("SO-{:05}", orders.len()));

            if let Some(key) = key {
                self.issued.write().await.insert(key, order_ref.clone());
            }
            Ok(order_ref)
        }
    }

    /// In-memory assessment store
    ///
    /// Saving a record whose idempotency key is already stored returns the
    /// stored record instead of adding a second one.
    #[derive(Debug, Default)]
    pub struct MockAssessmentPort {
        assessments: Arc<RwLock<Vec<BillingAssessment>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockAssessmentPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn set_unavailable(&self) {
            *self.unavailable.write().await = true;
        }

        /// Everything stored, in insertion order
        pub async fn all(&self) -> Vec<BillingAssessment> {
            self.assessments.read().await.clone()
        }
    }

    impl DomainPort for MockAssessmentPort {}

    #[async_trait]
    impl HealthCheckable for MockAssessmentPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-assessment-port", 0)
        }
    }

    #[async_trait]
    impl AssessmentPort for MockAssessmentPort {
        async fn save(
            &self,
            assessment: &BillingAssessment,
            metadata: Option<OperationMetadata>,
        ) -> Result<BillingAssessment, PortError> {
            if *self.unavailable.read().await {
                return Err(unavailable("assessment-store"));
            }

            let key = assessment
                .idempotency_key
                .or_else(|| metadata.and_then(|m| m.idempotency_key));
            let mut assessments = self.assessments.write().await;
            if let Some(key) = key {
                let existing = assessments
                    .iter()
                    .find(|a| a.idempotency_key == Some(key));
                if let Some(existing) = existing {
                    return Ok(existing.clone());
                }
            }
            assessments.push(assessment.clone());
            Ok(assessment.clone())
        }

        async fn find_by_work_order(
            &self,
            work_order_id: WorkOrderId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<BillingAssessment>, PortError> {
            if *self.unavailable.read().await {
                return Err(unavailable("assessment-store"));
            }
            let mut found: Vec<_> = self
                .assessments
                .read()
                .await
                .iter()
                .rev()
                .filter(|a| a.work_order_id == work_order_id)
                .cloned()
                .collect();
            found.sort_by(|a, b| b.assessed_at.cmp(&a.assessed_at));
            Ok(found)
        }
    }
}
