//! Warranty Claim Port
//!
//! The warranty-claim service is owned by another team. The billing engine
//! only ever creates claims, so the port is a single operation. Adapters
//! live in `infra_http`; the in-memory mock below backs unit tests.
//!
//! # Retries
//!
//! Claim creation is not naturally idempotent. Callers pass an
//! [`OperationMetadata`] carrying an `IdempotencyKey`, and adapters forward
//! it so a retried call returns the claim created by the first one.

use async_trait::async_trait;

use core_kernel::{
    DomainPort, HealthCheckable, OperationMetadata, PortError, WarrantyClaimRef,
};

use crate::claim::WarrantyClaimRequest;

/// Port for filing warranty claims
#[async_trait]
pub trait WarrantyClaimPort: DomainPort + HealthCheckable {
    /// Files a claim and returns the reference assigned by the claim service
    ///
    /// # Errors
    ///
    /// `PortError::Rejected` when the service answered with `success: false`;
    /// the message is the service's own error text.
    async fn create_claim(
        &self,
        request: &WarrantyClaimRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<WarrantyClaimRef, PortError>;
}

/// Mock implementation of WarrantyClaimPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{HealthCheckResult, IdempotencyKey};

    /// Failure the mock should report on the next calls
    #[derive(Debug, Clone)]
    enum Failure {
        Rejected(String),
        Unavailable,
    }

    /// In-memory claim service
    ///
    /// Every call is recorded. Calls repeating an idempotency key return the
    /// reference issued the first time without recording a new claim.
    #[derive(Debug, Default)]
    pub struct MockWarrantyClaimPort {
        claims: Arc<RwLock<Vec<(WarrantyClaimRequest, Option<OperationMetadata>)>>>,
        issued: Arc<RwLock<HashMap<IdempotencyKey, WarrantyClaimRef>>>,
        failure: Arc<RwLock<Option<Failure>>>,
    }

    impl MockWarrantyClaimPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent calls answer `success: false` with this message
        pub async fn reject_with(&self, message: impl Into<String>) {
            *self.failure.write().await = Some(Failure::Rejected(message.into()));
        }

        /// Makes subsequent calls fail as if the service were down
        pub async fn set_unavailable(&self) {
            *self.failure.write().await = Some(Failure::Unavailable);
        }

        /// Claims filed so far, oldest first
        pub async fn submitted(&self) -> Vec<WarrantyClaimRequest> {
            self.claims.read().await.iter().map(|(r, _)| r.clone()).collect()
        }

        /// Metadata passed with each filed claim
        pub async fn submitted_metadata(&self) -> Vec<Option<OperationMetadata>> {
            self.claims.read().await.iter().map(|(_, m)| m.clone()).collect()
        }

        pub async fn call_count(&self) -> usize {
            self.claims.read().await.len()
        }
    }

    impl DomainPort for MockWarrantyClaimPort {}

    #[async_trait]
    impl HealthCheckable for MockWarrantyClaimPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-warranty-claim-port", 0)
        }
    }

    #[async_trait]
    impl WarrantyClaimPort for MockWarrantyClaimPort {
        async fn create_claim(
            &self,
            request: &WarrantyClaimRequest,
            metadata: Option<OperationMetadata>,
        ) -> Result<WarrantyClaimRef, PortError> {
            match self.failure.read().await.clone() {
                Some(Failure::Rejected(message)) => return Err(PortError::rejected(message)),
                Some(Failure::Unavailable) => {
                    return Err(PortError::ServiceUnavailable {
                        service: "warranty-claim".to_string(),
                    })
                }
                None => {}
            }

            let key = metadata.as_ref().and_then(|m| m.idempotency_key);
            if let Some(key) = key {
                if let Some(existing) = self.issued.read().await.get(&key) {
                    return Ok(existing.clone());
                }
            }

            let mut claims = self.claims.write().await;
            claims.push((request.clone(), metadata));
            let claim_ref = WarrantyClaimRef::new(format!("CLM-{:05}", claims.len()));

            if let Some(key) = key {
                self.issued.write().await.insert(key, claim_ref.clone());
            }
            Ok(claim_ref)
        }
    }
}
