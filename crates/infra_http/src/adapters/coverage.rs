//! Warranty verification service adapter

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError};
use domain_billing::CoveragePort;
use domain_workorder::{CoverageCheckRequest, CoverageCheckResponse, CoverageVerdict};

use crate::client::{CollaboratorClient, Endpoint};

/// Asks the warranty verification service whether a work order is covered
///
/// The service answers with a bare `{isWarrantyCovered, coverageDetails}`
/// object, not the envelope the write services use.
#[derive(Debug, Clone)]
pub struct HttpCoverageAdapter {
    endpoint: Endpoint,
}

impl HttpCoverageAdapter {
    pub fn new(client: CollaboratorClient) -> Self {
        let path = client.config().coverage_path.clone();
        Self {
            endpoint: client.endpoint("coverage", &path),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl DomainPort for HttpCoverageAdapter {}

#[async_trait]
impl HealthCheckable for HttpCoverageAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::endpoint_health("http-coverage-adapter", &self.endpoint).await
    }
}

#[async_trait]
impl CoveragePort for HttpCoverageAdapter {
    #[instrument(skip(self, request, metadata), fields(work_order_id = %request.work_order_id))]
    async fn check_coverage(
        &self,
        request: &CoverageCheckRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<CoverageVerdict, PortError> {
        let response: CoverageCheckResponse = self.endpoint.post(request, metadata.as_ref()).await?;
        let verdict = CoverageVerdict::from(response);
        debug!(
            covered = verdict.overall,
            labor = verdict.labor,
            parts = verdict.parts,
            "Coverage verdict received"
        );
        Ok(verdict)
    }
}
