//! Warranty-claim service adapter

use async_trait::async_trait;
use tracing::{info, instrument};

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError, WarrantyClaimRef,
};
use domain_claims::{WarrantyClaimPort, WarrantyClaimRequest};

use crate::client::{CollaboratorClient, Endpoint};
use crate::envelope::{ApiEnvelope, CreatedRecord};

#[derive(Debug, Clone)]
pub struct HttpWarrantyClaimAdapter {
    endpoint: Endpoint,
}

impl HttpWarrantyClaimAdapter {
    pub fn new(client: CollaboratorClient) -> Self {
        let path = client.config().claim_path.clone();
        Self {
            endpoint: client.endpoint("warranty-claim", &path),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl DomainPort for HttpWarrantyClaimAdapter {}

#[async_trait]
impl HealthCheckable for HttpWarrantyClaimAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::endpoint_health("http-warranty-claim-adapter", &self.endpoint).await
    }
}

#[async_trait]
impl WarrantyClaimPort for HttpWarrantyClaimAdapter {
    #[instrument(skip(self, request, metadata), fields(warranty_card_id = %request.warranty_card_id))]
    async fn create_claim(
        &self,
        request: &WarrantyClaimRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<WarrantyClaimRef, PortError> {
        let envelope: ApiEnvelope<CreatedRecord> =
            self.endpoint.post(request, metadata.as_ref()).await?;
        let record = envelope.into_result(self.endpoint.collaborator())?;
        let claim = WarrantyClaimRef::from(String::from(record.id));
        info!(warranty_claim_id = %claim, "Warranty claim created");
        Ok(claim)
    }
}
