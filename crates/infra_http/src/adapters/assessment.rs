//! Assessment store adapter

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError, WorkOrderId,
};
use domain_billing::{AssessmentPort, BillingAssessment};

use crate::client::{CollaboratorClient, Endpoint};
use crate::envelope::ApiEnvelope;

/// Stores assessment records through the billing-assessment service
///
/// `POST` writes one record, `GET ?workOrderId=` lists a work order's
/// records.
#[derive(Debug, Clone)]
pub struct HttpAssessmentAdapter {
    endpoint: Endpoint,
}

impl HttpAssessmentAdapter {
    pub fn new(client: CollaboratorClient) -> Self {
        let path = client.config().assessment_path.clone();
        Self {
            endpoint: client.endpoint("assessment-store", &path),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl DomainPort for HttpAssessmentAdapter {}

#[async_trait]
impl HealthCheckable for HttpAssessmentAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::endpoint_health("http-assessment-adapter", &self.endpoint).await
    }
}

#[async_trait]
impl AssessmentPort for HttpAssessmentAdapter {
    #[instrument(skip(self, assessment, metadata), fields(assessment_id = %assessment.id, work_order_id = %assessment.work_order_id))]
    async fn save(
        &self,
        assessment: &BillingAssessment,
        metadata: Option<OperationMetadata>,
    ) -> Result<BillingAssessment, PortError> {
        let envelope: ApiEnvelope<BillingAssessment> =
            self.endpoint.post(assessment, metadata.as_ref()).await?;
        let stored = envelope.into_result(self.endpoint.collaborator())?;
        debug!("Assessment stored");
        Ok(stored)
    }

    #[instrument(skip(self, metadata), fields(work_order_id = %work_order_id))]
    async fn find_by_work_order(
        &self,
        work_order_id: WorkOrderId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<BillingAssessment>, PortError> {
        let query = [("workOrderId", work_order_id.as_uuid().to_string())];
        let envelope: ApiEnvelope<Vec<BillingAssessment>> =
            self.endpoint.get(&query, metadata.as_ref()).await?;
        let mut assessments = envelope.into_result(self.endpoint.collaborator())?;
        assessments.sort_by(|a, b| b.assessed_at.cmp(&a.assessed_at));
        Ok(assessments)
    }
}
