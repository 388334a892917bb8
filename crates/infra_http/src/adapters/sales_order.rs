//! Sales-order service adapter

use async_trait::async_trait;
use tracing::{info, instrument};

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError, SalesOrderRef,
};
use domain_billing::{SalesOrderPort, SalesOrderRequest};

use crate::client::{CollaboratorClient, Endpoint};
use crate::envelope::{ApiEnvelope, CreatedRecord};

#[derive(Debug, Clone)]
pub struct HttpSalesOrderAdapter {
    endpoint: Endpoint,
}

impl HttpSalesOrderAdapter {
    pub fn new(client: CollaboratorClient) -> Self {
        let path = client.config().sales_order_path.clone();
        Self {
            endpoint: client.endpoint("sales-order", &path),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl DomainPort for HttpSalesOrderAdapter {}

#[async_trait]
impl HealthCheckable for HttpSalesOrderAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::endpoint_health("http-sales-order-adapter", &self.endpoint).await
    }
}

#[async_trait]
impl SalesOrderPort for HttpSalesOrderAdapter {
    #[instrument(skip(self, request, metadata), fields(customer_id = %request.customer_id, items = request.items.len()))]
    async fn create_sales_order(
        &self,
        request: &SalesOrderRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<SalesOrderRef, PortError> {
        let envelope: ApiEnvelope<CreatedRecord> =
            self.endpoint.post(request, metadata.as_ref()).await?;
        let record = envelope.into_result(self.endpoint.collaborator())?;
        let sales_order = SalesOrderRef::from(String::from(record.id));
        info!(sales_order_id = %sales_order, "Sales order created");
        Ok(sales_order)
    }
}
