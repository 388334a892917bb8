//! Billing assessment records
//!
//! An assessment is written once per assessment run and never updated.
//! Re-assessing a work order writes a new record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use core_kernel::{
    AssessmentId, Currency, IdempotencyKey, Money, OperationMetadata, SalesOrderRef,
    ServiceRequestId, WarrantyClaimRef, WorkOrderId,
};

use crate::calculation::{BillingCalculation, CostBreakdown};
use crate::classification::BillingStatus;
use crate::error::BillingError;
use crate::ports::AssessmentPort;

/// Payment state of the billable part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
}

/// Amounts per cost category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmounts {
    pub labor: Money,
    pub parts: Money,
    pub services: Money,
}

impl CategoryAmounts {
    fn covered(breakdown: &CostBreakdown) -> Self {
        Self {
            labor: breakdown.labor.warranty_covered,
            parts: breakdown.parts.warranty_covered,
            services: breakdown.services.warranty_covered,
        }
    }

    fn billable(breakdown: &CostBreakdown) -> Self {
        Self {
            labor: breakdown.labor.billable,
            parts: breakdown.parts.billable,
            services: breakdown.services.billable,
        }
    }
}

/// Persisted outcome of assessing one work order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAssessment {
    pub id: AssessmentId,
    pub service_request_id: ServiceRequestId,
    pub work_order_id: WorkOrderId,
    pub assessed_at: DateTime<Utc>,
    pub assessed_by: String,
    pub billing_status: BillingStatus,
    pub currency: Currency,
    pub total_cost: Money,
    pub warranty_covered_total: Money,
    pub billable_total: Money,
    pub warranty_covered: CategoryAmounts,
    pub billable: CategoryAmounts,
    pub sales_order_id: Option<SalesOrderRef>,
    pub warranty_claim_id: Option<WarrantyClaimRef>,
    pub payment_status: Option<PaymentStatus>,
    pub idempotency_key: Option<IdempotencyKey>,
}

/// Inputs of one assessment record
#[derive(Debug, Clone)]
pub struct AssessmentInput<'a> {
    pub service_request_id: ServiceRequestId,
    pub work_order_id: WorkOrderId,
    pub calculation: &'a BillingCalculation,
    pub status: BillingStatus,
    pub sales_order_id: Option<SalesOrderRef>,
    pub warranty_claim_id: Option<WarrantyClaimRef>,
    pub assessed_by: &'a str,
    pub idempotency_key: Option<IdempotencyKey>,
}

impl BillingAssessment {
    /// Builds the record from a calculation
    ///
    /// Payment is pending only for purely billable work orders.
    pub fn from_input(input: AssessmentInput<'_>) -> Self {
        let calc = input.calculation;
        Self {
            id: AssessmentId::new_v7(),
            service_request_id: input.service_request_id,
            work_order_id: input.work_order_id,
            assessed_at: Utc::now(),
            assessed_by: input.assessed_by.to_string(),
            billing_status: input.status,
            currency: calc.currency,
            total_cost: calc.total,
            warranty_covered_total: calc.warranty_covered,
            billable_total: calc.billable,
            warranty_covered: CategoryAmounts::covered(&calc.breakdown),
            billable: CategoryAmounts::billable(&calc.breakdown),
            sales_order_id: input.sales_order_id,
            warranty_claim_id: input.warranty_claim_id,
            payment_status: (input.status == BillingStatus::Billable).then_some(PaymentStatus::Pending),
            idempotency_key: input.idempotency_key,
        }
    }
}

/// Writes assessment records through the assessment store
#[derive(Clone)]
pub struct AssessmentRecorder {
    store: Arc<dyn AssessmentPort>,
}

impl AssessmentRecorder {
    pub fn new(store: Arc<dyn AssessmentPort>) -> Self {
        Self { store }
    }

    /// Builds and persists the assessment
    ///
    /// # Errors
    ///
    /// `BillingError::Persistence` if the store fails. The error is returned,
    /// never swallowed.
    #[instrument(skip(self, input, metadata), fields(work_order_id = %input.work_order_id, status = %input.status))]
    pub async fn record(
        &self,
        input: AssessmentInput<'_>,
        metadata: Option<OperationMetadata>,
    ) -> Result<BillingAssessment, BillingError> {
        let work_order_id = input.work_order_id;
        let assessment = BillingAssessment::from_input(input);

        let saved = self
            .store
            .save(&assessment, metadata)
            .await
            .map_err(|source| BillingError::Persistence {
                work_order_id,
                side_effects: None,
                source,
            })?;

        info!(assessment_id = %saved.id, "Billing assessment recorded");
        Ok(saved)
    }
}
