//! Billing assessment orchestration
//!
//! Runs one assessment of a completed work order:
//!
//! 1. take the work order's lock and derive the run's idempotency key
//! 2. obtain the coverage verdict (skipped when the caller supplies one)
//! 3. calculate and classify
//! 4. submit the sales order and the warranty claim concurrently
//! 5. record the assessment
//!
//! Step 4 never fails the run; each submission ends in a
//! [`SideEffectOutcome`]. A failure in step 5 is returned together with the
//! step 4 outcomes.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use core_kernel::{
    AttemptId, IdempotencyKey, OperationMetadata, SalesOrderRef, WarrantyClaimRef, WorkOrderId,
};
use domain_claims::WarrantyClaimPort;
use domain_workorder::{CoverageCheckRequest, CoverageVerdict, WorkOrder};

use crate::assessment::{AssessmentInput, AssessmentRecorder, BillingAssessment};
use crate::calculation::{calculate, BillingCalculation};
use crate::classification::{classify, BillingStatus};
use crate::config::EngineConfig;
use crate::error::BillingError;
use crate::lifecycle::{AssessmentRun, AssessmentStage, SideEffectBranch};
use crate::locks::WorkOrderLocks;
use crate::outcome::{SideEffectOutcome, SideEffects};
use crate::ports::{AssessmentPort, CoveragePort, SalesOrderPort};
use crate::sales_order::generate_sales_order;
use crate::warranty_claim::build_claim;

/// Request to assess one work order
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    pub work_order: WorkOrder,
    /// Who is assessing; falls back to the configured default
    pub assessed_by: Option<String>,
    /// Attempt being retried; a fresh attempt is started when absent
    pub attempt_id: Option<AttemptId>,
}

impl AssessmentRequest {
    pub fn new(work_order: WorkOrder) -> Self {
        Self {
            work_order,
            assessed_by: None,
            attempt_id: None,
        }
    }

    pub fn assessed_by(mut self, assessor: impl Into<String>) -> Self {
        self.assessed_by = Some(assessor.into());
        self
    }

    /// Retries an earlier attempt, reusing its idempotency key
    pub fn retrying(mut self, attempt_id: AttemptId) -> Self {
        self.attempt_id = Some(attempt_id);
        self
    }
}

/// Everything one successful run produced
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOutcome {
    pub assessment: BillingAssessment,
    pub verdict: CoverageVerdict,
    pub calculation: BillingCalculation,
    pub side_effects: SideEffects,
    pub branch: SideEffectBranch,
    pub run: AssessmentRun,
}

/// Orchestrates assessments against the collaborator ports
#[derive(Clone)]
pub struct BillingAssessmentService {
    coverage: Arc<dyn CoveragePort>,
    sales_orders: Arc<dyn SalesOrderPort>,
    claims: Arc<dyn WarrantyClaimPort>,
    assessments: Arc<dyn AssessmentPort>,
    recorder: AssessmentRecorder,
    locks: WorkOrderLocks,
    config: EngineConfig,
}

impl BillingAssessmentService {
    pub fn new(
        coverage: Arc<dyn CoveragePort>,
        sales_orders: Arc<dyn SalesOrderPort>,
        claims: Arc<dyn WarrantyClaimPort>,
        assessments: Arc<dyn AssessmentPort>,
        config: EngineConfig,
    ) -> Self {
        Self {
            coverage,
            sales_orders,
            claims,
            recorder: AssessmentRecorder::new(assessments.clone()),
            assessments,
            locks: WorkOrderLocks::new(),
            config,
        }
    }

    /// Shares an existing lock table, e.g. between several services
    pub fn with_locks(mut self, locks: WorkOrderLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn locks(&self) -> &WorkOrderLocks {
        &self.locks
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assesses a work order, asking warranty verification for the verdict
    ///
    /// A work order without a warranty card is not covered; verification is
    /// not called for it.
    #[instrument(
        skip(self, request),
        fields(work_order_id = %request.work_order.id, work_order_number = %request.work_order.work_order_number)
    )]
    pub async fn assess(&self, request: AssessmentRequest) -> Result<AssessmentOutcome, BillingError> {
        request.work_order.ensure_completed()?;
        let key = self.idempotency_key(&request);
        let _guard = self.locks.try_acquire(request.work_order.id, key.attempt_id())?;

        let metadata = self.metadata(&request, key);
        let verdict = self.check_coverage(&request.work_order, &metadata).await?;
        self.run(&request, verdict, key, metadata).await
    }

    /// Assesses a work order against a verdict the caller already has
    #[instrument(
        skip(self, request),
        fields(work_order_id = %request.work_order.id, work_order_number = %request.work_order.work_order_number)
    )]
    pub async fn assess_with_verdict(
        &self,
        request: AssessmentRequest,
        verdict: CoverageVerdict,
    ) -> Result<AssessmentOutcome, BillingError> {
        request.work_order.ensure_completed()?;
        let key = self.idempotency_key(&request);
        let _guard = self.locks.try_acquire(request.work_order.id, key.attempt_id())?;

        let metadata = self.metadata(&request, key);
        self.run(&request, verdict, key, metadata).await
    }

    /// Lists the assessments recorded for a work order, newest first
    pub async fn history(&self, work_order_id: WorkOrderId) -> Result<Vec<BillingAssessment>, BillingError> {
        self.assessments
            .find_by_work_order(work_order_id, None)
            .await
            .map_err(|source| BillingError::CollaboratorCall {
                collaborator: "assessment-store",
                source,
            })
    }

    async fn check_coverage(
        &self,
        work_order: &WorkOrder,
        metadata: &OperationMetadata,
    ) -> Result<CoverageVerdict, BillingError> {
        let Some(warranty_card_id) = work_order.warranty_card_id else {
            debug!("No warranty card; work order is not covered");
            return Ok(CoverageVerdict::not_covered());
        };

        let request = CoverageCheckRequest {
            work_order_id: work_order.id,
            warranty_card_id,
        };
        self.coverage
            .check_coverage(&request, Some(metadata.clone()))
            .await
            .map_err(|source| BillingError::CoverageCheck {
                work_order_id: work_order.id,
                source,
            })
    }

    async fn run(
        &self,
        request: &AssessmentRequest,
        verdict: CoverageVerdict,
        key: IdempotencyKey,
        metadata: OperationMetadata,
    ) -> Result<AssessmentOutcome, BillingError> {
        let work_order = &request.work_order;
        let assessor = self.assessor(request);
        let mut run = AssessmentRun::start(key);
        run.advance(AssessmentStage::CoverageChecked)?;

        let calculation = calculate(work_order, &verdict)?;
        run.advance(AssessmentStage::Calculated)?;

        let status = classify(&verdict, &calculation);
        run.advance(AssessmentStage::Classified)?;
        info!(
            %status,
            total = %calculation.total,
            warranty_covered = %calculation.warranty_covered,
            billable = %calculation.billable,
            "Work order classified"
        );

        let (sales_order, warranty_claim) = tokio::join!(
            self.submit_sales_order(work_order, &calculation, status, assessor, &metadata),
            self.submit_claim(work_order, &calculation, status, assessor, &metadata),
        );
        let branch =
            SideEffectBranch::from_submissions(sales_order.is_submitted(), warranty_claim.is_submitted());
        run.advance(AssessmentStage::SideEffectsDone(branch))?;

        if branch == SideEffectBranch::Neither {
            if status == BillingStatus::WarrantyCovered && work_order.warranty_card_id.is_none() {
                error!(
                    %status,
                    "Covered work order has no warranty card; neither sales order nor claim was created"
                );
            } else {
                warn!(%status, "Assessment produced neither a sales order nor a claim");
            }
        }

        let side_effects = SideEffects {
            sales_order,
            warranty_claim,
        };
        let input = AssessmentInput {
            service_request_id: work_order.service_request_id,
            work_order_id: work_order.id,
            calculation: &calculation,
            status,
            sales_order_id: side_effects.sales_order.reference().cloned(),
            warranty_claim_id: side_effects.warranty_claim.reference().cloned(),
            assessed_by: assessor,
            idempotency_key: Some(key),
        };

        let assessment = match self.recorder.record(input, Some(metadata)).await {
            Ok(assessment) => assessment,
            Err(err) => {
                error!(
                    error = %err,
                    sales_order = ?side_effects.sales_order.reference(),
                    warranty_claim = ?side_effects.warranty_claim.reference(),
                    "Assessment not recorded; downstream records may be orphaned"
                );
                return Err(err.with_side_effects(side_effects));
            }
        };
        run.advance(AssessmentStage::Recorded)?;

        Ok(AssessmentOutcome {
            assessment,
            verdict,
            calculation,
            side_effects,
            branch,
            run,
        })
    }

    async fn submit_sales_order(
        &self,
        work_order: &WorkOrder,
        calculation: &BillingCalculation,
        status: BillingStatus,
        assessor: &str,
        metadata: &OperationMetadata,
    ) -> SideEffectOutcome<SalesOrderRef> {
        if !status.has_billable_work() {
            return SideEffectOutcome::skipped(format!("billing status is {}", status));
        }

        let request = generate_sales_order(work_order, calculation, assessor);
        if request.is_empty() {
            warn!(
                billable = %calculation.billable,
                "Billable cost but no entry is individually billable; sales order skipped"
            );
            return SideEffectOutcome::skipped("no entry is individually billable");
        }

        let result = self
            .sales_orders
            .create_sales_order(&request, Some(metadata.clone()))
            .await;
        match &result {
            Ok(order) => info!(sales_order = %order, items = request.items.len(), "Sales order created"),
            Err(err) => warn!(error = %err, "Sales order submission failed"),
        }
        SideEffectOutcome::from_result(result)
    }

    async fn submit_claim(
        &self,
        work_order: &WorkOrder,
        calculation: &BillingCalculation,
        status: BillingStatus,
        assessor: &str,
        metadata: &OperationMetadata,
    ) -> SideEffectOutcome<WarrantyClaimRef> {
        if !status.has_covered_work() {
            return SideEffectOutcome::skipped(format!("billing status is {}", status));
        }

        let claim = match build_claim(work_order, calculation, self.config.claim_policy, assessor) {
            Ok(claim) => claim,
            Err(err) => {
                warn!(error = %err, "Warranty claim not filed");
                return SideEffectOutcome::skipped(err.to_string());
            }
        };

        let result = self.claims.create_claim(&claim, Some(metadata.clone())).await;
        match &result {
            Ok(claim_ref) => info!(warranty_claim = %claim_ref, "Warranty claim filed"),
            Err(err) => warn!(error = %err, "Warranty claim submission failed"),
        }
        SideEffectOutcome::from_result(result)
    }

    fn idempotency_key(&self, request: &AssessmentRequest) -> IdempotencyKey {
        let attempt_id = request.attempt_id.unwrap_or_else(AttemptId::new_v7);
        IdempotencyKey::new(request.work_order.id, attempt_id)
    }

    fn metadata(&self, request: &AssessmentRequest, key: IdempotencyKey) -> OperationMetadata {
        OperationMetadata::for_attempt(key, self.assessor(request))
            .with_context("work_order_number", request.work_order.work_order_number.clone())
    }

    fn assessor<'a>(&'a self, request: &'a AssessmentRequest) -> &'a str {
        request
            .assessed_by
            .as_deref()
            .unwrap_or(&self.config.default_assessor)
    }
}
