//! Assessment DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::AttemptId;
use domain_billing::{
    AssessmentOutcome, AssessmentRequest, BillingAssessment, BillingCalculation, BillingStatus,
    SideEffectBranch, SideEffects, StageTransition,
};
use domain_workorder::{CoverageVerdict, WorkOrder};

/// Body of `POST /api/v1/assessments`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssessWorkOrderRequest {
    pub work_order: WorkOrder,
    /// Verdict the caller already holds; warranty verification is asked when absent
    pub verdict: Option<CoverageVerdict>,
    #[validate(length(min = 1, max = 100))]
    pub assessed_by: Option<String>,
    /// Attempt being retried, so collaborators can deduplicate
    pub attempt_id: Option<AttemptId>,
}

impl AssessWorkOrderRequest {
    /// Splits into the engine request and the optional verdict
    pub fn into_parts(self) -> (AssessmentRequest, Option<CoverageVerdict>) {
        let mut request = AssessmentRequest::new(self.work_order);
        if let Some(assessor) = self.assessed_by {
            request = request.assessed_by(assessor);
        }
        if let Some(attempt_id) = self.attempt_id {
            request = request.retrying(attempt_id);
        }
        (request, self.verdict)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub assessment: BillingAssessment,
    pub billing_status: BillingStatus,
    pub verdict: CoverageVerdict,
    pub calculation: BillingCalculation,
    pub side_effects: SideEffects,
    pub branch: SideEffectBranch,
    pub stages: Vec<StageTransition>,
}

impl From<AssessmentOutcome> for AssessmentResponse {
    fn from(outcome: AssessmentOutcome) -> Self {
        Self {
            billing_status: outcome.assessment.billing_status,
            stages: outcome.run.history().to_vec(),
            assessment: outcome.assessment,
            verdict: outcome.verdict,
            calculation: outcome.calculation,
            side_effects: outcome.side_effects,
            branch: outcome.branch,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentHistoryResponse {
    pub work_order_id: core_kernel::WorkOrderId,
    pub assessments: Vec<BillingAssessment>,
}
