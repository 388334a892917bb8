//! Assessment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use core_kernel::WorkOrderId;

use crate::dto::assessments::{AssessWorkOrderRequest, AssessmentHistoryResponse, AssessmentResponse};
use crate::{error::ApiError, AppState};

/// Assesses a completed work order
#[instrument(skip(state, body), fields(work_order_id = %body.work_order.id))]
pub async fn assess_work_order(
    State(state): State<AppState>,
    Json(body): Json<AssessWorkOrderRequest>,
) -> Result<(StatusCode, Json<AssessmentResponse>), ApiError> {
    body.validate()?;

    let (request, verdict) = body.into_parts();
    let outcome = match verdict {
        Some(verdict) => state.service.assess_with_verdict(request, verdict).await?,
        None => state.service.assess(request).await?,
    };

    info!(
        assessment_id = %outcome.assessment.id,
        status = %outcome.assessment.billing_status,
        branch = %outcome.branch,
        "Work order assessed"
    );
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Lists a work order's assessments, newest first
#[instrument(skip(state))]
pub async fn list_assessments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentHistoryResponse>, ApiError> {
    let work_order_id = WorkOrderId::from_uuid(id);
    let assessments = state.service.history(work_order_id).await?;

    Ok(Json(AssessmentHistoryResponse {
        work_order_id,
        assessments,
    }))
}
