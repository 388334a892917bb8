//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_billing::BillingError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A collaborator failed or refused; `details` carries anything the
    /// caller needs to reconcile
    #[error("Upstream error: {message}")]
    BadGateway {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg, None),
            ApiError::BadGateway { message, details } => (StatusCode::BAD_GATEWAY, "upstream_error", message, details),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        let message = err.to_string();
        match err {
            BillingError::Validation(_)
            | BillingError::Money(_)
            | BillingError::MissingWarrantyCard(_) => ApiError::Validation(message),
            BillingError::AssessmentInProgress(_) => ApiError::Conflict(message),
            BillingError::CoverageCheck { source, .. }
            | BillingError::CollaboratorCall { source, .. }
                if source.is_transient() =>
            {
                ApiError::ServiceUnavailable(message)
            }
            BillingError::CoverageCheck { .. } | BillingError::CollaboratorCall { .. } => {
                ApiError::BadGateway {
                    message,
                    details: None,
                }
            }
            BillingError::Persistence { side_effects, .. } => {
                // downstream records may exist without an assessment
                error!(error = %message, "Assessment not persisted");
                ApiError::BadGateway {
                    message,
                    details: side_effects.and_then(|effects| {
                        serde_json::to_value(effects.as_ref()).ok()
                    }),
                }
            }
            BillingError::InvalidStageTransition { .. } => ApiError::Internal(message),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{PortError, WorkOrderId};

    #[test]
    fn test_in_progress_is_conflict() {
        let err: ApiError = BillingError::AssessmentInProgress(WorkOrderId::new()).into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_transient_coverage_failure_is_unavailable() {
        let err: ApiError = BillingError::CoverageCheck {
            work_order_id: WorkOrderId::new(),
            source: PortError::ServiceUnavailable {
                service: "coverage".to_string(),
            },
        }
        .into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_rejected_coverage_is_bad_gateway() {
        let err: ApiError = BillingError::CoverageCheck {
            work_order_id: WorkOrderId::new(),
            source: PortError::rejected("Card not registered"),
        }
        .into();
        assert!(matches!(err, ApiError::BadGateway { .. }));
    }

    #[test]
    fn test_validation_maps_to_unprocessable() {
        let response = ApiError::from(BillingError::validation("negative rate")).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
