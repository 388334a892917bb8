//! Billing domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError, WorkOrderId};
use domain_claims::ClaimError;
use domain_workorder::WorkOrderError;

use crate::lifecycle::AssessmentStage;
use crate::outcome::SideEffects;

/// Errors that can occur while assessing a work order
#[derive(Debug, Error)]
pub enum BillingError {
    /// The work order is malformed or not ready to be assessed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Amounts in different currencies were combined
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A claim was requested but the work order carries no warranty card
    #[error("Work order {0} has no warranty card")]
    MissingWarrantyCard(String),

    /// A collaborator call failed outside the tagged side-effect outcomes
    #[error("{collaborator} call failed: {source}")]
    CollaboratorCall {
        collaborator: &'static str,
        #[source]
        source: PortError,
    },

    /// Warranty verification could not be reached or refused the request
    #[error("Coverage check failed for work order {work_order_id}: {source}")]
    CoverageCheck {
        work_order_id: WorkOrderId,
        #[source]
        source: PortError,
    },

    /// The assessment record could not be stored
    ///
    /// When raised by the orchestrator, `side_effects` holds the sales order
    /// and claim outcomes that had already happened, so the host can find
    /// downstream records that now have no assessment pointing at them.
    #[error("Assessment for work order {work_order_id} could not be persisted: {source}")]
    Persistence {
        work_order_id: WorkOrderId,
        side_effects: Option<Box<SideEffects>>,
        #[source]
        source: PortError,
    },

    /// Another run is already assessing this work order
    #[error("Work order {0} is already being assessed")]
    AssessmentInProgress(WorkOrderId),

    /// An assessment run tried to skip or repeat a stage
    #[error("Invalid stage transition from {from} to {to}")]
    InvalidStageTransition {
        from: AssessmentStage,
        to: AssessmentStage,
    },
}

impl BillingError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    /// Attaches side-effect outcomes to a persistence failure
    pub fn with_side_effects(self, effects: SideEffects) -> Self {
        match self {
            BillingError::Persistence { work_order_id, source, .. } => BillingError::Persistence {
                work_order_id,
                side_effects: Some(Box::new(effects)),
                source,
            },
            other => other,
        }
    }
}

impl From<WorkOrderError> for BillingError {
    fn from(err: WorkOrderError) -> Self {
        match err {
            WorkOrderError::Money(e) => BillingError::Money(e),
            other => BillingError::Validation(other.to_string()),
        }
    }
}

impl From<ClaimError> for BillingError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::MissingWarrantyCard(work_order) => BillingError::MissingWarrantyCard(work_order),
            ClaimError::InvalidClaim(message) => BillingError::Validation(message),
        }
    }
}
