//! Outcomes of the side-effecting collaborator calls
//!
//! Sales-order and claim submission never abort an assessment. Each call
//! ends in a tagged outcome that is carried into the result and logged.

use serde::{Deserialize, Serialize};

use core_kernel::{PortError, SalesOrderRef, WarrantyClaimRef};

/// Result of one side-effecting call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SideEffectOutcome<R> {
    /// The collaborator created the record
    Submitted { reference: R },
    /// The call was made and failed; `error` is the collaborator's message
    Failed { error: String },
    /// The call was not made
    Skipped { reason: String },
}

impl<R> SideEffectOutcome<R> {
    pub fn skipped(reason: impl Into<String>) -> Self {
        SideEffectOutcome::Skipped { reason: reason.into() }
    }

    pub fn from_result(result: Result<R, PortError>) -> Self {
        match result {
            Ok(reference) => SideEffectOutcome::Submitted { reference },
            Err(err) => SideEffectOutcome::Failed { error: err.to_string() },
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, SideEffectOutcome::Submitted { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SideEffectOutcome::Failed { .. })
    }

    /// Reference of the created record, if any
    pub fn reference(&self) -> Option<&R> {
        match self {
            SideEffectOutcome::Submitted { reference } => Some(reference),
            _ => None,
        }
    }
}

/// Outcomes of both side effects of one assessment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideEffects {
    pub sales_order: SideEffectOutcome<SalesOrderRef>,
    pub warranty_claim: SideEffectOutcome<WarrantyClaimRef>,
}
