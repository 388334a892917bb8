//! Assessment run lifecycle
//!
//! ```text
//! Completed → CoverageChecked → Calculated → Classified
//!           → SideEffectsDone(SalesOrderSubmitted | ClaimSubmitted | Both | Neither)
//!           → Recorded
//! ```
//!
//! `Recorded` is terminal. Stages cannot be skipped or revisited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{IdempotencyKey, WorkOrderId};

use crate::error::BillingError;

/// Which side effects produced a downstream record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffectBranch {
    SalesOrderSubmitted,
    ClaimSubmitted,
    Both,
    Neither,
}

impl SideEffectBranch {
    pub fn from_submissions(sales_order: bool, claim: bool) -> Self {
        match (sales_order, claim) {
            (true, true) => SideEffectBranch::Both,
            (true, false) => SideEffectBranch::SalesOrderSubmitted,
            (false, true) => SideEffectBranch::ClaimSubmitted,
            (false, false) => SideEffectBranch::Neither,
        }
    }
}

impl fmt::Display for SideEffectBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SideEffectBranch::SalesOrderSubmitted => "sales_order_submitted",
            SideEffectBranch::ClaimSubmitted => "claim_submitted",
            SideEffectBranch::Both => "both",
            SideEffectBranch::Neither => "neither",
        };
        f.write_str(s)
    }
}

/// Stage of one assessment run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "stage", content = "branch", rename_all = "snake_case")]
pub enum AssessmentStage {
    Completed,
    CoverageChecked,
    Calculated,
    Classified,
    SideEffectsDone(SideEffectBranch),
    Recorded,
}

impl AssessmentStage {
    /// Whether `next` directly follows this stage
    pub fn can_transition_to(&self, next: &AssessmentStage) -> bool {
        use AssessmentStage::*;
        matches!(
            (self, next),
            (Completed, CoverageChecked)
                | (CoverageChecked, Calculated)
                | (Calculated, Classified)
                | (Classified, SideEffectsDone(_))
                | (SideEffectsDone(_), Recorded)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssessmentStage::Recorded)
    }
}

impl fmt::Display for AssessmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssessmentStage::Completed => f.write_str("completed"),
            AssessmentStage::CoverageChecked => f.write_str("coverage_checked"),
            AssessmentStage::Calculated => f.write_str("calculated"),
            AssessmentStage::Classified => f.write_str("classified"),
            AssessmentStage::SideEffectsDone(branch) => write!(f, "side_effects_done({})", branch),
            AssessmentStage::Recorded => f.write_str("recorded"),
        }
    }
}

/// Stage transition with its timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    pub stage: AssessmentStage,
    pub at: DateTime<Utc>,
}

/// One attempt at assessing a work order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRun {
    pub work_order_id: WorkOrderId,
    pub idempotency_key: IdempotencyKey,
    stage: AssessmentStage,
    history: Vec<StageTransition>,
}

impl AssessmentRun {
    /// Starts a run for a completed work order
    pub fn start(idempotency_key: IdempotencyKey) -> Self {
        Self {
            work_order_id: idempotency_key.work_order_id(),
            idempotency_key,
            stage: AssessmentStage::Completed,
            history: vec![StageTransition {
                stage: AssessmentStage::Completed,
                at: Utc::now(),
            }],
        }
    }

    pub fn stage(&self) -> AssessmentStage {
        self.stage
    }

    pub fn history(&self) -> &[StageTransition] {
        &self.history
    }

    /// Moves to the next stage
    ///
    /// # Errors
    ///
    /// `BillingError::InvalidStageTransition` if `next` does not directly
    /// follow the current stage.
    pub fn advance(&mut self, next: AssessmentStage) -> Result<(), BillingError> {
        if !self.stage.can_transition_to(&next) {
            return Err(BillingError::InvalidStageTransition {
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        self.history.push(StageTransition {
            stage: next,
            at: Utc::now(),
        });
        Ok(())
    }
}
