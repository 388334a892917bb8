//! Warranty claim request

use serde::{Deserialize, Serialize};

use core_kernel::WarrantyCardId;
use crate::error::ClaimError;

/// Kind of claim filed against a warranty card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Repair,
    Replacement,
    Refund,
}

/// Handling priority requested for the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Severity of the defect being claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimSeverity {
    Minor,
    Moderate,
    Major,
    Critical,
}

/// Type, priority and severity stamped on every claim the engine files
///
/// These are policy, not something derived from the work performed.
/// Hosts override them through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimPolicy {
    pub claim_type: ClaimType,
    pub priority: ClaimPriority,
    pub severity: ClaimSeverity,
}

impl Default for ClaimPolicy {
    fn default() -> Self {
        Self {
            claim_type: ClaimType::Repair,
            priority: ClaimPriority::Medium,
            severity: ClaimSeverity::Moderate,
        }
    }
}

/// Attachments supporting a claim
///
/// The engine files claims without evidence; the lists exist so the claim
/// service can attach uploads later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEvidence {
    pub photos: Vec<String>,
    pub documents: Vec<String>,
    pub videos: Vec<String>,
}

/// Body sent to the warranty-claim service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyClaimRequest {
    pub warranty_card_id: WarrantyCardId,
    pub issue_description: String,
    pub claim_type: ClaimType,
    pub priority: ClaimPriority,
    pub severity: ClaimSeverity,
    pub reported_by: String,
    pub evidence: ClaimEvidence,
    pub notes: String,
    pub created_by: String,
}

impl WarrantyClaimRequest {
    /// Creates a claim request stamped with the given policy
    pub fn new(
        warranty_card_id: WarrantyCardId,
        issue_description: impl Into<String>,
        notes: impl Into<String>,
        reported_by: impl Into<String>,
        policy: ClaimPolicy,
    ) -> Result<Self, ClaimError> {
        let reported_by = reported_by.into();
        if reported_by.trim().is_empty() {
            return Err(ClaimError::InvalidClaim(
                "reporter identity must not be blank".to_string(),
            ));
        }

        Ok(Self {
            warranty_card_id,
            issue_description: issue_description.into(),
            claim_type: policy.claim_type,
            priority: policy.priority,
            severity: policy.severity,
            created_by: reported_by.clone(),
            reported_by,
            evidence: ClaimEvidence::default(),
            notes: notes.into(),
        })
    }
}
