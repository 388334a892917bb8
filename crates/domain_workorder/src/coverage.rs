//! Warranty coverage verdicts
//!
//! Warranty verification is an external service. It answers, per work
//! order, whether the order is covered overall and whether labor and parts
//! are covered as categories. Services carry no verdict of their own and
//! follow the labor flag.

use serde::{Deserialize, Serialize};

use core_kernel::{WarrantyCardId, WorkOrderId};
use crate::entry::CostCategory;

/// Category-level coverage decision for one work order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageVerdict {
    /// Overall coverage decision
    pub overall: bool,
    /// Labor category covered
    pub labor: bool,
    /// Parts category covered
    pub parts: bool,
}

impl CoverageVerdict {
    pub fn new(overall: bool, labor: bool, parts: bool) -> Self {
        Self { overall, labor, parts }
    }

    /// Verdict used when the order has no warranty card to verify
    pub fn not_covered() -> Self {
        Self::default()
    }

    /// Everything covered
    pub fn fully_covered() -> Self {
        Self::new(true, true, true)
    }

    /// Coverage flag applied to a cost category
    pub fn covers(&self, category: CostCategory) -> bool {
        match category {
            CostCategory::Labor => self.labor,
            CostCategory::Parts => self.parts,
            // no separate verdict exists for services
            CostCategory::Services => self.labor,
        }
    }
}

/// Body sent to the warranty verification service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageCheckRequest {
    pub work_order_id: WorkOrderId,
    pub warranty_card_id: WarrantyCardId,
}

/// Category flags as returned by warranty verification
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CoverageDetails {
    #[serde(default)]
    pub labor: bool,
    #[serde(default)]
    pub parts: bool,
}

/// Response of the warranty verification service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageCheckResponse {
    pub is_warranty_covered: bool,
    #[serde(default)]
    pub coverage_details: CoverageDetails,
}

impl From<CoverageCheckResponse> for CoverageVerdict {
    fn from(response: CoverageCheckResponse) -> Self {
        CoverageVerdict::new(
            response.is_warranty_covered,
            response.coverage_details.labor,
            response.coverage_details.parts,
        )
    }
}
