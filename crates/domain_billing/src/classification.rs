//! Billing status classification

use serde::{Deserialize, Serialize};
use std::fmt;

use domain_workorder::CoverageVerdict;

use crate::calculation::BillingCalculation;

/// Overall billing outcome of a work order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    /// Everything is covered by warranty
    WarrantyCovered,
    /// Everything is owed by the customer
    Billable,
    /// Part covered, part billable, or the verdict and the split disagree
    Mixed,
}

impl BillingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingStatus::WarrantyCovered => "warranty_covered",
            BillingStatus::Billable => "billable",
            BillingStatus::Mixed => "mixed",
        }
    }

    /// Whether uncovered cost should be turned into a sales order
    pub fn has_billable_work(&self) -> bool {
        matches!(self, BillingStatus::Billable | BillingStatus::Mixed)
    }

    /// Whether covered cost should be filed as a warranty claim
    pub fn has_covered_work(&self) -> bool {
        matches!(self, BillingStatus::WarrantyCovered | BillingStatus::Mixed)
    }
}

impl fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconciles the overall verdict with the computed split
///
/// Rules, first match wins:
/// 1. covered overall and nothing billable: `WarrantyCovered`
/// 2. not covered overall and nothing covered: `Billable`
/// 3. otherwise `Mixed`
pub fn classify(verdict: &CoverageVerdict, calculation: &BillingCalculation) -> BillingStatus {
    if verdict.overall && calculation.billable.is_zero() {
        BillingStatus::WarrantyCovered
    } else if !verdict.overall && calculation.warranty_covered.is_zero() {
        BillingStatus::Billable
    } else {
        BillingStatus::Mixed
    }
}
