//! Warranty/billable cost split
//!
//! # Algorithm
//!
//! Each category's entries are summed into a total. An entry's cost counts
//! as warranty-covered only when **both** the category-level coverage flag
//! from the verdict and the entry's own eligibility flag are set; every
//! other cost is billable. The three category splits are then summed into
//! the aggregate.
//!
//! Services have no category flag of their own and use the labor flag.
//!
//! Every entry cost lands in exactly one bucket, so
//! `total == warranty_covered + billable` holds for each category and for
//! the aggregate.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, MoneyError};
use domain_workorder::{CostCategory, CostEntry, CoverageVerdict, WorkOrder};

use crate::error::BillingError;

/// Total, covered and billable cost of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySplit {
    pub total: Money,
    pub warranty_covered: Money,
    pub billable: Money,
}

impl CategorySplit {
    pub fn zero(currency: Currency) -> Self {
        Self {
            total: Money::zero(currency),
            warranty_covered: Money::zero(currency),
            billable: Money::zero(currency),
        }
    }

    /// Adds another split bucket by bucket
    pub fn checked_add(&self, other: &CategorySplit) -> Result<CategorySplit, MoneyError> {
        Ok(CategorySplit {
            total: self.total.checked_add(&other.total)?,
            warranty_covered: self.warranty_covered.checked_add(&other.warranty_covered)?,
            billable: self.billable.checked_add(&other.billable)?,
        })
    }

    /// True when covered and billable add up to the total
    pub fn is_balanced(&self) -> bool {
        self.warranty_covered
            .checked_add(&self.billable)
            .map(|sum| sum == self.total)
            .unwrap_or(false)
    }
}

/// Splits the entries of one category into covered and billable cost
///
/// An empty slice yields an all-zero split.
pub fn split_category<E: CostEntry>(
    entries: &[E],
    category_covered: bool,
    currency: Currency,
) -> Result<CategorySplit, MoneyError> {
    entries.iter().try_fold(CategorySplit::zero(currency), |mut split, entry| {
        let cost = entry.total_cost();
        split.total = split.total.checked_add(&cost)?;
        if category_covered && entry.is_warranty_eligible() {
            split.warranty_covered = split.warranty_covered.checked_add(&cost)?;
        } else {
            split.billable = split.billable.checked_add(&cost)?;
        }
        Ok(split)
    })
}

/// Per-category splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub labor: CategorySplit,
    pub parts: CategorySplit,
    pub services: CategorySplit,
}

impl CostBreakdown {
    pub fn get(&self, category: CostCategory) -> &CategorySplit {
        match category {
            CostCategory::Labor => &self.labor,
            CostCategory::Parts => &self.parts,
            CostCategory::Services => &self.services,
        }
    }
}

/// Aggregate cost split of a work order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCalculation {
    pub currency: Currency,
    pub total: Money,
    pub warranty_covered: Money,
    pub billable: Money,
    pub breakdown: CostBreakdown,
}

impl BillingCalculation {
    /// Aggregate view as a single split
    pub fn aggregate(&self) -> CategorySplit {
        CategorySplit {
            total: self.total,
            warranty_covered: self.warranty_covered,
            billable: self.billable,
        }
    }

    /// True when the aggregate and every category balance
    pub fn is_balanced(&self) -> bool {
        self.aggregate().is_balanced()
            && CostCategory::ALL
                .iter()
                .all(|c| self.breakdown.get(*c).is_balanced())
    }
}

/// Computes the warranty/billable split of a work order
///
/// Pure: the same work order and verdict always produce the same result.
///
/// # Errors
///
/// `BillingError::Validation` if the work order fails validation (negative
/// or inconsistent amounts, foreign currency).
pub fn calculate(
    work_order: &WorkOrder,
    verdict: &CoverageVerdict,
) -> Result<BillingCalculation, BillingError> {
    work_order.ensure_valid()?;

    let currency = work_order.currency;
    let breakdown = CostBreakdown {
        labor: split_category(&work_order.labor, verdict.covers(CostCategory::Labor), currency)?,
        parts: split_category(&work_order.parts, verdict.covers(CostCategory::Parts), currency)?,
        services: split_category(
            &work_order.services,
            verdict.covers(CostCategory::Services),
            currency,
        )?,
    };

    let aggregate = breakdown
        .labor
        .checked_add(&breakdown.parts)?
        .checked_add(&breakdown.services)?;

    Ok(BillingCalculation {
        currency,
        total: aggregate.total,
        warranty_covered: aggregate.warranty_covered,
        billable: aggregate.billable,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{PartId, TechnicianId};
    use domain_workorder::{LaborEntry, PartsEntry, ServiceEntry};
    use rust_decimal_macros::dec;

    fn usd(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    #[test]
    fn test_covered_labor_entry() {
        let entries = vec![LaborEntry::new(
            "Replace compressor",
            TechnicianId::new(),
            dec!(2),
            usd(dec!(50)),
            "repair",
            true,
        )
        .unwrap()];

        let split = split_category(&entries, true, Currency::USD).unwrap();
        assert_eq!(split.total, usd(dec!(100)));
        assert_eq!(split.warranty_covered, usd(dec!(100)));
        assert_eq!(split.billable, usd(dec!(0)));
    }

    #[test]
    fn test_entry_flag_overrides_category_flag() {
        let entries = vec![PartsEntry::new(
            PartId::new(),
            "Door gasket",
            3,
            usd(dec!(20)),
            "body",
            false,
        )
        .unwrap()];

        let split = split_category(&entries, true, Currency::USD).unwrap();
        assert_eq!(split.total, usd(dec!(60)));
        assert_eq!(split.warranty_covered, usd(dec!(0)));
        assert_eq!(split.billable, usd(dec!(60)));
    }

    #[test]
    fn test_uncovered_category_bills_eligible_entries() {
        let entries = vec![ServiceEntry::new("Site visit", usd(dec!(35)), "visit", true).unwrap()];

        let split = split_category(&entries, false, Currency::USD).unwrap();
        assert_eq!(split.billable, usd(dec!(35)));
        assert!(split.warranty_covered.is_zero());
    }

    #[test]
    fn test_empty_category_is_zero() {
        let entries: Vec<ServiceEntry> = Vec::new();
        let split = split_category(&entries, true, Currency::EUR).unwrap();
        assert_eq!(split, CategorySplit::zero(Currency::EUR));
        assert!(split.is_balanced());
    }
}
