//! Warranty claim construction for covered work

use domain_claims::{ClaimError, ClaimPolicy, WarrantyClaimRequest};
use domain_workorder::WorkOrder;

use crate::calculation::BillingCalculation;

/// Builds the claim for a work order's warranty-covered cost
///
/// Type, priority and severity come from `policy`, not from the work
/// performed. The notes carry the work order number and the covered amount
/// so the claim can be traced back to its assessment.
///
/// # Errors
///
/// `ClaimError::MissingWarrantyCard` if the work order has no card.
pub fn build_claim(
    work_order: &WorkOrder,
    calculation: &BillingCalculation,
    policy: ClaimPolicy,
    reported_by: &str,
) -> Result<WarrantyClaimRequest, ClaimError> {
    let card = work_order
        .warranty_card_id
        .ok_or_else(|| ClaimError::MissingWarrantyCard(work_order.work_order_number.clone()))?;

    let product = match &work_order.product.serial_number {
        Some(serial) => format!("{} (S/N {})", work_order.product.name, serial),
        None => work_order.product.name.clone(),
    };

    WarrantyClaimRequest::new(
        card,
        format!("Warranty repair of {} under work order {}", product, work_order.work_order_number),
        format!(
            "Work order {}: warranty-covered amount {} of {} total",
            work_order.work_order_number,
            calculation.warranty_covered.round_to_currency(),
            calculation.total.round_to_currency()
        ),
        reported_by,
        policy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calculate;
    use core_kernel::{Currency, CustomerId, Money, ProductId, ServiceRequestId, TechnicianId, WarrantyCardId};
    use domain_claims::{ClaimPriority, ClaimSeverity, ClaimType};
    use domain_workorder::{CoverageVerdict, CustomerRef, LaborEntry, ProductRef};
    use rust_decimal_macros::dec;

    fn order(card: Option<WarrantyCardId>) -> WorkOrder {
        let mut order = WorkOrder::new(
            "WO-2024-0300",
            ServiceRequestId::new(),
            CustomerRef { id: CustomerId::new(), name: "Rina Wijaya".to_string() },
            ProductRef {
                id: ProductId::new(),
                name: "Refrigerator 2-door".to_string(),
                serial_number: Some("RF-20931".to_string()),
            },
            Currency::USD,
        );
        order.warranty_card_id = card;
        order
            .add_labor(
                LaborEntry::new(
                    "Replace thermostat",
                    TechnicianId::new(),
                    dec!(1.5),
                    Money::new(dec!(70), Currency::USD),
                    "repair",
                    true,
                )
                .unwrap(),
            )
            .unwrap();
        order
    }

    #[test]
    fn test_claim_carries_card_policy_and_amount() {
        let card = WarrantyCardId::new();
        let order = order(Some(card));
        let calc = calculate(&order, &CoverageVerdict::fully_covered()).unwrap();

        let claim = build_claim(&order, &calc, ClaimPolicy::default(), "svc-advisor-2").unwrap();

        assert_eq!(claim.warranty_card_id, card);
        assert_eq!(claim.claim_type, ClaimType::Repair);
        assert_eq!(claim.priority, ClaimPriority::Medium);
        assert_eq!(claim.severity, ClaimSeverity::Moderate);
        assert!(claim.notes.contains("WO-2024-0300"));
        assert!(claim.notes.contains("105.00"));
        assert!(claim.issue_description.contains("RF-20931"));
    }

    #[test]
    fn test_missing_card_is_an_error() {
        let order = order(None);
        let calc = calculate(&order, &CoverageVerdict::fully_covered()).unwrap();

        let err = build_claim(&order, &calc, ClaimPolicy::default(), "svc-advisor-2").unwrap_err();
        assert!(matches!(err, ClaimError::MissingWarrantyCard(ref n) if n == "WO-2024-0300"));
    }
}
