//! Tests for the work order aggregate

use rust_decimal_macros::dec;

use core_kernel::{
    Currency, CustomerId, Money, PartId, ProductId, ServiceRequestId, TechnicianId,
    WarrantyCardId,
};
use domain_workorder::{
    CostCategory, CostEntry, CustomerRef, LaborEntry, PartsEntry, ProductRef, ServiceEntry,
    WorkOrder, WorkOrderError, WorkOrderStatus,
};

fn usd(amount: rust_decimal::Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

fn create_test_order() -> WorkOrder {
    WorkOrder::new(
        "WO-2024-0117",
        ServiceRequestId::new_v7(),
        CustomerRef {
            id: CustomerId::new_v7(),
            name: "Budi Santoso".to_string(),
        },
        ProductRef {
            id: ProductId::new_v7(),
            name: "Front-load washer 8kg".to_string(),
            serial_number: Some("WM8-559210".to_string()),
        },
        Currency::USD,
    )
    .with_warranty_card(WarrantyCardId::new_v7())
}

mod lifecycle {
    use super::*;

    #[test]
    fn test_new_order_is_in_progress_and_empty() {
        let order = create_test_order();
        assert_eq!(order.status, WorkOrderStatus::InProgress);
        assert!(order.is_empty());
        assert!(order.completed_at.is_none());
        assert!(order.warranty_card_id.is_some());
    }

    #[test]
    fn test_complete_sets_timestamp() {
        let mut order = create_test_order();
        order.complete().unwrap();
        assert!(order.is_completed());
        assert!(order.completed_at.is_some());
        assert!(order.ensure_completed().is_ok());
    }

    #[test]
    fn test_completed_order_is_read_only() {
        let mut order = create_test_order();
        order.complete().unwrap();

        let entry = ServiceEntry::new("Cleaning", usd(dec!(10)), "maintenance", false).unwrap();
        let result = order.add_service(entry);
        assert!(matches!(result, Err(WorkOrderError::InvalidStatus { .. })));
    }

    #[test]
    fn test_in_progress_order_is_not_assessable() {
        let order = create_test_order();
        let err = order.ensure_completed().unwrap_err();
        assert!(err.to_string().contains("in_progress"));
    }
}

mod entries {
    use super::*;

    #[test]
    fn test_entries_iterate_labor_parts_services_in_order() {
        let mut order = create_test_order();
        order
            .add_service(ServiceEntry::new("Pickup", usd(dec!(15)), "logistics", false).unwrap())
            .unwrap();
        order
            .add_part(PartsEntry::new(PartId::new(), "Drain pump", 1, usd(dec!(45)), "plumbing", true).unwrap())
            .unwrap();
        order
            .add_labor(
                LaborEntry::new("Replace pump", TechnicianId::new(), dec!(1.5), usd(dec!(40)), "repair", true)
                    .unwrap(),
            )
            .unwrap();

        let categories: Vec<CostCategory> = order.entries().map(|e| e.cost_category()).collect();
        assert_eq!(
            categories,
            vec![CostCategory::Labor, CostCategory::Parts, CostCategory::Services]
        );
        assert_eq!(order.gross_cost().unwrap().amount(), dec!(120));
    }

    #[test]
    fn test_ensure_valid_collects_all_errors() {
        let mut order = create_test_order();
        let mut part = PartsEntry::new(PartId::new(), "Door seal", 2, usd(dec!(12)), "body", true).unwrap();
        part.total_cost = usd(dec!(1));
        order.parts.push(part);
        order.services.push(ServiceEntry {
            id: uuid::Uuid::new_v4(),
            name: " ".to_string(),
            cost: usd(dec!(-1)),
            category: "misc".to_string(),
            warranty_eligible: false,
        });

        let err = order.ensure_valid().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("parts[0]"));
        assert!(message.contains("services[0]"));
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&WorkOrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_work_order_deserializes_from_json() {
        let order = create_test_order();
        let json = serde_json::to_value(&order).unwrap();
        let back: WorkOrder = serde_json::from_value(json).unwrap();
        assert_eq!(back.work_order_number, "WO-2024-0117");
        assert_eq!(back.customer.name, "Budi Santoso");
    }
}
