//! Property-Based Test Generators
//!
//! Proptest strategies that produce well-formed work orders: non-negative
//! amounts, a single currency, totals consistent with their factors.

use core_kernel::{Currency, Money, PartId, TechnicianId};
use domain_workorder::{
    CoverageVerdict, LaborEntry, PartsEntry, ServiceEntry, WorkOrder,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::WorkOrderFixtures;

/// Strategy for generating Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::IDR),
    ]
}

/// Non-negative amount in minor units, up to 100 000.00
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..10_000_000i64
}

/// Hours worked in quarter-hour steps, up to 40h
pub fn hours_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=160u32).prop_map(|quarters| Decimal::new(quarters as i64 * 25, 2))
}

pub fn labor_entry_strategy(currency: Currency) -> impl Strategy<Value = LaborEntry> {
    (hours_strategy(), amount_minor_strategy(), any::<bool>()).prop_map(move |(hours, rate, eligible)| {
        LaborEntry::new(
            "Generated labor",
            TechnicianId::new(),
            hours,
            Money::from_minor(rate, currency),
            "repair",
            eligible,
        )
        .expect("generated labor entry is non-negative")
    })
}

pub fn parts_entry_strategy(currency: Currency) -> impl Strategy<Value = PartsEntry> {
    (0u32..20u32, amount_minor_strategy(), any::<bool>()).prop_map(move |(qty, cost, eligible)| {
        PartsEntry::new(
            PartId::new(),
            "Generated part",
            qty,
            Money::from_minor(cost, currency),
            "spares",
            eligible,
        )
        .expect("generated parts entry is non-negative")
    })
}

pub fn service_entry_strategy(currency: Currency) -> impl Strategy<Value = ServiceEntry> {
    (amount_minor_strategy(), any::<bool>()).prop_map(move |(cost, eligible)| {
        ServiceEntry::new(
            "Generated service",
            Money::from_minor(cost, currency),
            "visit",
            eligible,
        )
        .expect("generated service entry is non-negative")
    })
}

/// Completed work order with up to five entries per category
pub fn work_order_strategy() -> impl Strategy<Value = WorkOrder> {
    currency_strategy().prop_flat_map(|currency| {
        (
            prop::collection::vec(labor_entry_strategy(currency), 0..5),
            prop::collection::vec(parts_entry_strategy(currency), 0..5),
            prop::collection::vec(service_entry_strategy(currency), 0..5),
            any::<bool>(),
        )
            .prop_map(move |(labor, parts, services, has_card)| {
                let mut order = WorkOrder::new(
                    "WO-PROP",
                    WorkOrderFixtures::service_request_id(),
                    WorkOrderFixtures::customer(),
                    WorkOrderFixtures::product(),
                    currency,
                );
                if has_card {
                    order.warranty_card_id = Some(core_kernel::WarrantyCardId::new());
                }
                order.labor = labor;
                order.parts = parts;
                order.services = services;
                order.complete().expect("generated order is in progress");
                order
            })
    })
}

pub fn coverage_verdict_strategy() -> impl Strategy<Value = CoverageVerdict> {
    (any::<bool>(), any::<bool>(), any::<bool>())
        .prop_map(|(overall, labor, parts)| CoverageVerdict::new(overall, labor, parts))
}
