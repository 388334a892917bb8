//! Test Data Builders
//!
//! Tests name only the entries that matter; everything else gets a
//! sensible default.

use core_kernel::{Currency, Money, WarrantyCardId};
use domain_workorder::WorkOrder;
use rust_decimal::Decimal;

use crate::fixtures::WorkOrderFixtures;

/// Builder for work orders
///
/// Built orders are completed unless [`in_progress`](Self::in_progress) is
/// called, and carry no warranty card unless one is added.
pub struct WorkOrderBuilder {
    number: String,
    currency: Currency,
    warranty_card_id: Option<WarrantyCardId>,
    labor: Vec<(Decimal, Decimal, bool)>,
    parts: Vec<(u32, Decimal, bool)>,
    services: Vec<(Decimal, bool)>,
    completed: bool,
}

impl Default for WorkOrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkOrderBuilder {
    pub fn new() -> Self {
        Self {
            number: "WO-2024-0001".to_string(),
            currency: Currency::USD,
            warranty_card_id: None,
            labor: Vec::new(),
            parts: Vec::new(),
            services: Vec::new(),
            completed: true,
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Attaches a random warranty card
    pub fn with_warranty_card(self) -> Self {
        self.with_warranty_card_id(WarrantyCardId::new())
    }

    pub fn with_warranty_card_id(mut self, id: WarrantyCardId) -> Self {
        self.warranty_card_id = Some(id);
        self
    }

    /// Adds a labor entry of `hours` at `rate` per hour
    pub fn with_labor(mut self, hours: Decimal, rate: Decimal, eligible: bool) -> Self {
        self.labor.push((hours, rate, eligible));
        self
    }

    /// Adds a parts entry of `quantity` units at `unit_cost`
    pub fn with_part(mut self, quantity: u32, unit_cost: Decimal, eligible: bool) -> Self {
        self.parts.push((quantity, unit_cost, eligible));
        self
    }

    pub fn with_service(mut self, cost: Decimal, eligible: bool) -> Self {
        self.services.push((cost, eligible));
        self
    }

    /// Leaves the built order in progress
    pub fn in_progress(mut self) -> Self {
        self.completed = false;
        self
    }

    pub fn build(self) -> WorkOrder {
        let money = |amount| Money::new(amount, self.currency);
        let mut order = WorkOrder::new(
            self.number.clone(),
            WorkOrderFixtures::service_request_id(),
            WorkOrderFixtures::customer(),
            WorkOrderFixtures::product(),
            self.currency,
        );
        order.warranty_card_id = self.warranty_card_id;

        for (hours, rate, eligible) in &self.labor {
            order
                .add_labor(WorkOrderFixtures::labor(*hours, money(*rate), *eligible))
                .expect("builder order is in progress");
        }
        for (quantity, unit_cost, eligible) in &self.parts {
            order
                .add_part(WorkOrderFixtures::part(*quantity, money(*unit_cost), *eligible))
                .expect("builder order is in progress");
        }
        for (cost, eligible) in &self.services {
            order
                .add_service(WorkOrderFixtures::service(money(*cost), *eligible))
                .expect("builder order is in progress");
        }

        if self.completed {
            order.complete().expect("builder order is in progress");
        }
        order
    }
}
