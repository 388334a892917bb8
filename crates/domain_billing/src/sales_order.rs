//! Sales order generation for billable work
//!
//! Line items are selected by each entry's own eligibility flag only. The
//! category-level coverage flag that [`calculate`](crate::calculate) applies
//! is ignored here, so an ineligible entry in a covered category appears on
//! the sales order, and an eligible entry in an uncovered category does
//! not. The two rules are kept apart on purpose until product owners decide
//! which one is right; tests pin both.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::CustomerId;
use domain_workorder::{LaborEntry, PartsEntry, ServiceEntry, WorkOrder};

use crate::calculation::BillingCalculation;

/// What a sales order line bills for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderItemType {
    Labor,
    Part,
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderType {
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderStatus {
    Pending,
}

/// One billable line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub product_name: String,
    /// Hours for labor, units for parts, 1 for services
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub category: String,
    pub item_type: SalesOrderItemType,
}

impl From<&LaborEntry> for SalesOrderItem {
    fn from(entry: &LaborEntry) -> Self {
        Self {
            product_id: None,
            product_name: entry.description.clone(),
            quantity: entry.duration_hours,
            unit_price: entry.hourly_rate.round_to_currency().amount(),
            total_price: entry.total_cost.round_to_currency().amount(),
            category: entry.category.clone(),
            item_type: SalesOrderItemType::Labor,
        }
    }
}

impl From<&PartsEntry> for SalesOrderItem {
    fn from(entry: &PartsEntry) -> Self {
        Self {
            product_id: Some(entry.part_id.to_string()),
            product_name: entry.name.clone(),
            quantity: Decimal::from(entry.quantity),
            unit_price: entry.unit_cost.round_to_currency().amount(),
            total_price: entry.total_cost.round_to_currency().amount(),
            category: entry.category.clone(),
            item_type: SalesOrderItemType::Part,
        }
    }
}

impl From<&ServiceEntry> for SalesOrderItem {
    fn from(entry: &ServiceEntry) -> Self {
        let price = entry.cost.round_to_currency().amount();
        Self {
            product_id: None,
            product_name: entry.name.clone(),
            quantity: Decimal::ONE,
            unit_price: price,
            total_price: price,
            category: entry.category.clone(),
            item_type: SalesOrderItemType::Service,
        }
    }
}

/// Body sent to the sales-order service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderRequest {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub items: Vec<SalesOrderItem>,
    pub order_type: SalesOrderType,
    pub status: SalesOrderStatus,
    pub notes: String,
    pub created_by: String,
}

impl SalesOrderRequest {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals, `None` if it overflows
    pub fn items_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total_price))
    }
}

/// Projects the entries not eligible for warranty into a sales order
///
/// Labor lines come first, then parts, then services, each in work order
/// order. Pure; submission is up to the caller.
pub fn generate_sales_order(
    work_order: &WorkOrder,
    calculation: &BillingCalculation,
    created_by: &str,
) -> SalesOrderRequest {
    let labor = work_order
        .labor
        .iter()
        .filter(|e| !e.warranty_eligible)
        .map(SalesOrderItem::from);
    let parts = work_order
        .parts
        .iter()
        .filter(|e| !e.warranty_eligible)
        .map(SalesOrderItem::from);
    let services = work_order
        .services
        .iter()
        .filter(|e| !e.warranty_eligible)
        .map(SalesOrderItem::from);

    SalesOrderRequest {
        customer_id: work_order.customer.id,
        customer_name: work_order.customer.name.clone(),
        items: labor.chain(parts).chain(services).collect(),
        order_type: SalesOrderType::Service,
        status: SalesOrderStatus::Pending,
        notes: format!(
            "Billable work for work order {} ({}); assessed billable amount {}",
            work_order.work_order_number,
            work_order.product.name,
            calculation.billable.round_to_currency()
        ),
        created_by: created_by.to_string(),
    }
}
