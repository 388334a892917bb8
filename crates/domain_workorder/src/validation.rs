//! Work order validation rules
//!
//! Entry constructors already refuse negative inputs, but work orders also
//! arrive deserialized from other systems, so every rule is checked again
//! here before an order is billed.
//!
//! # Rules
//!
//! ## Errors
//! - Labor duration, hourly rate, unit cost and flat cost must not be negative
//! - Every amount must be in the work order's currency
//! - Stored totals must equal `duration × rate` / `quantity × unit cost`
//! - Entry totals and the gross cost must fit in a `Money` amount
//! - Entry descriptions must not be blank
//!
//! ## Warnings
//! - Work order has no entries
//! - Entry has zero cost

use rust_decimal::Decimal;

use core_kernel::{Currency, Money};
use crate::entry::{CostEntry, LaborEntry, PartsEntry, ServiceEntry};
use crate::work_order::WorkOrder;

/// Result of work order validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the work order is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal issues)
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for work orders about to be assessed
pub struct WorkOrderValidator;

impl WorkOrderValidator {
    /// Validates every entry of a work order
    pub fn validate(work_order: &WorkOrder) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if work_order.is_empty() {
            result.add_warning(format!(
                "Work order {} has no labor, parts or service entries",
                work_order.work_order_number
            ));
        }

        for (i, entry) in work_order.labor.iter().enumerate() {
            Self::validate_labor(i, entry, work_order.currency, &mut result);
        }
        for (i, entry) in work_order.parts.iter().enumerate() {
            Self::validate_part(i, entry, work_order.currency, &mut result);
        }
        for (i, entry) in work_order.services.iter().enumerate() {
            Self::validate_service(i, entry, work_order.currency, &mut result);
        }

        if result.is_valid && work_order.gross_cost().is_err() {
            result.add_error(format!(
                "Work order {}: gross cost exceeds the supported amount range",
                work_order.work_order_number
            ));
        }

        result
    }

    fn validate_labor(index: usize, entry: &LaborEntry, currency: Currency, result: &mut ValidationResult) {
        let label = format!("labor[{}]", index);

        if entry.duration_hours < Decimal::ZERO {
            result.add_error(format!("{}: duration must not be negative ({})", label, entry.duration_hours));
        }
        Self::check_amount(&label, "hourly rate", &entry.hourly_rate, currency, result);
        Self::check_amount(&label, "total cost", &entry.total_cost, currency, result);

        if entry.hourly_rate.currency() == currency {
            match entry.expected_total() {
                Ok(expected) if expected != entry.total_cost => result.add_error(format!(
                    "{}: total cost {} does not equal duration × rate {}",
                    label, entry.total_cost, expected
                )),
                Ok(_) => {}
                Err(_) => result.add_error(format!(
                    "{}: duration × rate exceeds the supported amount range",
                    label
                )),
            }
        }
        Self::check_common(&label, entry, result);
    }

    fn validate_part(index: usize, entry: &PartsEntry, currency: Currency, result: &mut ValidationResult) {
        let label = format!("parts[{}]", index);

        Self::check_amount(&label, "unit cost", &entry.unit_cost, currency, result);
        Self::check_amount(&label, "total cost", &entry.total_cost, currency, result);

        if entry.unit_cost.currency() == currency {
            match entry.expected_total() {
                Ok(expected) if expected != entry.total_cost => result.add_error(format!(
                    "{}: total cost {} does not equal quantity × unit cost {}",
                    label, entry.total_cost, expected
                )),
                Ok(_) => {}
                Err(_) => result.add_error(format!(
                    "{}: quantity × unit cost exceeds the supported amount range",
                    label
                )),
            }
        }
        Self::check_common(&label, entry, result);
    }

    fn validate_service(index: usize, entry: &ServiceEntry, currency: Currency, result: &mut ValidationResult) {
        let label = format!("services[{}]", index);

        Self::check_amount(&label, "cost", &entry.cost, currency, result);
        Self::check_common(&label, entry, result);
    }

    fn check_amount(label: &str, field: &str, amount: &Money, currency: Currency, result: &mut ValidationResult) {
        if amount.is_negative() {
            result.add_error(format!("{}: {} must not be negative ({})", label, field, amount));
        }
        if amount.currency() != currency {
            result.add_error(format!(
                "{}: {} is in {}, work order is in {}",
                label,
                field,
                amount.currency(),
                currency
            ));
        }
    }

    fn check_common(label: &str, entry: &dyn CostEntry, result: &mut ValidationResult) {
        if entry.description().trim().is_empty() {
            result.add_error(format!("{}: description must not be blank", label));
        }
        if entry.total_cost().is_zero() {
            result.add_warning(format!("{}: '{}' has zero cost", label, entry.description()));
        }
    }
}
