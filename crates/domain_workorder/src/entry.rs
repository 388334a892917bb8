//! Line entries recorded on a work order
//!
//! Totals are derived values. Constructors compute them and the setters for
//! a total's factors recompute them, so a well-formed entry always satisfies
//! `total_cost == factor × factor`. A product too large for `Money` is an
//! error, never a wrapped or saturated total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use core_kernel::{Money, MoneyError, PartId, TechnicianId};
use crate::error::WorkOrderError;

/// The three cost categories aggregated by billing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Labor,
    Parts,
    Services,
}

impl CostCategory {
    pub const ALL: [CostCategory; 3] = [CostCategory::Labor, CostCategory::Parts, CostCategory::Services];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Labor => "labor",
            CostCategory::Parts => "parts",
            CostCategory::Services => "services",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common view over labor, parts and service entries
pub trait CostEntry {
    /// Category the entry's cost is aggregated under
    fn cost_category(&self) -> CostCategory;

    /// Human-readable description used on billing documents
    fn description(&self) -> &str;

    /// Total cost of the entry
    fn total_cost(&self) -> Money;

    /// Whether this individual entry is eligible for warranty coverage
    fn is_warranty_eligible(&self) -> bool;
}

/// Time a technician spent on the work order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborEntry {
    pub id: Uuid,
    pub description: String,
    pub technician_id: TechnicianId,
    /// Hours worked
    #[serde(with = "rust_decimal::serde::float")]
    pub duration_hours: Decimal,
    pub hourly_rate: Money,
    pub total_cost: Money,
    /// Free-form category tag (e.g. "diagnosis", "repair")
    pub category: String,
    pub warranty_eligible: bool,
}

impl LaborEntry {
    /// Creates a labor entry, computing its total from duration and rate
    pub fn new(
        description: impl Into<String>,
        technician_id: TechnicianId,
        duration_hours: Decimal,
        hourly_rate: Money,
        category: impl Into<String>,
        warranty_eligible: bool,
    ) -> Result<Self, WorkOrderError> {
        check_duration(duration_hours)?;
        hourly_rate.ensure_non_negative()?;

        Ok(Self {
            id: Uuid::new_v4(),
            description: description.into(),
            technician_id,
            duration_hours,
            hourly_rate,
            total_cost: hourly_rate.multiply(duration_hours)?,
            category: category.into(),
            warranty_eligible,
        })
    }

    /// Updates the hours worked and recomputes the total
    pub fn set_duration(&mut self, duration_hours: Decimal) -> Result<(), WorkOrderError> {
        check_duration(duration_hours)?;
        self.total_cost = self.hourly_rate.multiply(duration_hours)?;
        self.duration_hours = duration_hours;
        Ok(())
    }

    /// Updates the hourly rate and recomputes the total
    pub fn set_hourly_rate(&mut self, hourly_rate: Money) -> Result<(), WorkOrderError> {
        hourly_rate.ensure_non_negative()?;
        self.total_cost = hourly_rate.multiply(self.duration_hours)?;
        self.hourly_rate = hourly_rate;
        Ok(())
    }

    /// The total implied by the current duration and rate
    pub fn expected_total(&self) -> Result<Money, MoneyError> {
        self.hourly_rate.multiply(self.duration_hours)
    }
}

impl CostEntry for LaborEntry {
    fn cost_category(&self) -> CostCategory {
        CostCategory::Labor
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn total_cost(&self) -> Money {
        self.total_cost
    }

    fn is_warranty_eligible(&self) -> bool {
        self.warranty_eligible
    }
}

/// A part consumed by the repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartsEntry {
    pub id: Uuid,
    pub part_id: PartId,
    pub name: String,
    pub quantity: u32,
    pub unit_cost: Money,
    pub total_cost: Money,
    pub category: String,
    pub warranty_eligible: bool,
}

impl PartsEntry {
    /// Creates a parts entry, computing its total from quantity and unit cost
    pub fn new(
        part_id: PartId,
        name: impl Into<String>,
        quantity: u32,
        unit_cost: Money,
        category: impl Into<String>,
        warranty_eligible: bool,
    ) -> Result<Self, WorkOrderError> {
        unit_cost.ensure_non_negative()?;

        Ok(Self {
            id: Uuid::new_v4(),
            part_id,
            name: name.into(),
            quantity,
            unit_cost,
            total_cost: unit_cost.multiply(Decimal::from(quantity))?,
            category: category.into(),
            warranty_eligible,
        })
    }

    /// Updates the quantity and recomputes the total
    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), WorkOrderError> {
        self.total_cost = self.unit_cost.multiply(Decimal::from(quantity))?;
        self.quantity = quantity;
        Ok(())
    }

    /// Updates the unit cost and recomputes the total
    pub fn set_unit_cost(&mut self, unit_cost: Money) -> Result<(), WorkOrderError> {
        unit_cost.ensure_non_negative()?;
        self.total_cost = unit_cost.multiply(Decimal::from(self.quantity))?;
        self.unit_cost = unit_cost;
        Ok(())
    }

    /// The total implied by the current quantity and unit cost
    pub fn expected_total(&self) -> Result<Money, MoneyError> {
        self.unit_cost.multiply(Decimal::from(self.quantity))
    }
}

impl CostEntry for PartsEntry {
    fn cost_category(&self) -> CostCategory {
        CostCategory::Parts
    }

    fn description(&self) -> &str {
        &self.name
    }

    fn total_cost(&self) -> Money {
        self.total_cost
    }

    fn is_warranty_eligible(&self) -> bool {
        self.warranty_eligible
    }
}

/// A flat-priced ancillary service (pickup, cleaning, calibration, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub id: Uuid,
    pub name: String,
    pub cost: Money,
    pub category: String,
    pub warranty_eligible: bool,
}

impl ServiceEntry {
    pub fn new(
        name: impl Into<String>,
        cost: Money,
        category: impl Into<String>,
        warranty_eligible: bool,
    ) -> Result<Self, WorkOrderError> {
        cost.ensure_non_negative()?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cost,
            category: category.into(),
            warranty_eligible,
        })
    }
}

impl CostEntry for ServiceEntry {
    fn cost_category(&self) -> CostCategory {
        CostCategory::Services
    }

    fn description(&self) -> &str {
        &self.name
    }

    fn total_cost(&self) -> Money {
        self.cost
    }

    fn is_warranty_eligible(&self) -> bool {
        self.warranty_eligible
    }
}

fn check_duration(duration_hours: Decimal) -> Result<(), WorkOrderError> {
    if duration_hours.is_sign_negative() && !duration_hours.is_zero() {
        return Err(WorkOrderError::invalid_entry(format!(
            "Labor duration must not be negative, got {} hours",
            duration_hours
        )));
    }
    Ok(())
}
