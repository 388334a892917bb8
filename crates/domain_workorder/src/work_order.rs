//! Work order aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{
    Currency, CustomerId, Money, MoneyError, ProductId, ServiceRequestId, WarrantyCardId,
    WorkOrderId,
};
use crate::entry::{CostEntry, LaborEntry, PartsEntry, ServiceEntry};
use crate::error::WorkOrderError;
use crate::validation::{ValidationResult, WorkOrderValidator};

/// Work order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    /// Technician is still working
    InProgress,
    /// Work has been logged complete and can be assessed
    Completed,
    /// Cancelled before completion
    Cancelled,
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// The customer the work was done for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub id: CustomerId,
    pub name: String,
}

/// The product that was serviced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    pub serial_number: Option<String>,
}

/// Record of the labor, parts and services performed for a service request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: WorkOrderId,
    /// Human-readable number printed on documents
    pub work_order_number: String,
    pub service_request_id: ServiceRequestId,
    pub customer: CustomerRef,
    pub product: ProductRef,
    pub warranty_card_id: Option<WarrantyCardId>,
    pub currency: Currency,
    pub status: WorkOrderStatus,
    pub labor: Vec<LaborEntry>,
    pub parts: Vec<PartsEntry>,
    pub services: Vec<ServiceEntry>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WorkOrder {
    /// Opens a new work order with no entries
    pub fn new(
        work_order_number: impl Into<String>,
        service_request_id: ServiceRequestId,
        customer: CustomerRef,
        product: ProductRef,
        currency: Currency,
    ) -> Self {
        Self {
            id: WorkOrderId::new_v7(),
            work_order_number: work_order_number.into(),
            service_request_id,
            customer,
            product,
            warranty_card_id: None,
            currency,
            status: WorkOrderStatus::InProgress,
            labor: Vec::new(),
            parts: Vec::new(),
            services: Vec::new(),
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Attaches the warranty card presented for the serviced product
    pub fn with_warranty_card(mut self, warranty_card_id: WarrantyCardId) -> Self {
        self.warranty_card_id = Some(warranty_card_id);
        self
    }

    pub fn add_labor(&mut self, entry: LaborEntry) -> Result<(), WorkOrderError> {
        self.ensure_editable()?;
        self.labor.push(entry);
        Ok(())
    }

    pub fn add_part(&mut self, entry: PartsEntry) -> Result<(), WorkOrderError> {
        self.ensure_editable()?;
        self.parts.push(entry);
        Ok(())
    }

    pub fn add_service(&mut self, entry: ServiceEntry) -> Result<(), WorkOrderError> {
        self.ensure_editable()?;
        self.services.push(entry);
        Ok(())
    }

    /// Logs the work complete; the order is read-only afterwards
    pub fn complete(&mut self) -> Result<(), WorkOrderError> {
        self.ensure_editable()?;
        self.status = WorkOrderStatus::Completed;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == WorkOrderStatus::Completed
    }

    /// Returns an error unless the order has been logged complete
    pub fn ensure_completed(&self) -> Result<(), WorkOrderError> {
        if !self.is_completed() {
            return Err(WorkOrderError::InvalidStatus {
                work_order: self.work_order_number.clone(),
                status: self.status.to_string(),
                expected: WorkOrderStatus::Completed.to_string(),
            });
        }
        Ok(())
    }

    /// Returns true if the work order has no entries at all
    pub fn is_empty(&self) -> bool {
        self.labor.is_empty() && self.parts.is_empty() && self.services.is_empty()
    }

    /// Iterates over every entry regardless of category, labor first
    pub fn entries(&self) -> impl Iterator<Item = &dyn CostEntry> {
        self.labor
            .iter()
            .map(|e| e as &dyn CostEntry)
            .chain(self.parts.iter().map(|e| e as &dyn CostEntry))
            .chain(self.services.iter().map(|e| e as &dyn CostEntry))
    }

    /// Gross cost of all entries
    pub fn gross_cost(&self) -> Result<Money, MoneyError> {
        self.entries()
            .try_fold(Money::zero(self.currency), |acc, e| acc.checked_add(&e.total_cost()))
    }

    /// Runs all validation rules
    pub fn validate(&self) -> ValidationResult {
        WorkOrderValidator::validate(self)
    }

    /// Validates and converts any failure into an error
    pub fn ensure_valid(&self) -> Result<(), WorkOrderError> {
        let result = self.validate();
        if result.is_valid {
            Ok(())
        } else {
            Err(WorkOrderError::validation_failed(result.errors))
        }
    }

    fn ensure_editable(&self) -> Result<(), WorkOrderError> {
        if self.status != WorkOrderStatus::InProgress {
            return Err(WorkOrderError::InvalidStatus {
                work_order: self.work_order_number.clone(),
                status: self.status.to_string(),
                expected: WorkOrderStatus::InProgress.to_string(),
            });
        }
        Ok(())
    }
}
