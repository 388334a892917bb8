//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for unit tests.

use core_kernel::{
    Currency, CustomerId, Money, PartId, ProductId, ServiceRequestId, TechnicianId,
};
use domain_workorder::{CustomerRef, LaborEntry, PartsEntry, ProductRef, ServiceEntry};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    /// Standard technician hourly rate
    pub fn hourly_rate() -> Money {
        Money::new(dec!(50.00), Currency::USD)
    }

    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }

    /// IDR amount (zero decimal places)
    pub fn idr_150000() -> Money {
        Money::new(dec!(150000), Currency::IDR)
    }
}

/// Fixture for work order parties and entries
pub struct WorkOrderFixtures;

impl WorkOrderFixtures {
    pub fn customer() -> CustomerRef {
        CustomerRef {
            id: CustomerId::new(),
            name: "Siti Rahmawati".to_string(),
        }
    }

    pub fn product() -> ProductRef {
        ProductRef {
            id: ProductId::new(),
            name: "Front-load washer 8kg".to_string(),
            serial_number: Some("WM8-559210".to_string()),
        }
    }

    pub fn service_request_id() -> ServiceRequestId {
        ServiceRequestId::new()
    }

    pub fn labor(hours: Decimal, rate: Money, eligible: bool) -> LaborEntry {
        LaborEntry::new("Replace drain pump", TechnicianId::new(), hours, rate, "repair", eligible)
            .expect("fixture labor entry is valid")
    }

    pub fn part(quantity: u32, unit_cost: Money, eligible: bool) -> PartsEntry {
        PartsEntry::new(PartId::new(), "Drain pump assembly", quantity, unit_cost, "plumbing", eligible)
            .expect("fixture parts entry is valid")
    }

    pub fn service(cost: Money, eligible: bool) -> ServiceEntry {
        ServiceEntry::new("Pickup and delivery", cost, "logistics", eligible)
            .expect("fixture service entry is valid")
    }
}
