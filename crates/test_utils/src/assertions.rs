//! Custom Test Assertions
//!
//! Assertion helpers that print both sides of a cost split on failure.

use core_kernel::Money;
use rust_decimal::Decimal;

/// Asserts that a Money value has the given amount
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Expected {} {}, got {}",
        actual.currency().symbol(),
        expected,
        actual
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that covered and billable add up to the total
///
/// # Panics
///
/// Panics on currency mismatch or if the parts do not sum to the total.
pub fn assert_split_balanced(total: &Money, warranty_covered: &Money, billable: &Money) {
    let sum = warranty_covered
        .checked_add(billable)
        .unwrap_or_else(|e| panic!("Split is not in one currency: {}", e));
    assert_eq!(
        &sum, total,
        "Split does not balance: covered {} + billable {} = {}, total {}",
        warranty_covered, billable, sum, total
    );
}
