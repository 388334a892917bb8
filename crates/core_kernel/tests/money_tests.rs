//! Unit tests for the Money module
//!
//! Covers creation, arithmetic, summation and the guards used when
//! pricing labor, parts and services.

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_handles_zero_decimal_currency() {
        let m = Money::from_minor(150000, Currency::IDR);
        assert_eq!(m.amount(), dec!(150000));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert_eq!(m.currency(), Currency::EUR);
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(60.00), Currency::USD);
        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(160.00));
    }

    #[test]
    fn test_checked_sub_currency_mismatch() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(60.00), Currency::GBP);
        assert_eq!(
            a.checked_sub(&b),
            Err(MoneyError::CurrencyMismatch("USD".to_string(), "GBP".to_string()))
        );
    }

    #[test]
    fn test_multiply_by_quantity() {
        let unit_cost = Money::new(dec!(20.00), Currency::USD);
        assert_eq!(unit_cost.multiply(dec!(3)).unwrap().amount(), dec!(60.00));
    }

    #[test]
    fn test_multiply_by_zero_hours() {
        let rate = Money::new(dec!(75.00), Currency::USD);
        assert!(rate.multiply(dec!(0)).unwrap().is_zero());
    }

    #[test]
    fn test_checked_sum_stops_on_mismatch() {
        let amounts = vec![
            Money::new(dec!(10.00), Currency::USD),
            Money::new(dec!(10.00), Currency::EUR),
        ];
        assert!(Money::checked_sum(&amounts, Currency::USD).is_err());
    }

    #[test]
    fn test_checked_sum_reports_overflow() {
        let amounts = vec![
            Money::new(dec!(50000000000000000000000000000), Currency::USD),
            Money::new(dec!(50000000000000000000000000000), Currency::USD),
        ];
        assert_eq!(
            Money::checked_sum(&amounts, Currency::USD),
            Err(MoneyError::Overflow)
        );
    }

    #[test]
    fn test_checked_sum_adds_all() {
        let amounts = vec![
            Money::new(dec!(100.00), Currency::USD),
            Money::new(dec!(60.00), Currency::USD),
            Money::new(dec!(15.50), Currency::USD),
        ];
        let total = Money::checked_sum(&amounts, Currency::USD).unwrap();
        assert_eq!(total.amount(), dec!(175.50));
    }
}

mod guards {
    use super::*;

    #[test]
    fn test_ensure_non_negative_accepts_zero() {
        assert!(Money::zero(Currency::USD).ensure_non_negative().is_ok());
    }

    #[test]
    fn test_ensure_non_negative_rejects_negative() {
        let refund = Money::new(dec!(-5.00), Currency::USD);
        let err = refund.ensure_non_negative().unwrap_err();
        assert!(matches!(err, MoneyError::InvalidAmount(_)));
        assert!(err.to_string().contains("must not be negative"));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_money_display_usd() {
        let m = Money::new(dec!(1234.5), Currency::USD);
        assert_eq!(m.to_string(), "$ 1234.50");
    }

    #[test]
    fn test_round_to_currency_idr() {
        let m = Money::new(dec!(15000.4), Currency::IDR);
        assert_eq!(m.round_to_currency().amount(), dec!(15000));
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_currency_serializes_uppercase() {
        let json = serde_json::to_string(&Currency::IDR).unwrap();
        assert_eq!(json, "\"IDR\"");
    }

    #[test]
    fn test_money_amount_is_a_json_number() {
        let json = serde_json::to_string(&Money::new(dec!(42.25), Currency::EUR)).unwrap();
        assert_eq!(json, r#"{"amount":42.25,"currency":"EUR"}"#);
    }
}
