//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.
//! Persistence stores whole minor units (cents) as integers.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Number of decimal places in the minor unit of every supported currency.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units with two decimal places (e.g., 12.50).
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "EUR", "BRL").
    pub currency: Currency,
}

/// ISO 4217 currency codes churches keep their books in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro
    Eur,
    /// Brazilian Real
    Brl,
    /// US Dollar
    Usd,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

/// Converts a decimal amount to whole minor units.
///
/// Returns `None` when the amount carries sub-cent precision or does not fit in `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    let cents = amount.checked_mul(Decimal::ONE_HUNDRED)?;
    if cents.fract() != Decimal::ZERO {
        return None;
    }
    cents.to_i64()
}

/// Converts whole minor units to a decimal amount with two places.
#[must_use]
pub fn from_minor_units(cents: i64) -> Decimal {
    Decimal::new(cents, MINOR_UNIT_SCALE)
}

impl Currency {
    /// Symbol printed on receipts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eur => "€",
            Self::Brl => "R$",
            Self::Usd => "$",
        }
    }

    /// Resolves the currency from the symbol a church configured.
    ///
    /// Unknown symbols fall back to the euro, the currency of the fiscal forms.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol.trim() {
            "R$" => Self::Brl,
            "$" | "US$" => Self::Usd,
            _ => Self::Eur,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(50.00), Some(5_000))]
    #[case(dec!(75.25), Some(7_525))]
    #[case(dec!(0.1), Some(10))]
    #[case(dec!(10), Some(1_000))]
    #[case(dec!(0.001), None)]
    #[case(dec!(-3.50), Some(-350))]
    fn test_to_minor_units(#[case] amount: Decimal, #[case] expected: Option<i64>) {
        assert_eq!(to_minor_units(amount), expected);
    }

    #[test]
    fn test_minor_units_round_trip_keeps_scale() {
        let amount = from_minor_units(7_525);
        assert_eq!(amount.to_string(), "75.25");
        assert_eq!(to_minor_units(amount), Some(7_525));
    }

    #[rstest]
    #[case("€", Currency::Eur)]
    #[case("R$", Currency::Brl)]
    #[case(" $ ", Currency::Usd)]
    #[case("", Currency::Eur)]
    fn test_currency_from_symbol(#[case] symbol: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_symbol(symbol), expected);
    }
}
