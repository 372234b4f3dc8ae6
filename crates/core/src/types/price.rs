//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Lease prices are monthly amounts in the currency's standard unit (riyals,
/// not halalas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the storefront's default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Round up to the nearest whole currency unit.
    ///
    /// Displayed lease prices are never understated, so every rounding step
    /// uses the ceiling.
    #[must_use]
    pub fn ceil_whole(self) -> Self {
        Self::new(ceil_whole(self.amount), self.currency_code)
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency_code.code(), self.amount.normalize())
    }
}

/// Round a decimal up to the nearest whole unit.
#[must_use]
pub fn ceil_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::ToPositiveInfinity)
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    SAR,
    AED,
    USD,
}

impl CurrencyCode {
    /// Three-letter currency code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SAR => "SAR",
            Self::AED => "AED",
            Self::USD => "USD",
        }
    }

    /// Arabic currency abbreviation.
    #[must_use]
    pub const fn arabic_symbol(&self) -> &'static str {
        match self {
            Self::SAR => "ر.س",
            Self::AED => "د.إ",
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_whole_rounds_up_fractions() {
        assert_eq!(ceil_whole(Decimal::new(2401, 1)), Decimal::from(241));
        assert_eq!(ceil_whole(Decimal::new(24001, 2)), Decimal::from(241));
        assert_eq!(ceil_whole(Decimal::from(240)), Decimal::from(240));
    }

    #[test]
    fn test_price_ceil_keeps_currency() {
        let price = Price::new(Decimal::new(1995, 1), CurrencyCode::AED).ceil_whole();
        assert_eq!(price.amount, Decimal::from(200));
        assert_eq!(price.currency_code, CurrencyCode::AED);
    }

    #[test]
    fn test_display() {
        let price = Price::from_amount(Decimal::new(19200, 2));
        assert_eq!(price.to_string(), "SAR 192");
    }

    #[test]
    fn test_serde_amount_is_string() {
        let price = Price::from_amount(Decimal::from(192));
        let json = serde_json::to_value(price).unwrap_or_default();
        assert_eq!(json["amount"], "192");
        assert_eq!(json["currency_code"], "SAR");
    }
}
