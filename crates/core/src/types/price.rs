//! Product price stored as an integer amount of cents.
//!
//! The backend stores `priceInCents` as an integer. Sellers type prices in
//! currency units (`"149.90"` or `"149,90"`), so parsing goes through
//! [`rust_decimal::Decimal`] to avoid float rounding on the way to cents.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PriceInCents`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is empty.
    #[error("price is required")]
    Empty,
    /// The input is not a number.
    #[error("price must be a number")]
    NotANumber,
    /// The price is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The price has sub-cent precision.
    #[error("price can have at most two decimal places")]
    TooPrecise,
    /// The price does not fit in cents.
    #[error("price is too large")]
    TooLarge,
}

/// A price in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceInCents(i64);

impl PriceInCents {
    /// Wrap an amount of cents as received from the backend.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Get the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The price in currency units (`1990` cents becomes `19.90`).
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Parse a price typed in currency units.
    ///
    /// Accepts either `.` or `,` as the decimal separator.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the input is empty, not numeric, not
    /// positive, more precise than a cent, or out of range.
    pub fn parse_units(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let normalized = if trimmed.contains('.') {
            trimmed.to_owned()
        } else {
            trimmed.replace(',', ".")
        };

        let amount = Decimal::from_str(&normalized).map_err(|_| PriceError::NotANumber)?;
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }

        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_i64())
            .ok_or(PriceError::TooLarge)?;

        Ok(Self(cents))
    }
}

impl fmt::Display for PriceInCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}

impl From<i64> for PriceInCents {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units_dot_and_comma() {
        assert_eq!(PriceInCents::parse_units("149.90").unwrap().cents(), 14990);
        assert_eq!(PriceInCents::parse_units("149,90").unwrap().cents(), 14990);
        assert_eq!(PriceInCents::parse_units(" 12 ").unwrap().cents(), 1200);
        assert_eq!(PriceInCents::parse_units("0.01").unwrap().cents(), 1);
    }

    #[test]
    fn test_parse_units_has_no_float_drift() {
        // 0.29 * 100 is 28.999999999999996 in f64
        assert_eq!(PriceInCents::parse_units("0.29").unwrap().cents(), 29);
    }

    #[test]
    fn test_parse_units_errors() {
        assert_eq!(PriceInCents::parse_units(""), Err(PriceError::Empty));
        assert_eq!(PriceInCents::parse_units("abc"), Err(PriceError::NotANumber));
        assert_eq!(PriceInCents::parse_units("0"), Err(PriceError::NotPositive));
        assert_eq!(PriceInCents::parse_units("-3"), Err(PriceError::NotPositive));
        assert_eq!(PriceInCents::parse_units("1.999"), Err(PriceError::TooPrecise));
    }

    #[test]
    fn test_trailing_zeros_are_not_extra_precision() {
        assert_eq!(PriceInCents::parse_units("10.500").unwrap().cents(), 1050);
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(PriceInCents::new(14990).to_string(), "149.90");
        assert_eq!(PriceInCents::new(5).to_string(), "0.05");
        assert_eq!(PriceInCents::new(1200).to_string(), "12.00");
    }

    #[test]
    fn test_to_decimal_round_trips_input() {
        let price = PriceInCents::parse_units("75.5").unwrap();
        assert_eq!(price.to_decimal().to_string(), "75.50");
    }
}
