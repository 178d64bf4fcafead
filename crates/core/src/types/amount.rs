//! Peso amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount in Philippine pesos.
///
/// The shop API reports totals either as JSON numbers or as decimal strings;
/// both deserialize into the same value. Display keeps the scale the shop
/// sent, so `150` shows as `₱150` and `150.50` as `₱150.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Currency symbol prefixed when displaying an amount.
    pub const SYMBOL: &'static str = "₱";

    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create an amount from centavos.
    #[must_use]
    pub fn from_centavos(centavos: i64) -> Self {
        Self(Decimal::new(centavos, 2))
    }

    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::SYMBOL, self.0)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_scale() {
        assert_eq!(Amount::new(Decimal::from(150)).to_string(), "₱150");
        assert_eq!(Amount::from_centavos(15050).to_string(), "₱150.50");
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: Amount = serde_json::from_str("250").unwrap();
        let from_string: Amount = serde_json::from_str("\"250.00\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_string.to_string(), "₱250.00");
    }
}
