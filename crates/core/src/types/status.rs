//! Laundry and payment status values.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Status of a laundry order as reported by the shop.
///
/// Shops use free-form status text; only the terminal `Laundry Done` state
/// gets special treatment (customers see it as `Completed`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LaundryStatus {
    Completed,
    Other(String),
}

impl LaundryStatus {
    /// Wire text the shop uses for a finished order.
    pub const DONE: &'static str = "Laundry Done";

    /// Label shown to the customer.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Completed => "Completed",
            Self::Other(text) => text,
        }
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<String> for LaundryStatus {
    fn from(raw: String) -> Self {
        if raw == Self::DONE {
            Self::Completed
        } else {
            Self::Other(raw)
        }
    }
}

impl From<LaundryStatus> for String {
    fn from(status: LaundryStatus) -> Self {
        match status {
            LaundryStatus::Completed => LaundryStatus::DONE.to_owned(),
            LaundryStatus::Other(text) => text,
        }
    }
}

impl fmt::Display for LaundryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the customer intends to pay for an order.
///
/// Cash on pick-up is always offered. Electronic methods come from the
/// shop's configured payment methods and are keyed by their lower-cased name
/// (`gcash`, `paymaya`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PaymentOption {
    #[default]
    Cash,
    Electronic(String),
}

impl PaymentOption {
    pub const CASH_KEY: &'static str = "cash";

    /// Build an option from a method name or option key, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let key = name.trim().to_lowercase();
        if key == Self::CASH_KEY {
            Self::Cash
        } else {
            Self::Electronic(key)
        }
    }

    /// The lower-cased key used to match payment methods.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Cash => Self::CASH_KEY,
            Self::Electronic(key) => key,
        }
    }

    /// Proof of payment can only be attached to electronic payments.
    #[must_use]
    pub const fn accepts_proof(&self) -> bool {
        matches!(self, Self::Electronic(_))
    }
}

impl fmt::Display for PaymentOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => f.write_str("CASH ON PICK-UP"),
            Self::Electronic(key) => f.write_str(&key.to_uppercase()),
        }
    }
}
