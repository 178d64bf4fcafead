//! Shop payment methods.

use serde::Deserialize;

use laundry_core::PaymentOption;

use super::serde_helpers;

/// An electronic payment method the shop displays to customers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "pm_name")]
    pub name: String,
    #[serde(rename = "qrCode_image_url", default)]
    pub qr_code_image_url: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::null_as_default")]
    pub account_name: String,
    #[serde(default, deserialize_with = "serde_helpers::string_or_number")]
    pub account_number: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl PaymentMethod {
    /// The payment option that selects this method.
    #[must_use]
    pub fn option(&self) -> PaymentOption {
        PaymentOption::from_name(&self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_method_from_wire() {
        let method: PaymentMethod = serde_json::from_value(json!({
            "pm_name": "GCash",
            "qrCode_image_url": "https://cdn.example.ph/qr/gcash.png",
            "account_name": "Sudsy Laundry",
            "account_number": 9_171_234_567_i64,
            "description": "Send the exact amount"
        }))
        .unwrap();

        assert_eq!(method.option(), PaymentOption::Electronic("gcash".into()));
        assert_eq!(method.account_number, "9171234567");
    }
}
