//! Laundry order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use laundry_core::{Amount, LaundryStatus};

use super::serde_helpers;

/// One laundry order from the `get-customer-record` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LaundryRecord {
    #[serde(rename = "laundryId", deserialize_with = "serde_helpers::string_or_number")]
    pub laundry_id: String,
    #[serde(deserialize_with = "serde_helpers::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Comma-separated service names, e.g. `Wash,Dry,Fold`.
    #[serde(default, deserialize_with = "serde_helpers::null_as_default")]
    pub service: String,
    pub total_amount: Amount,
    pub status: LaundryStatus,
}

impl LaundryRecord {
    /// Services joined for display: `Wash,Dry` becomes `Wash + Dry`.
    #[must_use]
    pub fn service_label(&self) -> String {
        self.service
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// Body of the rating submission for a finished order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingSubmission {
    #[serde(rename = "laundryId")]
    pub laundry_id: String,
    pub rating: u8,
    pub comment: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_record_from_wire() {
        let record: LaundryRecord = serde_json::from_value(json!({
            "laundryId": "25-0001",
            "created_at": "2025-03-14 08:30:00",
            "service": "Wash,Dry,Fold",
            "total_amount": "185.50",
            "status": "Laundry Done"
        }))
        .unwrap();

        assert_eq!(record.laundry_id, "25-0001");
        assert!(record.status.is_completed());
        assert_eq!(record.total_amount.to_string(), "₱185.50");
        assert_eq!(record.service_label(), "Wash + Dry + Fold");
    }

    #[test]
    fn test_record_rejects_bad_timestamp() {
        let result = serde_json::from_value::<LaundryRecord>(json!({
            "laundryId": 3,
            "created_at": "last week",
            "service": "Wash",
            "total_amount": 90,
            "status": "Washing"
        }));
        assert!(result.is_err());
    }
}
