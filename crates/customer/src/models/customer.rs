//! Customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use laundry_core::{CustomerId, ShopId};

use super::serde_helpers;

/// The logged-in customer as held by the session store.
///
/// The record belongs to the shop API and is kept exactly as the login
/// endpoint returned it, so the stored value replays unchanged. Any JSON
/// value is accepted; the fields this client needs are read through
/// [`Customer::identity`] and [`Customer::detail`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Customer(Value);

/// The fields used to address the customer in API paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: CustomerId,
    pub shop_id: ShopId,
    pub role: String,
}

impl Customer {
    #[must_use]
    pub fn new(id: CustomerId, shop_id: ShopId, role: impl Into<String>) -> Self {
        let mut record = Map::new();
        record.insert("id".to_string(), id.as_i64().into());
        record.insert("shop_id".to_string(), shop_id.as_i64().into());
        record.insert("role".to_string(), Value::String(role.into()));
        Self(Value::Object(record))
    }

    #[must_use]
    pub const fn from_value(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Attach an extra profile field. Ignored unless the record is an object.
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Value::Object(record) = &mut self.0 {
            record.insert(key.to_string(), value.into());
        }
        self
    }

    /// A string profile field, if present and non-empty.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Customer id, shop id and role, if all three are usable.
    ///
    /// Ids may be JSON numbers or numeric strings.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        Some(Identity {
            id: CustomerId::new(integer(self.0.get("id")?)?),
            shop_id: ShopId::new(integer(self.0.get("shop_id")?)?),
            role: self.detail("role")?.to_string(),
        })
    }

    /// Name shown in the dashboard header, upper-cased like a name tag.
    ///
    /// Falls back to the email and then to the customer number.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.detail("user_fName"), self.detail("user_lName")]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        if !name.is_empty() {
            return name.to_uppercase();
        }
        if let Some(email) = self.detail("email") {
            return email.to_string();
        }
        self.0
            .get("id")
            .and_then(integer)
            .map_or_else(|| "CUSTOMER".to_string(), |id| format!("CUSTOMER #{id}"))
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Profile returned by the `get-customer` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerProfile {
    #[serde(rename = "user_fName", default, deserialize_with = "serde_helpers::null_as_default")]
    pub first_name: String,
    #[serde(rename = "user_mName", default, deserialize_with = "serde_helpers::null_as_default")]
    pub middle_name: String,
    #[serde(rename = "user_lName", default, deserialize_with = "serde_helpers::null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "serde_helpers::null_as_default")]
    pub email: String,
    #[serde(rename = "contactNum", default, deserialize_with = "serde_helpers::null_as_default")]
    pub contact_number: String,
    #[serde(rename = "user_address", default, deserialize_with = "serde_helpers::null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "serde_helpers::timestamp")]
    pub date_registered: DateTime<Utc>,
}

impl CustomerProfile {
    /// First, middle and last name joined by single spaces.
    ///
    /// A blank middle name leaves two spaces so that
    /// [`CustomerUpdate::split_full_name`] maps the parts back unchanged.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {} {}",
            self.first_name.trim(),
            self.middle_name.trim(),
            self.last_name.trim()
        )
    }
}

/// Body of the `update-customer` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerUpdate {
    #[serde(rename = "user_fName")]
    pub first_name: String,
    #[serde(rename = "user_mName")]
    pub middle_name: String,
    #[serde(rename = "user_lName")]
    pub last_name: String,
    #[serde(rename = "user_address")]
    pub address: String,
    #[serde(rename = "contactNum")]
    pub contact_number: String,
    pub email: String,
}

impl CustomerUpdate {
    /// Split a full name on single spaces into first, middle and last parts.
    ///
    /// Missing parts are empty; words past the third are dropped.
    #[must_use]
    pub fn split_full_name(full_name: &str) -> (String, String, String) {
        let mut parts = full_name.trim().split(' ').map(str::to_string);
        (
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
        )
    }
}
