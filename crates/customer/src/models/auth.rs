//! Login and registration payloads.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use laundry_core::ShopId;

use super::{Customer, serde_helpers};

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// New customer account posted to the register endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub shop_id: Option<ShopId>,
    #[serde(rename = "user_fName")]
    pub first_name: String,
    #[serde(rename = "user_mName")]
    pub middle_name: String,
    #[serde(rename = "user_lName")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "contactNum")]
    pub contact_number: String,
    #[serde(rename = "user_address")]
    pub address: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Session triple returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub customer: Customer,
    #[serde(deserialize_with = "serde_helpers::secret")]
    pub token: SecretString,
    #[serde(rename = "apiKey", deserialize_with = "serde_helpers::secret")]
    pub api_key: SecretString,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
