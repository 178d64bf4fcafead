//! Shop API client.
//!
//! Every endpoint answers with the same JSON envelope:
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "optional" }
//! ```
//!
//! The client decodes the envelope and the endpoint's own record in one
//! step, so a response with the wrong shape becomes [`ApiError::Shape`]
//! naming the endpoint. A `success: false` envelope becomes
//! [`ApiError::Rejected`] even when the HTTP status is 2xx.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(&config)?;
//! let customer = session.identity().ok_or(...)?;
//! let records = api
//!     .customer_records(session.credentials(), customer.shop_id, customer.id)
//!     .await?;
//! ```

use std::sync::Arc;

use moka::future::Cache;
use reqwest::RequestBuilder;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use thiserror::Error;
use tracing::instrument;

use laundry_core::{CustomerId, ShopId};

use crate::config::ClientConfig;
use crate::models::{
    AuthPayload, CustomerProfile, CustomerUpdate, Identity, LaundryRecord, LoginRequest,
    PaymentMethod, RatingSubmission, RegisterRequest,
};
use crate::session::Credentials;

/// Header carrying the secondary API key.
pub const API_KEY_HEADER: &str = "x-api-key";

const USER_AGENT: &str = concat!("laundry-customer/", env!("CARGO_PKG_VERSION"));
const PAYMENT_CACHE_CAPACITY: u64 = 64;

/// Errors that can occur when calling the shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The envelope reported `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The body did not match the record expected for the endpoint.
    #[error("Unexpected response from {endpoint}: {source}")]
    Shape {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope succeeded but carried no data where data is required.
    #[error("Response from {0} carried no data")]
    MissingData(&'static str),
}

impl ApiError {
    /// Message fit to show the customer.
    ///
    /// Server messages are passed through; transport and decoding failures
    /// collapse to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected(message) | Self::Status { message, .. } if !message.is_empty() => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// Client for the shop REST API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    payment_methods: Cache<ShopId, Arc<Vec<PaymentMethod>>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        let payment_methods = Cache::builder()
            .max_capacity(PAYMENT_CACHE_CAPACITY)
            .time_to_live(config.payment_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                payment_methods,
            }),
        })
    }

    /// Get the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn authorize(request: RequestBuilder, credentials: Credentials<'_>) -> RequestBuilder {
        let request = match credentials.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };
        match credentials.api_key {
            Some(key) => request.header(API_KEY_HEADER, key.expose_secret()),
            None => request,
        }
    }

    /// Send a request and unwrap the envelope.
    async fn send<T: DeserializeOwned>(
        request: RequestBuilder,
        endpoint: &'static str,
    ) -> Result<Option<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|source| ApiError::Shape { endpoint, source })?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string());
            tracing::warn!(endpoint, message = %message, "API request rejected");
            return Err(ApiError::Rejected(message));
        }

        Ok(envelope.data)
    }

    async fn send_required<T: DeserializeOwned>(
        request: RequestBuilder,
        endpoint: &'static str,
    ) -> Result<T, ApiError> {
        Self::send(request, endpoint)
            .await?
            .ok_or(ApiError::MissingData(endpoint))
    }

    /// Exchange email and password for a session triple.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the credentials are rejected.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ApiError> {
        let builder = self.inner.client.post(self.url("/api/auth/login")).json(request);
        Self::send_required(builder, "login").await
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the account is rejected.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let builder = self
            .inner
            .client
            .post(self.url("/api/auth/register"))
            .json(request);
        Self::send::<IgnoredAny>(builder, "register").await?;
        Ok(())
    }

    /// Fetch the full profile of the logged-in customer.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the profile is missing.
    #[instrument(skip_all, fields(customer_id = %customer.id))]
    pub async fn get_customer(
        &self,
        credentials: Credentials<'_>,
        customer: &Identity,
    ) -> Result<CustomerProfile, ApiError> {
        let path = format!(
            "/api/customers/get-customer/{}/{}/{}",
            customer.id,
            customer.shop_id,
            urlencoding::encode(&customer.role)
        );
        let builder = Self::authorize(self.inner.client.get(self.url(&path)), credentials);
        Self::send_required(builder, "get-customer").await
    }

    /// Save edited profile fields.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the update is rejected.
    #[instrument(skip_all, fields(customer_id = %customer.id))]
    pub async fn update_customer(
        &self,
        credentials: Credentials<'_>,
        customer: &Identity,
        update: &CustomerUpdate,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/api/customers/update-customer/{}/{}/{}",
            customer.id,
            customer.shop_id,
            urlencoding::encode(&customer.role)
        );
        let builder =
            Self::authorize(self.inner.client.put(self.url(&path)), credentials).json(update);
        Self::send::<IgnoredAny>(builder, "update-customer").await?;
        Ok(())
    }

    /// Payment methods the shop displays, cached per shop.
    ///
    /// A successful response without data means the shop has none.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all, fields(shop_id = %shop_id))]
    pub async fn payment_methods(
        &self,
        credentials: Credentials<'_>,
        shop_id: ShopId,
    ) -> Result<Arc<Vec<PaymentMethod>>, ApiError> {
        if let Some(cached) = self.inner.payment_methods.get(&shop_id).await {
            tracing::debug!("Payment methods served from cache");
            return Ok(cached);
        }

        let path = format!("/api/auth/displayed-payment-method/{shop_id}");
        let builder = Self::authorize(self.inner.client.get(self.url(&path)), credentials);
        let methods = Arc::new(
            Self::send::<Vec<PaymentMethod>>(builder, "displayed-payment-method")
                .await?
                .unwrap_or_default(),
        );

        self.inner
            .payment_methods
            .insert(shop_id, Arc::clone(&methods))
            .await;
        Ok(methods)
    }

    /// Laundry orders of a customer at a shop.
    ///
    /// Rows that do not decode are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the list is missing.
    #[instrument(skip_all, fields(shop_id = %shop_id, customer_id = %customer_id))]
    pub async fn customer_records(
        &self,
        credentials: Credentials<'_>,
        shop_id: ShopId,
        customer_id: CustomerId,
    ) -> Result<Vec<LaundryRecord>, ApiError> {
        let path = format!("/api/customers/get-customer-record/{shop_id}/{customer_id}");
        let builder = Self::authorize(self.inner.client.get(self.url(&path)), credentials);
        let rows: Vec<serde_json::Value> = Self::send_required(builder, "get-customer-record").await?;
        Ok(decode_records(rows))
    }

    /// Rate a finished laundry order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the rating is rejected.
    #[instrument(skip_all, fields(customer_id = %customer.id, laundry_id = %rating.laundry_id))]
    pub async fn submit_rating(
        &self,
        credentials: Credentials<'_>,
        customer: &Identity,
        rating: &RatingSubmission,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/api/customers/rate-laundry/{}/{}",
            customer.shop_id, customer.id
        );
        let builder =
            Self::authorize(self.inner.client.post(self.url(&path)), credentials).json(rating);
        Self::send::<IgnoredAny>(builder, "rate-laundry").await?;
        Ok(())
    }
}

/// Decode order rows one at a time, dropping the ones with a bad shape.
fn decode_records(rows: Vec<serde_json::Value>) -> Vec<LaundryRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<LaundryRecord>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable laundry record");
                None
            }
        })
        .collect()
}

/// Pull a readable message out of an error body.
///
/// Uses the envelope's `message` when the body is JSON, else the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Envelope<IgnoredAny>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| body.trim().to_string())
}
