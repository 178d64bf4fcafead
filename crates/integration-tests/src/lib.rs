//! Test support for the laundry customer portal.
//!
//! [`StubShop`] is an in-process shop API bound to an ephemeral port. Every
//! endpoint the client calls answers with a canned envelope that tests can
//! replace, and every request is recorded for assertions.
//!
//! ```rust,ignore
//! let shop = StubShop::start().await?;
//! shop.reply("get-customer-record", 200, json!({"success": false}));
//!
//! let state = tempfile::tempdir()?;
//! let app = App::new(shop.config(state.path()))?;
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use laundry_customer::api::API_KEY_HEADER;
use laundry_customer::config::ClientConfig;

/// Token returned by the default login reply.
pub const TOKEN: &str = "tok-abc";

/// API key returned by the default login reply.
pub const API_KEY: &str = "key-xyz";

/// A request received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub endpoint: &'static str,
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct StubState {
    replies: Mutex<HashMap<&'static str, (StatusCode, Value)>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StubState {
    async fn respond(
        &self,
        endpoint: &'static str,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: &str,
    ) -> Response {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        lock(&self.requests).push(RecordedRequest {
            endpoint,
            method,
            path: uri.path().to_string(),
            authorization: header("authorization"),
            api_key: header(API_KEY_HEADER),
            body: serde_json::from_str(body).ok(),
        });

        let delay = lock(&self.delays).get(endpoint).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = lock(&self.replies).get(endpoint).cloned();
        match reply {
            Some((status, value)) => (status, Json(value)).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

type Shared = Arc<StubState>;

macro_rules! endpoint {
    ($name:literal) => {
        |State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap, body: String| async move {
            state.respond($name, method, &uri, &headers, &body).await
        }
    };
}

/// In-process shop API.
pub struct StubShop {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl StubShop {
    /// Bind to an ephemeral port and serve the default replies.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Shared::default();
        let router = Router::new()
            .route("/api/auth/login", post(endpoint!("login")))
            .route("/api/auth/register", post(endpoint!("register")))
            .route(
                "/api/customers/get-customer/{id}/{shop_id}/{role}",
                get(endpoint!("get-customer")),
            )
            .route(
                "/api/customers/update-customer/{id}/{shop_id}/{role}",
                put(endpoint!("update-customer")),
            )
            .route(
                "/api/auth/displayed-payment-method/{shop_id}",
                get(endpoint!("displayed-payment-method")),
            )
            .route(
                "/api/customers/get-customer-record/{shop_id}/{id}",
                get(endpoint!("get-customer-record")),
            )
            .route(
                "/api/customers/rate-laundry/{shop_id}/{id}",
                post(endpoint!("rate-laundry")),
            )
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let shop = Self {
            addr,
            state,
            server,
        };
        shop.install_defaults();
        Ok(shop)
    }

    fn install_defaults(&self) {
        self.reply(
            "login",
            200,
            json!({
                "success": true,
                "data": {"customer": customer_json(), "token": TOKEN, "apiKey": API_KEY}
            }),
        );
        self.reply("register", 201, json!({"success": true, "message": "Registered"}));
        self.reply("get-customer", 200, json!({"success": true, "data": profile_json()}));
        self.reply("update-customer", 200, json!({"success": true}));
        self.reply(
            "displayed-payment-method",
            200,
            json!({"success": true, "data": payment_methods_json()}),
        );
        self.reply(
            "get-customer-record",
            200,
            json!({"success": true, "data": records_json()}),
        );
        self.reply("rate-laundry", 200, json!({"success": true}));
    }

    /// Replace the reply of an endpoint.
    pub fn reply(&self, endpoint: &'static str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        lock(&self.state.replies).insert(endpoint, (status, body));
    }

    /// Hold every reply of an endpoint for `delay`.
    pub fn delay(&self, endpoint: &'static str, delay: Duration) {
        lock(&self.state.delays).insert(endpoint, delay);
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Requests received by one endpoint.
    #[must_use]
    pub fn requests_to(&self, endpoint: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.endpoint == endpoint)
            .collect()
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this stub, storing state in `state_dir`.
    ///
    /// # Panics
    ///
    /// Never in practice: the stub address always forms a valid URL.
    #[must_use]
    pub fn config(&self, state_dir: &Path) -> ClientConfig {
        let base_url = self.base_url();
        let state_dir = state_dir.display().to_string();
        let lookup = move |key: &str| match key {
            "LAUNDRY_API_URL" => Some(base_url.clone()),
            "LAUNDRY_STATE_DIR" => Some(state_dir.clone()),
            "LAUNDRY_REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        };
        match ClientConfig::from_lookup(lookup) {
            Ok(config) => config,
            Err(e) => panic!("stub config is invalid: {e}"),
        }
    }
}

impl Drop for StubShop {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Customer record returned by the default login reply.
#[must_use]
pub fn customer_json() -> Value {
    json!({
        "id": 1,
        "shop_id": 5,
        "role": "customer",
        "user_fName": "Angie",
        "user_lName": "Gabiana",
        "email": "angie@example.ph"
    })
}

/// Profile returned by the default `get-customer` reply.
#[must_use]
pub fn profile_json() -> Value {
    json!({
        "user_fName": "Angie",
        "user_mName": "Reyes",
        "user_lName": "Gabiana",
        "email": "angie@example.ph",
        "contactNum": "09171234567",
        "user_address": "Cebu City",
        "date_registered": "2024-06-02T10:00:00Z"
    })
}

/// Orders returned by the default `get-customer-record` reply, oldest first.
#[must_use]
pub fn records_json() -> Value {
    json!([
        {
            "laundryId": "24-0042",
            "created_at": "2024-12-30 08:15:00",
            "service": "Wash,Fold",
            "total_amount": "180.00",
            "status": "Laundry Done"
        },
        {
            "laundryId": 2501,
            "created_at": "2025-01-04T09:30:00Z",
            "service": "Wash,Dry,Fold",
            "total_amount": 250,
            "status": "Ready to pick up"
        }
    ])
}

/// Methods returned by the default `displayed-payment-method` reply.
#[must_use]
pub fn payment_methods_json() -> Value {
    json!([
        {
            "pm_name": "GCash",
            "qrCode_image_url": "https://cdn.example.ph/qr/gcash.png",
            "account_name": "Sudsy Laundry",
            "account_number": "09170000000",
            "description": "Send the exact amount"
        }
    ])
}
