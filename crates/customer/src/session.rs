//! Session store: who is logged in and with which credentials.
//!
//! The session is the triple (customer, bearer token, API key). It lives in
//! memory for the views and is mirrored to [`DurableStorage`] so it survives
//! a restart.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──initialize()──▶ rehydrated (empty or restored)
//!                              │
//!            login(c, t, k) ───┤  write storage, then memory
//!            logout() ─────────┘  clear storage and memory
//! ```
//!
//! There is no expiry and no partial update: a token refresh is a full
//! re-login.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{Customer, Identity};
use crate::storage::{DurableStorage, StorageError, StorageOp};

/// Storage keys for the session triple.
pub mod keys {
    /// JSON-encoded customer record.
    pub const CUSTOMER_DATA: &str = "customerData";

    /// Bearer token.
    pub const TOKEN: &str = "token";

    /// Secondary API key.
    pub const API_KEY: &str = "apiKey";

    /// All session keys, in write order.
    pub const ALL: [&str; 3] = [CUSTOMER_DATA, TOKEN, API_KEY];
}

/// Errors returned by session mutations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to encode customer record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outcome of rehydrating the session from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rehydration {
    /// Nothing was stored.
    Empty,
    /// At least one stored value was applied.
    Restored,
    /// Stored data was unusable; storage was cleared.
    Wiped,
}

/// The credential pair sent with authenticated API requests.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub token: Option<&'a SecretString>,
    pub api_key: Option<&'a SecretString>,
}

/// In-memory session mirrored to durable storage.
pub struct SessionStore<S> {
    storage: S,
    customer: Option<Customer>,
    identity: Option<Identity>,
    token: Option<SecretString>,
    api_key: Option<SecretString>,
    initialized: bool,
}

impl<S: DurableStorage> SessionStore<S> {
    /// Create an empty, not yet rehydrated store.
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            customer: None,
            identity: None,
            token: None,
            api_key: None,
            initialized: false,
        }
    }

    /// Rehydrate the session from storage.
    ///
    /// Runs once; later calls return [`Rehydration::Empty`] without touching
    /// storage. Each key is applied independently. The customer record is
    /// replayed as stored; only a value that is not JSON at all, or storage
    /// that cannot be read, counts as corruption. Then storage is cleared and
    /// the session stays empty. That case is logged and reported, never
    /// returned as an error.
    pub fn initialize(&mut self) -> Rehydration {
        if self.initialized {
            return Rehydration::Empty;
        }
        self.initialized = true;

        match self.read_stored() {
            Ok((customer, token, api_key)) => {
                let restored = customer.is_some() || token.is_some() || api_key.is_some();
                self.set_customer(customer);
                self.token = token;
                self.api_key = api_key;

                if restored {
                    if self.customer.is_some() && self.identity.is_none() {
                        tracing::warn!("Stored customer record has no usable id, shop or role");
                    }
                    tracing::info!(
                        customer_id = ?self.identity.as_ref().map(|identity| identity.id),
                        has_token = self.token.is_some(),
                        has_api_key = self.api_key.is_some(),
                        "Session restored"
                    );
                    Rehydration::Restored
                } else {
                    Rehydration::Empty
                }
            }
            Err(error) => {
                tracing::error!(error = %error, "Stored session unusable, clearing it");
                self.clear_memory();
                if let Err(wipe_error) = self.storage.clear() {
                    tracing::warn!(error = %wipe_error, "Failed to clear stored session");
                }
                Rehydration::Wiped
            }
        }
    }

    fn read_stored(&self) -> Result<StoredTriple, RehydrateError> {
        let customer = read_non_empty(&self.storage, keys::CUSTOMER_DATA)?
            .map(|raw| serde_json::from_str::<Customer>(&raw))
            .transpose()?
            .filter(|customer| !customer.as_value().is_null());
        let token = read_non_empty(&self.storage, keys::TOKEN)?.map(SecretString::from);
        let api_key = read_non_empty(&self.storage, keys::API_KEY)?.map(SecretString::from);
        Ok((customer, token, api_key))
    }

    /// Log a customer in.
    ///
    /// Writes all three values to storage in one batch, then updates memory.
    /// Inputs are not validated; a customer record without a usable identity
    /// is stored but does not count as logged in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage rejects the write; the in-memory
    /// session is left as it was.
    pub fn login(
        &mut self,
        customer: Customer,
        token: SecretString,
        api_key: SecretString,
    ) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(&customer)?;
        self.storage.apply(&[
            StorageOp::set(keys::CUSTOMER_DATA, encoded),
            StorageOp::set(keys::TOKEN, token.expose_secret()),
            StorageOp::set(keys::API_KEY, api_key.expose_secret()),
        ])?;

        self.set_customer(Some(customer));
        tracing::info!(
            customer_id = ?self.identity.as_ref().map(|identity| identity.id),
            shop_id = ?self.identity.as_ref().map(|identity| identity.shop_id),
            "Customer logged in"
        );

        self.token = Some(token);
        self.api_key = Some(api_key);
        self.initialized = true;
        Ok(())
    }

    /// Log out, whatever the current state.
    ///
    /// Memory is always cleared, even when storage fails. Storage that can
    /// no longer be decoded is cleared as a whole.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the stored keys could not be removed.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        let result = match self.storage.apply(&remove_all()) {
            Err(StorageError::Corrupt { .. }) => self.storage.clear(),
            other => other,
        };
        let was_logged_in = self.customer.is_some();
        self.clear_memory();
        clear_sentry_user();

        if was_logged_in {
            tracing::info!("Customer logged out");
        }
        result.map_err(SessionError::from)
    }

    fn set_customer(&mut self, customer: Option<Customer>) {
        self.identity = customer.as_ref().and_then(Customer::identity);
        if let (Some(customer), Some(identity)) = (&customer, &self.identity) {
            set_sentry_user(&identity.id, customer.detail("email"));
        }
        self.customer = customer;
    }

    fn clear_memory(&mut self) {
        self.customer = None;
        self.identity = None;
        self.token = None;
        self.api_key = None;
    }

    #[must_use]
    pub const fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Ids and role of the stored customer, when the record has them.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    /// Credentials to attach to API requests.
    #[must_use]
    pub const fn credentials(&self) -> Credentials<'_> {
        Credentials {
            token: self.token.as_ref(),
            api_key: self.api_key.as_ref(),
        }
    }

    /// Views treat a customer record with a usable identity as "logged in".
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S> std::fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("customer", &self.identity.as_ref().map(|identity| identity.id))
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("initialized", &self.initialized)
            .finish()
    }
}

type StoredTriple = (Option<Customer>, Option<SecretString>, Option<SecretString>);

#[derive(Debug, Error)]
enum RehydrateError {
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("customer record is not valid JSON: {0}")]
    Customer(#[from] serde_json::Error),
}

fn read_non_empty<S: DurableStorage>(storage: &S, key: &str) -> Result<Option<String>, StorageError> {
    Ok(storage.get(key)?.filter(|value| !value.is_empty()))
}

fn remove_all() -> Vec<StorageOp> {
    keys::ALL.iter().map(|key| StorageOp::remove(*key)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use laundry_core::{CustomerId, ShopId};

    use super::*;
    use crate::storage::MemoryStorage;

    fn customer() -> Customer {
        Customer::new(CustomerId::new(1), ShopId::new(5), "customer")
    }

    fn logged_in(storage: &MemoryStorage) -> SessionStore<MemoryStorage> {
        let mut session = SessionStore::new(storage.clone());
        session
            .login(
                customer(),
                SecretString::from("tok-abc"),
                SecretString::from("key-xyz"),
            )
            .unwrap();
        session
    }

    /// Storage that accepts reads but refuses every write.
    struct ReadOnly(MemoryStorage);

    impl DurableStorage for ReadOnly {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn apply(&self, _ops: &[StorageOp]) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }

        fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    #[test]
    fn test_login_writes_storage_and_memory() {
        let storage = MemoryStorage::new();
        let session = logged_in(&storage);

        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap().expose_secret(), "tok-abc");
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("tok-abc"));
        assert_eq!(storage.get(keys::API_KEY).unwrap().as_deref(), Some("key-xyz"));
        assert!(storage.get(keys::CUSTOMER_DATA).unwrap().unwrap().contains("\"shop_id\":5"));
    }

    #[test]
    fn test_login_then_restart_restores_triple() {
        let storage = MemoryStorage::new();
        drop(logged_in(&storage));

        let mut restarted = SessionStore::new(storage);
        assert_eq!(restarted.initialize(), Rehydration::Restored);
        assert_eq!(restarted.customer(), Some(&customer()));
        assert_eq!(restarted.token().unwrap().expose_secret(), "tok-abc");
        assert_eq!(restarted.api_key().unwrap().expose_secret(), "key-xyz");
    }

    #[test]
    fn test_logout_is_idempotent() {
        let storage = MemoryStorage::new();
        let mut session = logged_in(&storage);

        session.logout().unwrap();
        session.logout().unwrap();

        assert!(storage.is_empty());
        assert!(session.customer().is_none());
        assert!(session.token().is_none());
        assert!(session.api_key().is_none());
    }

    #[test]
    fn test_initialize_empty_storage() {
        let mut session = SessionStore::new(MemoryStorage::new());
        assert_eq!(session.initialize(), Rehydration::Empty);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_corrupt_customer_wipes_everything() {
        let storage = MemoryStorage::new();
        storage.set(keys::CUSTOMER_DATA, "{not json").unwrap();
        storage.set(keys::TOKEN, "tok-abc").unwrap();
        storage.set(keys::API_KEY, "key-xyz").unwrap();

        let mut session = SessionStore::new(storage.clone());
        assert_eq!(session.initialize(), Rehydration::Wiped);

        assert!(session.customer().is_none());
        assert!(session.token().is_none());
        assert!(session.api_key().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_structured_customer_without_identity_is_kept() {
        let storage = MemoryStorage::new();
        let stored = r#"{"id":1,"shop_id":null,"role":"customer"}"#;
        storage.set(keys::CUSTOMER_DATA, stored).unwrap();
        storage.set(keys::TOKEN, "tok-abc").unwrap();
        storage.set(keys::API_KEY, "key-xyz").unwrap();

        let mut session = SessionStore::new(storage.clone());
        assert_eq!(session.initialize(), Rehydration::Restored);

        assert!(session.customer().is_some());
        assert!(session.identity().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(session.token().unwrap().expose_secret(), "tok-abc");
        assert_eq!(storage.get(keys::CUSTOMER_DATA).unwrap().as_deref(), Some(stored));
    }

    #[test]
    fn test_string_ids_restore_identity() {
        let storage = MemoryStorage::new();
        storage
            .set(keys::CUSTOMER_DATA, r#"{"id":"1","shop_id":"5","role":"customer"}"#)
            .unwrap();

        let mut session = SessionStore::new(storage);
        assert_eq!(session.initialize(), Rehydration::Restored);
        assert_eq!(session.identity().unwrap().id, CustomerId::new(1));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_wipe_clears_unrelated_keys_too() {
        let storage = MemoryStorage::new();
        storage.set(keys::CUSTOMER_DATA, "{not json").unwrap();
        storage.set("theme", "dark").unwrap();

        let mut session = SessionStore::new(storage.clone());
        assert_eq!(session.initialize(), Rehydration::Wiped);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_partial_storage_restores_what_is_there() {
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "tok-only").unwrap();

        let mut session = SessionStore::new(storage);
        assert_eq!(session.initialize(), Rehydration::Restored);
        assert!(session.customer().is_none());
        assert_eq!(session.token().unwrap().expose_secret(), "tok-only");
        assert!(session.api_key().is_none());
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "").unwrap();

        let mut session = SessionStore::new(storage);
        assert_eq!(session.initialize(), Rehydration::Empty);
    }

    #[test]
    fn test_initialize_runs_once() {
        let storage = MemoryStorage::new();
        let mut session = SessionStore::new(storage.clone());
        assert_eq!(session.initialize(), Rehydration::Empty);

        storage.set(keys::TOKEN, "late").unwrap();
        assert_eq!(session.initialize(), Rehydration::Empty);
        assert!(session.token().is_none());
    }

    #[test]
    fn test_failed_login_leaves_memory_untouched() {
        let mut session = SessionStore::new(ReadOnly(MemoryStorage::new()));
        let result = session.login(
            customer(),
            SecretString::from("tok"),
            SecretString::from("key"),
        );

        assert!(matches!(result, Err(SessionError::Storage(_))));
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_failed_logout_still_clears_memory() {
        let storage = MemoryStorage::new();
        drop(logged_in(&storage));

        let mut session = SessionStore::new(ReadOnly(storage));
        session.initialize();
        assert!(session.is_authenticated());

        assert!(session.logout().is_err());
        assert!(!session.is_authenticated());
        assert!(session.credentials().token.is_none());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let storage = MemoryStorage::new();
        let session = logged_in(&storage);
        let debug = format!("{session:?}");
        assert!(!debug.contains("tok-abc"));
        assert!(!debug.contains("key-xyz"));
    }
}
