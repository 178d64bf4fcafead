//! Session persistence across restarts, backed by the on-disk store.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use laundry_core::{CustomerId, ShopId};
use laundry_customer::models::Customer;
use laundry_customer::session::{Rehydration, SessionStore, keys};
use laundry_customer::storage::{DurableStorage, FileStorage};

fn open(dir: &Path) -> SessionStore<FileStorage> {
    SessionStore::new(FileStorage::in_dir(dir))
}

fn stored_keys(dir: &Path) -> Vec<String> {
    let path = dir.join(FileStorage::FILE_NAME);
    if !path.exists() {
        return Vec::new();
    }
    let entries: BTreeMap<String, String> =
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    entries.into_keys().collect()
}

fn customer() -> Customer {
    Customer::new(CustomerId::new(1), ShopId::new(5), "customer")
        .with_detail("user_fName", "Angie")
        .with_detail("email", "angie@example.ph")
}

fn assert_empty(session: &SessionStore<FileStorage>) {
    assert!(session.customer().is_none());
    assert!(session.token().is_none());
    assert!(session.api_key().is_none());
    assert!(!session.is_authenticated());
}

#[test]
fn test_login_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = open(dir.path());
    assert_eq!(session.initialize(), Rehydration::Empty);
    session
        .login(customer(), SecretString::from("tok-abc"), SecretString::from("key-xyz"))
        .unwrap();
    drop(session);

    let mut restarted = open(dir.path());
    assert_eq!(restarted.initialize(), Rehydration::Restored);

    assert_eq!(restarted.customer(), Some(&customer()));
    let identity = restarted.identity().unwrap();
    assert_eq!(identity.id, CustomerId::new(1));
    assert_eq!(identity.shop_id, ShopId::new(5));
    assert_eq!(restarted.token().unwrap().expose_secret(), "tok-abc");
    assert_eq!(restarted.api_key().unwrap().expose_secret(), "key-xyz");
}

#[test]
fn test_login_writes_all_three_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());
    session.initialize();

    session
        .login(customer(), SecretString::from("tok-abc"), SecretString::from("key-xyz"))
        .unwrap();

    assert_eq!(stored_keys(dir.path()), ["apiKey", "customerData", "token"]);
}

#[test]
fn test_logout_clears_storage_and_memory() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());
    session.initialize();
    session
        .login(customer(), SecretString::from("tok-abc"), SecretString::from("key-xyz"))
        .unwrap();

    session.logout().unwrap();
    assert_empty(&session);
    assert!(stored_keys(dir.path()).is_empty());

    session.logout().unwrap();
    assert_empty(&session);
    assert!(stored_keys(dir.path()).is_empty());

    let mut restarted = open(dir.path());
    assert_eq!(restarted.initialize(), Rehydration::Empty);
    assert_empty(&restarted);
}

#[test]
fn test_logout_when_never_logged_in() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());
    session.initialize();

    session.logout().unwrap();
    assert_empty(&session);
}

#[test]
fn test_corrupt_customer_wipes_every_key() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::in_dir(dir.path());
    storage.set(keys::CUSTOMER_DATA, "{not json").unwrap();
    storage.set(keys::TOKEN, "tok-abc").unwrap();
    storage.set(keys::API_KEY, "key-xyz").unwrap();

    let mut session = open(dir.path());
    assert_eq!(session.initialize(), Rehydration::Wiped);

    assert_empty(&session);
    assert!(stored_keys(dir.path()).is_empty());
}

#[test]
fn test_unreadable_store_file_wipes_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(FileStorage::FILE_NAME);
    fs::write(&path, "[1, 2").unwrap();

    let mut session = open(dir.path());
    assert_eq!(session.initialize(), Rehydration::Wiped);
    assert_empty(&session);
    assert!(stored_keys(dir.path()).is_empty());

    session
        .login(customer(), SecretString::from("tok-abc"), SecretString::from("key-xyz"))
        .unwrap();
    assert!(session.is_authenticated());

    let mut restarted = open(dir.path());
    assert_eq!(restarted.initialize(), Rehydration::Restored);
    assert_eq!(restarted.token().unwrap().expose_secret(), "tok-abc");
}

#[test]
fn test_logout_clears_unreadable_store_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(FileStorage::FILE_NAME), "[1, 2").unwrap();

    let mut session = open(dir.path());
    session.logout().unwrap();
    assert!(stored_keys(dir.path()).is_empty());
}

#[test]
fn test_customer_without_shop_is_replayed_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let stored = r#"{"id":"1","shop_id":null,"role":"customer","user_fName":"Angie"}"#;
    let storage = FileStorage::in_dir(dir.path());
    storage.set(keys::CUSTOMER_DATA, stored).unwrap();
    storage.set(keys::TOKEN, "tok-abc").unwrap();
    storage.set(keys::API_KEY, "key-xyz").unwrap();

    let mut session = open(dir.path());
    assert_eq!(session.initialize(), Rehydration::Restored);

    assert_eq!(session.customer().unwrap().display_name(), "ANGIE");
    assert!(session.identity().is_none());
    assert!(!session.is_authenticated());
    assert_eq!(session.api_key().unwrap().expose_secret(), "key-xyz");
    assert_eq!(
        storage.get(keys::CUSTOMER_DATA).unwrap().as_deref(),
        Some(stored)
    );
}

#[test]
fn test_partial_keys_restore_independently() {
    let dir = tempfile::tempdir().unwrap();
    FileStorage::in_dir(dir.path())
        .set(keys::TOKEN, "tok-only")
        .unwrap();

    let mut session = open(dir.path());
    assert_eq!(session.initialize(), Rehydration::Restored);

    assert_eq!(session.token().unwrap().expose_secret(), "tok-only");
    assert!(session.api_key().is_none());
    assert!(!session.is_authenticated());
}

#[test]
fn test_empty_directory_rehydrates_empty() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = open(dir.path());
    assert_eq!(session.initialize(), Rehydration::Empty);
    assert_empty(&session);
    assert!(!dir.path().join(FileStorage::FILE_NAME).exists());
}

#[test]
fn test_initialize_runs_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());
    session.initialize();
    session
        .login(customer(), SecretString::from("tok-abc"), SecretString::from("key-xyz"))
        .unwrap();

    FileStorage::in_dir(dir.path())
        .set(keys::CUSTOMER_DATA, "{not json")
        .unwrap();

    assert_eq!(session.initialize(), Rehydration::Empty);
    assert!(session.is_authenticated());
}
