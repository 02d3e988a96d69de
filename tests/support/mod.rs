#![allow(dead_code)]

pub mod backend;

use std::sync::Arc;

use archive_registry::service::{registry_service, Registry, Service, Session};
use archive_registry::{
    Authenticator, FixedClock, InMemoryAuthenticator, NewFileRecord, RecordStore, RegistryConfig, Role,
    StorageUnit,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

pub use backend::FlakyStore;

/// A minimal valid record.
pub fn new_record(item_number: i64, name: &str) -> NewFileRecord {
    NewFileRecord {
        item_number,
        name: Some(name.to_string()),
        storage_unit: Some(StorageUnit::Carpeta),
        support: Some("PAPEL".to_string()),
        folio_start: Some(1),
        folio_end: Some(10),
        ..Default::default()
    }
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()))
}

/// A store over a fresh failure-injecting backend, with a fixed clock.
pub fn flaky_store() -> RecordStore<FlakyStore> {
    RecordStore::new(FlakyStore::new()).with_clock(clock())
}

pub const PASSWORD: &str = "clave-segura";

/// A registry service over a flaky store, plus the user directory it checks.
pub fn service() -> (Service<Registry<FlakyStore>>, InMemoryAuthenticator) {
    let auth = InMemoryAuthenticator::new();
    let service = registry_service(flaky_store(), Arc::new(auth.clone()), RegistryConfig::default());
    (service, auth)
}

/// Register `email` with `role` and sign in through `auth.login`.
pub fn sign_in(
    service: &Service<Registry<FlakyStore>>,
    auth: &InMemoryAuthenticator,
    email: &str,
    role: Role,
) -> Session {
    let user = auth.register(email, PASSWORD, None).unwrap();
    auth.set_role(&user.uid, role).unwrap();
    let login = service
        .dispatch("auth.login", json!({ "email": email, "password": PASSWORD }), Session::new())
        .unwrap();
    Session::with_token(login["token"].as_str().unwrap())
}
