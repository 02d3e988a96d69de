//! archive_registry - a registry of archival file records.
//!
//! Each record describes one archival series: its item number, code, name,
//! date range, physical location (storage unit, block, shelf), folio range,
//! support medium and lending status. The [`RecordStore`] holds a session's
//! view of the collection, with filtering, pagination and the lending
//! workflow (borrow, return, retain, release) on top of any [`ModelStore`]
//! backend.
//!
//! ```ignore
//! use archive_registry::{InMemoryModelStore, NewFileRecord, RecordStore, StorageUnit};
//!
//! let mut store = RecordStore::new(InMemoryModelStore::new());
//! let file = store.add(NewFileRecord {
//!     item_number: 1,
//!     name: Some("Actas".into()),
//!     storage_unit: Some(StorageUnit::Carpeta),
//!     support: Some("PAPEL".into()),
//!     folio_start: Some(1),
//!     folio_end: Some(50),
//!     ..Default::default()
//! })?;
//! store.borrow(&file.id, "Ana Pérez")?;
//! ```

// The Model derive emits `archive_registry::` paths.
extern crate self as archive_registry;

pub mod auth;
pub mod config;
#[cfg(feature = "emitter")]
mod emitter;
mod error;
pub mod filter;
pub mod model;
pub mod record;
pub mod service;
pub mod status;
pub mod store;
pub mod transfer;

pub use archive_registry_macros::Model;

pub use auth::{AuthError, Authenticator, InMemoryAuthenticator, Role, SessionTokens, UserProfile};
pub use config::{ConfigError, ExportConfig, RegistryConfig};
#[cfg(feature = "emitter")]
pub use emitter::StoreEmitter;
pub use error::RegistryError;
pub use filter::{FilterField, FilterSet, Page, Pagination};
pub use model::{InMemoryModelStore, Model, ModelError, ModelStore};
pub use record::{FileRecord, FileRecordPatch, FileStatus, NewFileRecord, StorageUnit};
pub use status::{Clock, FixedClock, StatusAction, StatusChange, StatusTransitionEngine, SystemClock};
pub use store::{BatchFailure, BatchSummary, RecordEvent, RecordStore};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
