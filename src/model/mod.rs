//! Models - documents stored in a collection by the persistence backend.
//!
//! `ModelStore` is the seam between the record store and whatever document
//! database holds the `files` collection. `InMemoryModelStore` is the
//! reference implementation used in tests and by the bundled server.
//!
//! ## Example
//!
//! ```ignore
//! use archive_registry::{InMemoryModelStore, Model, ModelStore};
//!
//! #[derive(Serialize, Deserialize, Clone, Model)]
//! #[model(collection = "shelves", order_by = "code")]
//! struct Shelf {
//!     pub id: String,
//!     pub code: String,
//! }
//!
//! let store = InMemoryModelStore::new();
//! let id = store.create_model(&shelf)?;
//! let shelves: Vec<Shelf> = store.list_models()?;
//! ```

mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Trait for types that can be stored as documents.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this model type (e.g., "files").
    const COLLECTION: &'static str;

    /// Serialized field name that listings are ordered by, ascending.
    const ORDER_BY: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;

    /// Overwrites the identifier. Used when the backend assigns one.
    fn set_id(&mut self, id: &str);
}

/// Error type for model store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Serialization/deserialization error.
    #[error("model serialization error: {0}")]
    Serde(String),
    /// Storage-level error (backend unreachable, lock poisoned, ...).
    #[error("model storage error: {0}")]
    Storage(String),
    /// Document not found.
    #[error("model not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serde(err.to_string())
    }
}

pub use in_memory::InMemoryModelStore;
pub use store::ModelStore;
