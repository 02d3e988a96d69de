//! ModelStore - Abstract document storage for models.

use serde::Serialize;

use super::{Model, ModelError};

/// Abstract document storage, one collection per model type.
///
/// Calls are blocking round trips; implementations must be shareable across
/// threads so independent requests can run concurrently.
pub trait ModelStore: Send + Sync {
    /// List every model in the collection, ordered ascending by `M::ORDER_BY`.
    fn list_models<M: Model>(&self) -> Result<Vec<M>, ModelError>;

    /// Insert a new document and return the id assigned to it.
    /// Any id already present on `model` is ignored.
    fn create_model<M: Model>(&self, model: &M) -> Result<String, ModelError>;

    /// Shallow-merge `patch` into an existing document.
    ///
    /// `patch` must serialize to a JSON object. Keys set to `null` clear the
    /// field; absent keys are left untouched. Fails with `NotFound` if no
    /// document has this id.
    fn update_model<M: Model, P: Serialize + ?Sized>(
        &self,
        id: &str,
        patch: &P,
    ) -> Result<(), ModelError>;

    /// Delete a document by ID. Returns true if it existed.
    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError>;
}
