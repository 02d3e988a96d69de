//! InMemoryModelStore - HashMap-backed document store for tests and development.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::{Model, ModelError, ModelStore};

/// Internal stored representation of a document.
struct StoredModel {
    bytes: Vec<u8>,
    /// Insertion sequence, breaks ties between equal order keys.
    seq: u64,
}

/// In-memory document store backed by a HashMap.
///
/// Storage key is `"COLLECTION:id"`. Clone-friendly via Arc; clones share
/// the same documents.
#[derive(Clone)]
pub struct InMemoryModelStore {
    storage: Arc<RwLock<HashMap<String, StoredModel>>>,
    sequence: Arc<AtomicU64>,
}

impl Default for InMemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryModelStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    fn make_key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }

    /// Number of documents stored in the collection of `M`.
    pub fn len<M: Model>(&self) -> Result<usize, ModelError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))?;
        let prefix = format!("{}:", M::COLLECTION);
        Ok(storage.keys().filter(|key| key.starts_with(&prefix)).count())
    }
}

impl ModelStore for InMemoryModelStore {
    fn list_models<M: Model>(&self) -> Result<Vec<M>, ModelError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))?;

        let prefix = format!("{}:", M::COLLECTION);
        let mut documents = Vec::new();
        for (key, stored) in storage.iter() {
            if key.starts_with(&prefix) {
                let value: Value = serde_json::from_slice(&stored.bytes)?;
                documents.push((stored.seq, value));
            }
        }

        documents.sort_by(|(seq_a, a), (seq_b, b)| {
            compare_order_keys(a.get(M::ORDER_BY), b.get(M::ORDER_BY)).then(seq_a.cmp(seq_b))
        });

        documents
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value).map_err(ModelError::from))
            .collect()
    }

    fn create_model<M: Model>(&self, model: &M) -> Result<String, ModelError> {
        let id = Uuid::new_v4().to_string();
        let mut document = model.clone();
        document.set_id(&id);
        let bytes = serde_json::to_vec(&document)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))?;

        let seq = self.sequence.fetch_add(1, AtomicOrdering::Relaxed);
        storage.insert(Self::make_key(M::COLLECTION, &id), StoredModel { bytes, seq });

        Ok(id)
    }

    fn update_model<M: Model, P: Serialize + ?Sized>(
        &self,
        id: &str,
        patch: &P,
    ) -> Result<(), ModelError> {
        let Value::Object(fields) = serde_json::to_value(patch)? else {
            return Err(ModelError::Serde("patch must serialize to an object".into()));
        };

        let key = Self::make_key(M::COLLECTION, id);
        let mut storage = self
            .storage
            .write()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))?;

        let stored = storage.get_mut(&key).ok_or_else(|| ModelError::NotFound {
            collection: M::COLLECTION.to_string(),
            id: id.to_string(),
        })?;

        let mut document: Value = serde_json::from_slice(&stored.bytes)?;
        if let Value::Object(existing) = &mut document {
            existing.extend(fields);
        }

        // Round-trip through M so a patch can never store a malformed document
        let mut merged: M = serde_json::from_value(document)?;
        merged.set_id(id);
        stored.bytes = serde_json::to_vec(&merged)?;

        Ok(())
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        let key = Self::make_key(M::COLLECTION, id);
        let mut storage = self
            .storage
            .write()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))?;

        Ok(storage.remove(&key).is_some())
    }
}

/// Numbers sort before strings; documents missing the field sort last.
fn compare_order_keys(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            Some(Value::Number(_)) => 0,
            Some(Value::String(_)) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Null) | None => 4,
            Some(_) => 3,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
