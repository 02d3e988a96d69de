//! A backend wrapper that fails chosen calls on demand.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use archive_registry::{InMemoryModelStore, Model, ModelError, ModelStore};
use serde::Serialize;

#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryModelStore,
    failing_deletes: Arc<Mutex<HashSet<String>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    delete_delay_ms: Arc<AtomicUsize>,
    deletes_in_flight: Arc<AtomicUsize>,
    peak_deletes_in_flight: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deleting `id` fails from now on.
    pub fn fail_delete_of(&self, id: &str) {
        self.failing_deletes.lock().unwrap().insert(id.to_string());
    }

    /// Every create/update/delete fails while set.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every delete take `ms` milliseconds.
    pub fn slow_deletes(&self, ms: usize) {
        self.delete_delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Most deletes ever running at the same time.
    pub fn peak_deletes_in_flight(&self) -> usize {
        self.peak_deletes_in_flight.load(Ordering::SeqCst)
    }

    /// Backend calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryModelStore {
        &self.inner
    }

    fn check_write(&self) -> Result<(), ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ModelError::Storage("backend unavailable".into()));
        }
        Ok(())
    }
}

impl ModelStore for FlakyStore {
    fn list_models<M: Model>(&self) -> Result<Vec<M>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ModelError::Storage("backend unavailable".into()));
        }
        self.inner.list_models()
    }

    fn create_model<M: Model>(&self, model: &M) -> Result<String, ModelError> {
        self.check_write()?;
        self.inner.create_model(model)
    }

    fn update_model<M: Model, P: Serialize + ?Sized>(&self, id: &str, patch: &P) -> Result<(), ModelError> {
        self.check_write()?;
        self.inner.update_model::<M, P>(id, patch)
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        self.check_write()?;
        let running = self.deletes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_deletes_in_flight.fetch_max(running, Ordering::SeqCst);
        let delay = self.delete_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay as u64));
        }

        let result = if self.failing_deletes.lock().unwrap().contains(id) {
            Err(ModelError::Storage(format!("delete of {} timed out", id)))
        } else {
            self.inner.delete_model::<M>(id)
        };
        self.deletes_in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
