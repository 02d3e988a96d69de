//! RecordStore - the session's view of the `files` collection.
//!
//! The store owns the full unfiltered record list, the active filters and
//! the pagination state. Every mutation goes through the persistence backend
//! first; local state changes only after the backend confirms, so a failed
//! call leaves the store exactly as it was.
//!
//! ## Example
//!
//! ```ignore
//! use archive_registry::{FilterField, InMemoryModelStore, NewFileRecord, RecordStore};
//!
//! let mut store = RecordStore::new(InMemoryModelStore::new());
//! store.load_all()?;
//!
//! let file = store.add(new_record)?;
//! store.borrow(&file.id, "Ana Pérez")?;
//!
//! store.set_filter(FilterField::Status, "PRESTADO");
//! let page = store.page();
//! ```

mod batch;
mod events;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::filter::{FilterField, FilterSet, Page, Pagination};
use crate::model::{ModelError, ModelStore};
use crate::record::{FileRecord, FileRecordPatch, NewFileRecord};
use crate::status::{Clock, StatusChange, StatusTransitionEngine};
use crate::transfer::ImportRow;

#[cfg(feature = "emitter")]
use crate::emitter::StoreEmitter;

pub use batch::{BatchFailure, BatchSummary};

/// Upper bound on delete requests in flight during `remove_many`.
pub const DELETE_CONCURRENCY: usize = 16;
pub use events::RecordEvent;

/// An update patch stamped with the modification time.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StampedPatch<'a> {
    #[serde(flatten)]
    patch: &'a FileRecordPatch,
    updated_at: DateTime<Utc>,
}

/// Single source of truth for one session's records and filters.
pub struct RecordStore<S> {
    backend: S,
    records: Vec<FileRecord>,
    filters: FilterSet,
    pagination: Pagination,
    page_sizes: Vec<usize>,
    engine: StatusTransitionEngine,
    #[cfg(feature = "emitter")]
    emitter: Option<StoreEmitter>,
}

impl<S: ModelStore> RecordStore<S> {
    /// Create an empty store with the default configuration.
    /// Call `load_all` to fetch the collection.
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, &RegistryConfig::default())
    }

    pub fn with_config(backend: S, config: &RegistryConfig) -> Self {
        Self {
            backend,
            records: Vec::new(),
            filters: FilterSet::new(),
            pagination: Pagination::new(config.page_size),
            page_sizes: config.page_sizes.clone(),
            engine: StatusTransitionEngine::default(),
            #[cfg(feature = "emitter")]
            emitter: None,
        }
    }

    /// Replace the time source used for timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.engine = StatusTransitionEngine::new(clock);
        self
    }

    /// Attach change listeners.
    #[cfg(feature = "emitter")]
    pub fn with_emitter(mut self, emitter: StoreEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    #[cfg(feature = "emitter")]
    pub fn emitter_mut(&mut self) -> Option<&mut StoreEmitter> {
        self.emitter.as_mut()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn engine(&self) -> &StatusTransitionEngine {
        &self.engine
    }

    /// The full unfiltered list, ordered by item number.
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&FileRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    fn index_of(&self, id: &str) -> Result<usize, RegistryError> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Fetch the whole collection and replace local state with it.
    pub fn load_all(&mut self) -> Result<usize, RegistryError> {
        let records = persisted("list", "*", self.backend.list_models::<FileRecord>())?;
        let count = records.len();
        self.records = records;
        self.after_change(vec![RecordEvent::FilesLoaded { count }]);
        debug!(count, "file records loaded");
        Ok(count)
    }

    /// Validate and create a record. It starts out DISPONIBLE.
    pub fn add(&mut self, input: NewFileRecord) -> Result<FileRecord, RegistryError> {
        let mut record = input.into_record(self.engine.now()).inspect_err(|err| {
            warn!(%err, "rejected new file record");
        })?;

        let id = persisted("create", "-", self.backend.create_model(&record))?;
        record.id = id;

        // Keep item-number order, new records after existing equal numbers
        let position = self
            .records
            .partition_point(|existing| existing.item_number <= record.item_number);
        self.records.insert(position, record.clone());

        debug!(id = %record.id, item_number = record.item_number, "file record added");
        self.after_change(vec![RecordEvent::FileAdded(record.clone())]);
        Ok(record)
    }

    /// Edit descriptive or location fields of a known record.
    ///
    /// Lending fields are out of reach of a patch, so only the folio range
    /// is rechecked. A stored record whose lending state is already
    /// inconsistent can still be edited.
    pub fn update(&mut self, id: &str, patch: FileRecordPatch) -> Result<FileRecord, RegistryError> {
        let index = self.index_of(id)?;
        patch.validate()?;
        let patch = patch.normalized();

        let mut updated = self.records[index].clone();
        patch.apply_to(&mut updated);
        updated.check_folios()?;
        let now = self.engine.now();
        updated.updated_at = Some(now);

        let stamped = StampedPatch {
            patch: &patch,
            updated_at: now,
        };
        persisted("update", id, self.backend.update_model::<FileRecord, _>(id, &stamped))?;

        let reorder = updated.item_number != self.records[index].item_number;
        self.records[index] = updated.clone();
        if reorder {
            self.records.sort_by_key(|record| record.item_number);
        }

        debug!(id, "file record updated");
        self.after_change(vec![RecordEvent::FileUpdated(updated.clone())]);
        Ok(updated)
    }

    /// Delete a record. It stays visible until the backend confirms.
    ///
    /// Deleting an id the backend no longer has is treated as success.
    pub fn remove(&mut self, id: &str) -> Result<(), RegistryError> {
        let existed = persisted("delete", id, self.backend.delete_model::<FileRecord>(id))?;
        if !existed {
            debug!(id, "file record was already deleted");
        }

        self.records.retain(|record| record.id != id);
        debug!(id, "file record removed");
        self.after_change(vec![RecordEvent::FileRemoved { id: id.to_string() }]);
        Ok(())
    }

    /// Delete several records with independent, concurrent requests.
    ///
    /// At most `DELETE_CONCURRENCY` requests run at once. Each deletion
    /// succeeds or fails on its own; the summary reports both. Only
    /// confirmed deletions leave local state.
    pub fn remove_many<I, T>(&mut self, ids: I) -> BatchSummary
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let ids: Vec<String> = ids
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let backend = &self.backend;

        let mut outcomes: Vec<(String, Result<bool, ModelError>)> = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(DELETE_CONCURRENCY) {
            thread::scope(|scope| {
                let pending: Vec<_> = chunk
                    .iter()
                    .map(|id| {
                        let spawned = thread::Builder::new()
                            .name("registry-delete".into())
                            .spawn_scoped(scope, move || backend.delete_model::<FileRecord>(id));
                        (id, spawned)
                    })
                    .collect();

                for (id, spawned) in pending {
                    let outcome = match spawned {
                        Ok(handle) => handle.join().unwrap_or_else(|_| {
                            Err(ModelError::Storage("delete request panicked".into()))
                        }),
                        Err(err) => Err(ModelError::Storage(format!(
                            "could not start delete request: {}",
                            err
                        ))),
                    };
                    outcomes.push((id.clone(), outcome));
                }
            });
        }

        let mut summary = BatchSummary::default();
        let mut events = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(_) => {
                    self.records.retain(|record| record.id != id);
                    events.push(RecordEvent::FileRemoved { id });
                    summary.record_success();
                }
                Err(err) => {
                    error!(%err, id = %id, "backend delete failed");
                    summary.record_failure(id, RegistryError::Persistence(err));
                }
            }
        }

        debug!(succeeded = summary.succeeded, failed = summary.failed, "batch delete finished");
        self.after_change(events);
        summary
    }

    /// Create every parsed row, one at a time. Rows that fail to parse or
    /// validate are reported without stopping the import. The collection is
    /// reloaded afterwards so local state matches the backend.
    pub fn import_rows(&mut self, rows: Vec<ImportRow>) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for row in rows {
            let label = format!("row {}", row.row);
            match row.record.and_then(|input| self.add(input)) {
                Ok(_) => summary.record_success(),
                Err(err) => summary.record_failure(label, err),
            }
        }

        if let Err(err) = self.load_all() {
            warn!(%err, "reload after import failed; keeping local records");
        }

        debug!(succeeded = summary.succeeded, failed = summary.failed, "import finished");
        self.after_change(vec![RecordEvent::FilesImported {
            succeeded: summary.succeeded,
            failed: summary.failed,
        }]);
        summary
    }

    // ------------------------------------------------------------------
    // Status transitions
    // ------------------------------------------------------------------

    pub fn can_borrow(&self, id: &str) -> Result<bool, RegistryError> {
        let index = self.index_of(id)?;
        Ok(self.engine.can_borrow(&self.records[index]))
    }

    pub fn can_return(&self, id: &str) -> Result<bool, RegistryError> {
        let index = self.index_of(id)?;
        Ok(self.engine.can_return(&self.records[index]))
    }

    /// Lend an available record.
    pub fn borrow(&mut self, id: &str, borrower: &str) -> Result<FileRecord, RegistryError> {
        self.transition(id, |engine, record| engine.borrow(record, borrower))
    }

    /// Mark a borrowed record as returned.
    pub fn give_back(&mut self, id: &str) -> Result<FileRecord, RegistryError> {
        self.transition(id, |engine, record| engine.give_back(record))
    }

    /// Put a record on hold with a reason.
    pub fn retain(&mut self, id: &str, reason: &str) -> Result<FileRecord, RegistryError> {
        self.transition(id, |engine, record| engine.retain(record, reason))
    }

    /// Lift a hold.
    pub fn release(&mut self, id: &str) -> Result<FileRecord, RegistryError> {
        self.transition(id, |engine, record| engine.release(record))
    }

    fn transition<F>(&mut self, id: &str, plan: F) -> Result<FileRecord, RegistryError>
    where
        F: FnOnce(&StatusTransitionEngine, &FileRecord) -> Result<StatusChange, RegistryError>,
    {
        let index = self.index_of(id)?;
        let change = plan(&self.engine, &self.records[index]).inspect_err(|err| {
            warn!(%err, id, "rejected status transition");
        })?;

        persisted("update status", id, self.backend.update_model::<FileRecord, _>(id, &change))?;

        let record = &mut self.records[index];
        change.apply_to(record);
        let record = record.clone();

        debug!(id, action = %change.action, status = %record.status, "file status changed");
        self.after_change(vec![RecordEvent::FileStatusChanged {
            id: id.to_string(),
            action: change.action,
            status: record.status,
        }]);
        Ok(record)
    }

    // ------------------------------------------------------------------
    // Filtering and pagination
    // ------------------------------------------------------------------

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Constrain `field` to values containing `value`. Empty clears it.
    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.filters.set(field, value);
        self.clamp_page();
    }

    /// `set_filter` keyed by the field's serialized name.
    pub fn set_filter_key(&mut self, key: &str, value: impl Into<String>) -> Result<(), RegistryError> {
        let field: FilterField = key.parse()?;
        self.set_filter(field, value);
        Ok(())
    }

    /// Free-text term matched against every field.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filters.set_search(term);
        self.clamp_page();
    }

    /// Replace all filters at once.
    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.clamp_page();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.clamp_page();
    }

    /// Records passing every active filter, in item-number order.
    pub fn filtered_records(&self) -> Vec<&FileRecord> {
        self.filters.apply(&self.records)
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// The current page of the filtered view.
    pub fn page(&self) -> Page<'_> {
        self.pagination.page(self.filtered_records())
    }

    pub fn set_page_index(&mut self, index: usize) {
        let total = self.filtered_records().len();
        self.pagination.set_page_index(index, total);
    }

    /// Switch page size; only the configured sizes are accepted.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), RegistryError> {
        if !self.page_sizes.contains(&page_size) {
            return Err(RegistryError::Validation(format!(
                "page size {} is not one of {:?}",
                page_size, self.page_sizes
            )));
        }
        self.pagination.set_page_size(page_size);
        Ok(())
    }

    pub fn next_page(&mut self) {
        let total = self.filtered_records().len();
        self.pagination.next(total);
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous();
    }

    fn clamp_page(&mut self) {
        let total = self.filtered_records().len();
        self.pagination.clamp(total);
    }

    fn after_change(&mut self, events: Vec<RecordEvent>) {
        self.clamp_page();

        #[cfg(feature = "emitter")]
        {
            if let Some(emitter) = &mut self.emitter {
                for event in events {
                    emitter.enqueue(event);
                }
                emitter.emit_queued();
            }
        }

        #[cfg(not(feature = "emitter"))]
        let _ = events;
    }
}

/// Log and convert a backend failure.
fn persisted<T>(operation: &str, id: &str, result: Result<T, ModelError>) -> Result<T, RegistryError> {
    result.map_err(|err| {
        error!(%err, operation, id, "backend call failed");
        RegistryError::Persistence(err)
    })
}
