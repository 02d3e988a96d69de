//! File records - the archival unit tracked by the registry.
//!
//! Records are stored as documents of the `files` collection with camelCase
//! field names. `NewFileRecord` is what callers hand to `RecordStore::add`,
//! `FileRecordPatch` is what they hand to `RecordStore::update`.

mod input;
mod labels;

use archive_registry_macros::Model;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

pub use input::{FileRecordPatch, NewFileRecord};
pub use labels::{FileStatus, ParseLabelError, StorageUnit};

/// One archival file/series entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "files", order_by = "itemNumber")]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Assigned by the persistence backend, immutable afterwards.
    #[model(id)]
    #[serde(default)]
    pub id: String,
    pub item_number: i64,
    pub code: Option<String>,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub storage_unit: StorageUnit,
    pub block: Option<String>,
    pub shelf: Option<String>,
    pub folio_start: u32,
    pub folio_end: u32,
    pub support: String,
    #[serde(default)]
    pub status: FileStatus,
    pub borrowed_to: Option<String>,
    pub borrowed_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
    pub retention_reason: Option<String>,
    pub box_number: Option<String>,
    pub folder_number: Option<String>,
    pub volume_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn is_borrowed(&self) -> bool {
        self.status == FileStatus::Prestado
    }

    pub fn is_retained(&self) -> bool {
        self.status == FileStatus::Retenido
    }

    /// Verify the cross-field invariants of a stored record.
    ///
    /// A record retained while lent keeps its borrower until released, so a
    /// borrower is accepted under RETENIDO as well as PRESTADO.
    pub fn check_invariants(&self) -> Result<(), RegistryError> {
        self.check_folios()?;
        self.check_lending()
    }

    /// The folio range must not be inverted.
    pub fn check_folios(&self) -> Result<(), RegistryError> {
        if self.folio_start > self.folio_end {
            return Err(RegistryError::Validation(format!(
                "folioStart ({}) must not exceed folioEnd ({})",
                self.folio_start, self.folio_end
            )));
        }
        Ok(())
    }

    /// Borrower and retention reason must agree with the status.
    pub fn check_lending(&self) -> Result<(), RegistryError> {
        let has_borrower = is_present(&self.borrowed_to);
        match self.status {
            FileStatus::Prestado if !has_borrower => Err(RegistryError::Validation(
                "a borrowed record must name its borrower".into(),
            )),
            FileStatus::Disponible if has_borrower => Err(RegistryError::Validation(
                "an available record cannot have a borrower".into(),
            )),
            _ => Ok(()),
        }?;

        let has_reason = is_present(&self.retention_reason);
        match (self.status, has_reason) {
            (FileStatus::Retenido, false) => Err(RegistryError::Validation(
                "a retained record must carry a retention reason".into(),
            )),
            (FileStatus::Disponible | FileStatus::Prestado, true) => Err(
                RegistryError::Validation("only retained records carry a retention reason".into()),
            ),
            _ => Ok(()),
        }
    }
}

pub(crate) fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
