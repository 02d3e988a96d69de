//! Filtering - per-field substring filters and a free-text search term.
//!
//! Field access goes through `FilterField`, an explicit table from filter
//! keys to typed getters. Every value is coerced to a string and compared
//! case-insensitively; active filters are ANDed.

mod pagination;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::record::FileRecord;

pub use pagination::{Page, Pagination};

/// A filterable record field, keyed by its serialized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    ItemNumber,
    Code,
    Name,
    StartDate,
    EndDate,
    StorageUnit,
    Block,
    Shelf,
    FolioStart,
    FolioEnd,
    Support,
    Status,
    BorrowedTo,
    RetentionReason,
    BoxNumber,
    FolderNumber,
    VolumeNumber,
}

impl FilterField {
    pub const ALL: [FilterField; 17] = [
        FilterField::ItemNumber,
        FilterField::Code,
        FilterField::Name,
        FilterField::StartDate,
        FilterField::EndDate,
        FilterField::StorageUnit,
        FilterField::Block,
        FilterField::Shelf,
        FilterField::FolioStart,
        FilterField::FolioEnd,
        FilterField::Support,
        FilterField::Status,
        FilterField::BorrowedTo,
        FilterField::RetentionReason,
        FilterField::BoxNumber,
        FilterField::FolderNumber,
        FilterField::VolumeNumber,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FilterField::ItemNumber => "itemNumber",
            FilterField::Code => "code",
            FilterField::Name => "name",
            FilterField::StartDate => "startDate",
            FilterField::EndDate => "endDate",
            FilterField::StorageUnit => "storageUnit",
            FilterField::Block => "block",
            FilterField::Shelf => "shelf",
            FilterField::FolioStart => "folioStart",
            FilterField::FolioEnd => "folioEnd",
            FilterField::Support => "support",
            FilterField::Status => "status",
            FilterField::BorrowedTo => "borrowedTo",
            FilterField::RetentionReason => "retentionReason",
            FilterField::BoxNumber => "boxNumber",
            FilterField::FolderNumber => "folderNumber",
            FilterField::VolumeNumber => "volumeNumber",
        }
    }

    /// The field's value as a string, or `None` when unset.
    pub fn value_of(&self, record: &FileRecord) -> Option<String> {
        match self {
            FilterField::ItemNumber => Some(record.item_number.to_string()),
            FilterField::Code => record.code.clone(),
            FilterField::Name => Some(record.name.clone()),
            FilterField::StartDate => record.start_date.map(|d| d.to_string()),
            FilterField::EndDate => record.end_date.map(|d| d.to_string()),
            FilterField::StorageUnit => Some(record.storage_unit.label().to_string()),
            FilterField::Block => record.block.clone(),
            FilterField::Shelf => record.shelf.clone(),
            FilterField::FolioStart => Some(record.folio_start.to_string()),
            FilterField::FolioEnd => Some(record.folio_end.to_string()),
            FilterField::Support => Some(record.support.clone()),
            FilterField::Status => Some(record.status.label().to_string()),
            FilterField::BorrowedTo => record.borrowed_to.clone(),
            FilterField::RetentionReason => record.retention_reason.clone(),
            FilterField::BoxNumber => record.box_number.clone(),
            FilterField::FolderNumber => record.folder_number.clone(),
            FilterField::VolumeNumber => record.volume_number.clone(),
        }
    }

    /// Case-insensitive substring match; unset fields never match.
    pub fn matches(&self, record: &FileRecord, needle_lower: &str) -> bool {
        self.value_of(record)
            .is_some_and(|value| value.to_lowercase().contains(needle_lower))
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterField {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RegistryError::Validation(format!("unknown filter field `{}`", s)))
    }
}

/// The active filters of a session. Transient, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    filters: BTreeMap<FilterField, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field filter. An empty value removes the constraint.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.filters.remove(&field);
        } else {
            self.filters.insert(field, value);
        }
    }

    /// Set the free-text term matched against every field.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.search = if term.trim().is_empty() { None } else { Some(term) };
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.filters.get(&field).map(String::as_str)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn clear(&mut self) {
        self.filters.clear();
        self.search = None;
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.search.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.filters.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Whether a record passes every active filter and the search term.
    pub fn matches(&self, record: &FileRecord) -> bool {
        let fields_match = self
            .filters
            .iter()
            .all(|(field, value)| field.matches(record, &value.to_lowercase()));

        fields_match
            && self.search.as_ref().map_or(true, |term| {
                let term = term.to_lowercase();
                FilterField::ALL.iter().any(|field| field.matches(record, &term))
            })
    }

    /// The records passing the filters, in their original order.
    pub fn apply<'a>(&self, records: &'a [FileRecord]) -> Vec<&'a FileRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}
