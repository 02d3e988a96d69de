//! Caller-supplied inputs for creating and editing records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{is_present, FileRecord, FileStatus, StorageUnit};
use crate::error::RegistryError;

/// Fields of a record about to be created.
///
/// Required fields are optional at the type level so a missing one is
/// reported by name instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFileRecord {
    #[serde(default)]
    pub item_number: i64,
    pub code: Option<String>,
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub storage_unit: Option<StorageUnit>,
    pub block: Option<String>,
    pub shelf: Option<String>,
    pub folio_start: Option<u32>,
    pub folio_end: Option<u32>,
    pub support: Option<String>,
    pub box_number: Option<String>,
    pub folder_number: Option<String>,
    pub volume_number: Option<String>,
}

impl NewFileRecord {
    /// Check that every required field is present.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if !is_present(&self.name) {
            return Err(RegistryError::missing("name"));
        }
        if self.storage_unit.is_none() {
            return Err(RegistryError::missing("storageUnit"));
        }
        if !is_present(&self.support) {
            return Err(RegistryError::missing("support"));
        }
        let folio_start = self
            .folio_start
            .ok_or_else(|| RegistryError::missing("folioStart"))?;
        let folio_end = self
            .folio_end
            .ok_or_else(|| RegistryError::missing("folioEnd"))?;
        if folio_start > folio_end {
            return Err(RegistryError::Validation(format!(
                "folioStart ({}) must not exceed folioEnd ({})",
                folio_start, folio_end
            )));
        }
        Ok(())
    }

    /// Build the record to persist: available, no lending or retention
    /// state, id left for the backend to assign.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<FileRecord, RegistryError> {
        self.validate()?;

        // validate() guarantees the unwrap_or defaults are never taken
        Ok(FileRecord {
            id: String::new(),
            item_number: self.item_number,
            code: self.code,
            name: self.name.unwrap_or_default().trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            storage_unit: self.storage_unit.unwrap_or_default(),
            block: self.block,
            shelf: self.shelf,
            folio_start: self.folio_start.unwrap_or_default(),
            folio_end: self.folio_end.unwrap_or_default(),
            support: self.support.unwrap_or_default().trim().to_string(),
            status: FileStatus::Disponible,
            borrowed_to: None,
            borrowed_date: None,
            return_date: None,
            retention_reason: None,
            box_number: self.box_number,
            folder_number: self.folder_number,
            volume_number: self.volume_number,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

/// Partial edit of a record's descriptive and location fields.
///
/// Absent fields are untouched. Optional fields take `Some(None)` (JSON
/// `null`) to clear them. Lending and retention fields are not editable
/// here; they change only through status transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_number: Option<i64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub code: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_unit: Option<StorageUnit>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub block: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub shelf: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folio_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folio_end: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub box_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub folder_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub volume_number: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl FileRecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == FileRecordPatch::default()
    }

    /// Reject patches that would blank a required field.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(RegistryError::missing("name"));
        }
        if self.support.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(RegistryError::missing("support"));
        }
        Ok(())
    }

    /// Trim the required text fields the way `NewFileRecord` does.
    pub fn normalized(mut self) -> Self {
        if let Some(name) = &mut self.name {
            *name = name.trim().to_string();
        }
        if let Some(support) = &mut self.support {
            *support = support.trim().to_string();
        }
        self
    }

    /// Apply the patch to a local copy of a record.
    pub fn apply_to(&self, record: &mut FileRecord) {
        if let Some(item_number) = self.item_number {
            record.item_number = item_number;
        }
        if let Some(code) = &self.code {
            record.code = code.clone();
        }
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(start_date) = self.start_date {
            record.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            record.end_date = end_date;
        }
        if let Some(storage_unit) = self.storage_unit {
            record.storage_unit = storage_unit;
        }
        if let Some(block) = &self.block {
            record.block = block.clone();
        }
        if let Some(shelf) = &self.shelf {
            record.shelf = shelf.clone();
        }
        if let Some(folio_start) = self.folio_start {
            record.folio_start = folio_start;
        }
        if let Some(folio_end) = self.folio_end {
            record.folio_end = folio_end;
        }
        if let Some(support) = &self.support {
            record.support = support.clone();
        }
        if let Some(box_number) = &self.box_number {
            record.box_number = box_number.clone();
        }
        if let Some(folder_number) = &self.folder_number {
            record.folder_number = folder_number.clone();
        }
        if let Some(volume_number) = &self.volume_number {
            record.volume_number = volume_number.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::record;
    use chrono::TimeZone;
    use serde_json::json;

    fn actas() -> NewFileRecord {
        NewFileRecord {
            item_number: 1,
            name: Some("Actas".into()),
            storage_unit: Some(StorageUnit::Carpeta),
            support: Some("PAPEL".into()),
            folio_start: Some(1),
            folio_end: Some(10),
            ..Default::default()
        }
    }

    #[test]
    fn into_record_starts_available() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let file = actas().into_record(now).unwrap();

        assert_eq!(file.status, FileStatus::Disponible);
        assert!(file.id.is_empty());
        assert!(file.borrowed_to.is_none());
        assert!(file.retention_reason.is_none());
        assert_eq!(file.created_at, Some(now));
    }

    #[test]
    fn missing_required_fields_are_named() {
        let cases: [(&str, fn(&mut NewFileRecord)); 5] = [
            ("name", |r| r.name = Some("   ".into())),
            ("storageUnit", |r| r.storage_unit = None),
            ("support", |r| r.support = None),
            ("folioStart", |r| r.folio_start = None),
            ("folioEnd", |r| r.folio_end = None),
        ];

        for (field, mutate) in cases {
            let mut input = actas();
            mutate(&mut input);
            let err = input.validate().unwrap_err();
            assert!(err.to_string().contains(field), "{err} should mention {field}");
        }
    }

    #[test]
    fn inverted_folios_rejected() {
        let mut input = actas();
        input.folio_start = Some(11);
        assert!(matches!(input.validate(), Err(RegistryError::Validation(_))));
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: FileRecordPatch =
            serde_json::from_value(json!({ "code": null, "name": "Nuevo" })).unwrap();
        assert_eq!(patch.code, Some(None));
        assert_eq!(patch.block, None);

        let mut file = record("a", 1, "Actas");
        file.code = Some("DOC001".into());
        file.block = Some("A1".into());
        patch.apply_to(&mut file);

        assert_eq!(file.code, None);
        assert_eq!(file.block.as_deref(), Some("A1"));
        assert_eq!(file.name, "Nuevo");
    }

    #[test]
    fn patch_serializes_only_present_keys() {
        let patch = FileRecordPatch {
            shelf: Some(None),
            folio_end: Some(12),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "shelf": null, "folioEnd": 12 }));
        assert!(!patch.is_empty());
        assert!(FileRecordPatch::default().is_empty());
    }

    #[test]
    fn normalized_trims_required_text() {
        let patch = FileRecordPatch {
            name: Some("  Actas  ".into()),
            support: Some("DIGITAL ".into()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(patch.name.as_deref(), Some("Actas"));
        assert_eq!(patch.support.as_deref(), Some("DIGITAL"));
    }

    #[test]
    fn patch_cannot_blank_name() {
        let patch = FileRecordPatch {
            name: Some("".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
