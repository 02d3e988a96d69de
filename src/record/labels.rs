//! Enumerated labels stored on file records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A label string that does not name any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} label: {value:?}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

/// Physical containment type of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageUnit {
    Caja,
    #[default]
    Carpeta,
    Tomo,
    Otro,
}

impl StorageUnit {
    pub const ALL: [StorageUnit; 4] = [
        StorageUnit::Caja,
        StorageUnit::Carpeta,
        StorageUnit::Tomo,
        StorageUnit::Otro,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StorageUnit::Caja => "CAJA",
            StorageUnit::Carpeta => "CARPETA",
            StorageUnit::Tomo => "TOMO",
            StorageUnit::Otro => "OTRO",
        }
    }
}

impl fmt::Display for StorageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StorageUnit {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|unit| unit.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseLabelError {
                kind: "storage unit",
                value: s.to_string(),
            })
    }
}

/// Lending state of a record. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileStatus {
    #[default]
    Disponible,
    Prestado,
    Retenido,
}

impl FileStatus {
    pub const ALL: [FileStatus; 3] = [
        FileStatus::Disponible,
        FileStatus::Prestado,
        FileStatus::Retenido,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Disponible => "DISPONIBLE",
            FileStatus::Prestado => "PRESTADO",
            FileStatus::Retenido => "RETENIDO",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FileStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseLabelError {
                kind: "status",
                value: s.to_string(),
            })
    }
}
