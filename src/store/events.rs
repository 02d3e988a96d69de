//! Change notifications raised by the record store after confirmed mutations.

use serde::Serialize;

use crate::record::{FileRecord, FileStatus};
use crate::status::StatusAction;

/// A confirmed change to the record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum RecordEvent {
    FilesLoaded { count: usize },
    FileAdded(FileRecord),
    FileUpdated(FileRecord),
    FileRemoved { id: String },
    FileStatusChanged {
        id: String,
        action: StatusAction,
        status: FileStatus,
    },
    FilesImported { succeeded: usize, failed: usize },
}

impl RecordEvent {
    /// Emitted alongside every specific event type.
    pub const ANY: &'static str = "RecordsChanged";

    pub fn event_type(&self) -> &'static str {
        match self {
            RecordEvent::FilesLoaded { .. } => "FilesLoaded",
            RecordEvent::FileAdded(_) => "FileAdded",
            RecordEvent::FileUpdated(_) => "FileUpdated",
            RecordEvent::FileRemoved { .. } => "FileRemoved",
            RecordEvent::FileStatusChanged { .. } => "FileStatusChanged",
            RecordEvent::FilesImported { .. } => "FilesImported",
        }
    }
}
