//! Status transitions - the lending state machine of a file record.
//!
//! ```text
//!   DISPONIBLE --borrow--> PRESTADO --return--> DISPONIBLE
//!        \                    |
//!         \--retain--> RETENIDO <--retain--/
//!                        |
//!                        +--release--> DISPONIBLE
//! ```
//!
//! The engine never touches storage. Each transition validates against the
//! current record and yields a `StatusChange`: the exact partial document to
//! persist, with explicit nulls for the fields it clears.

mod clock;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::record::{is_present, FileRecord, FileStatus};

pub use clock::{Clock, FixedClock, SystemClock};

/// A named lending-state operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Borrow,
    Return,
    Retain,
    Release,
}

impl fmt::Display for StatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusAction::Borrow => "borrow",
            StatusAction::Return => "return",
            StatusAction::Retain => "retain",
            StatusAction::Release => "release",
        })
    }
}

/// The partial document a transition writes.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    #[serde(skip)]
    pub action: StatusAction,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_to: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_reason: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

impl StatusChange {
    fn new(action: StatusAction, status: FileStatus, now: DateTime<Utc>) -> Self {
        Self {
            action,
            status,
            borrowed_to: None,
            borrowed_date: None,
            return_date: None,
            retention_reason: None,
            updated_at: now,
        }
    }

    /// Apply the change to a local copy of the record.
    pub fn apply_to(&self, record: &mut FileRecord) {
        record.status = self.status;
        if let Some(borrowed_to) = &self.borrowed_to {
            record.borrowed_to = borrowed_to.clone();
        }
        if let Some(borrowed_date) = self.borrowed_date {
            record.borrowed_date = borrowed_date;
        }
        if let Some(return_date) = self.return_date {
            record.return_date = return_date;
        }
        if let Some(retention_reason) = &self.retention_reason {
            record.retention_reason = retention_reason.clone();
        }
        record.updated_at = Some(self.updated_at);
    }
}

/// Enforces valid status transitions and stamps their side effects.
#[derive(Clone)]
pub struct StatusTransitionEngine {
    clock: Arc<dyn Clock>,
}

impl Default for StatusTransitionEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for StatusTransitionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusTransitionEngine").finish_non_exhaustive()
    }
}

impl StatusTransitionEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Only available records can be lent. Retained and already borrowed
    /// records cannot.
    pub fn can_borrow(&self, record: &FileRecord) -> bool {
        record.status == FileStatus::Disponible
    }

    pub fn can_return(&self, record: &FileRecord) -> bool {
        record.status == FileStatus::Prestado
    }

    /// Retention overrides every state.
    pub fn can_retain(&self, _record: &FileRecord) -> bool {
        true
    }

    pub fn can_release(&self, record: &FileRecord) -> bool {
        record.status == FileStatus::Retenido
    }

    /// DISPONIBLE -> PRESTADO.
    pub fn borrow(&self, record: &FileRecord, borrower: &str) -> Result<StatusChange, RegistryError> {
        if !self.can_borrow(record) {
            return Err(invalid(record, StatusAction::Borrow));
        }
        let borrower = borrower.trim();
        if borrower.is_empty() {
            return Err(RegistryError::Validation("borrower name is required".into()));
        }

        let now = self.now();
        let mut change = StatusChange::new(StatusAction::Borrow, FileStatus::Prestado, now);
        change.borrowed_to = Some(Some(borrower.to_string()));
        change.borrowed_date = Some(Some(now));
        change.return_date = Some(None);
        Ok(change)
    }

    /// PRESTADO -> DISPONIBLE. `borrowedDate` stays as the loan history.
    pub fn give_back(&self, record: &FileRecord) -> Result<StatusChange, RegistryError> {
        if !self.can_return(record) {
            return Err(invalid(record, StatusAction::Return));
        }

        let now = self.now();
        let mut change = StatusChange::new(StatusAction::Return, FileStatus::Disponible, now);
        change.borrowed_to = Some(None);
        change.return_date = Some(Some(now));
        Ok(change)
    }

    /// Any state -> RETENIDO. Borrow fields are left as they are; retaining
    /// a retained record replaces its reason.
    pub fn retain(&self, record: &FileRecord, reason: &str) -> Result<StatusChange, RegistryError> {
        if !self.can_retain(record) {
            return Err(invalid(record, StatusAction::Retain));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(RegistryError::Validation("retention reason is required".into()));
        }

        let mut change = StatusChange::new(StatusAction::Retain, FileStatus::Retenido, self.now());
        change.retention_reason = Some(Some(reason.to_string()));
        Ok(change)
    }

    /// RETENIDO -> DISPONIBLE. A record retained while lent also has its
    /// loan closed, since only PRESTADO records may name a borrower.
    pub fn release(&self, record: &FileRecord) -> Result<StatusChange, RegistryError> {
        if !self.can_release(record) {
            return Err(invalid(record, StatusAction::Release));
        }

        let now = self.now();
        let mut change = StatusChange::new(StatusAction::Release, FileStatus::Disponible, now);
        change.retention_reason = Some(None);
        if is_present(&record.borrowed_to) {
            change.borrowed_to = Some(None);
            change.return_date = Some(Some(now));
        }
        Ok(change)
    }
}

fn invalid(record: &FileRecord, action: StatusAction) -> RegistryError {
    RegistryError::InvalidTransition {
        id: record.id.clone(),
        from: record.status,
        action,
    }
}
