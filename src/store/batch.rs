//! Aggregated outcome of multi-record operations.

use serde::Serialize;

use crate::error::RegistryError;

/// One item of a batch that did not go through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    /// Record id, or `row N` for imports.
    pub item: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: RegistryError,
}

/// Per-item results of a batch whose items succeed or fail independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, item: impl Into<String>, error: RegistryError) {
        self.failed += 1;
        self.failures.push(BatchFailure {
            item: item.into(),
            error,
        });
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

fn serialize_error<S: serde::Serializer>(error: &RegistryError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
