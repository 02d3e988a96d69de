//! Pagination over the filtered view.

use serde::{Deserialize, Serialize};

use crate::record::FileRecord;

/// 0-based page index and page size. Derived state, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Pagination {
    /// A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total` rows; zero when there are none.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    fn last_index(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    /// Pull the index back inside `[0, page_count - 1]`.
    pub fn clamp(&mut self, total: usize) {
        self.page_index = self.page_index.min(self.last_index(total));
    }

    pub fn set_page_index(&mut self, index: usize, total: usize) {
        self.page_index = index;
        self.clamp(total);
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, total: usize) -> bool {
        self.page_index < self.last_index(total)
    }

    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next(&mut self, total: usize) {
        if self.can_next(total) {
            self.page_index += 1;
        }
    }

    pub fn first(&mut self) {
        self.page_index = 0;
    }

    pub fn last(&mut self, total: usize) {
        self.page_index = self.last_index(total);
    }

    /// Slice out the current page of already-filtered rows.
    pub fn page<'a>(&self, rows: Vec<&'a FileRecord>) -> Page<'a> {
        let total = rows.len();
        let page_index = self.page_index.min(self.last_index(total));
        let records = rows
            .into_iter()
            .skip(page_index * self.page_size)
            .take(self.page_size)
            .collect();

        Page {
            records,
            page_index,
            page_size: self.page_size,
            page_count: self.page_count(total),
            total,
        }
    }
}

/// One page of the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a> {
    pub records: Vec<&'a FileRecord>,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    /// Rows in the filtered view, across all pages.
    pub total: usize,
}
