//! Tabular import and export of file records.
//!
//! Records leave and enter the registry as a [`Sheet`]: a named grid of
//! string cells under the fixed Spanish column labels the archive staff
//! work with. Rendering a sheet to a concrete file format is an
//! [`Exporter`]'s job.

mod import;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::FileRecord;

pub use import::{import_template, parse_rows, ImportRow, RawRow};

pub const COL_ITEM: &str = "NO. ITEM";
pub const COL_CODE: &str = "CÓDIGO";
pub const COL_NAME: &str = "NOMBRE DE LAS SERIES";
pub const COL_START_DATE: &str = "FECHA INICIAL";
pub const COL_END_DATE: &str = "FECHA FINAL";
pub const COL_BLOCK: &str = "BLOQUE";
pub const COL_SHELF: &str = "ENTREPAÑO";
pub const COL_STORAGE_UNIT: &str = "UNIDAD DE CONSERVACIÓN";
pub const COL_SUPPORT: &str = "SOPORTE";
pub const COL_STATUS: &str = "ESTADO";
pub const COL_BORROWED_TO: &str = "PRESTADO A";
pub const COL_FOLIO_START: &str = "FOLIO INICIAL";
pub const COL_FOLIO_END: &str = "FOLIO FINAL";

/// Export columns, in order.
pub const EXPORT_COLUMNS: [&str; 11] = [
    COL_ITEM,
    COL_CODE,
    COL_NAME,
    COL_START_DATE,
    COL_END_DATE,
    COL_BLOCK,
    COL_SHELF,
    COL_STORAGE_UNIT,
    COL_SUPPORT,
    COL_STATUS,
    COL_BORROWED_TO,
];

/// Placeholder for empty optional cells.
pub const EMPTY_CELL: &str = "-";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A named grid of string cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Cell at `row` under the `column` label.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the export sheet. With a `year`, only records whose start date
/// falls in that year are included.
pub fn export_sheet<'a, I>(sheet_name: &str, records: I, year: Option<i32>) -> Sheet
where
    I: IntoIterator<Item = &'a FileRecord>,
{
    let mut sheet = Sheet::new(sheet_name, &EXPORT_COLUMNS);
    sheet.rows = records
        .into_iter()
        .filter(|record| match year {
            Some(year) => record.start_date.map(|d| d.year()) == Some(year),
            None => true,
        })
        .map(export_row)
        .collect();
    sheet
}

fn export_row(record: &FileRecord) -> Vec<String> {
    vec![
        record.item_number.to_string(),
        text_cell(record.code.as_deref()),
        record.name.clone(),
        date_cell(record.start_date),
        date_cell(record.end_date),
        text_cell(record.block.as_deref()),
        text_cell(record.shelf.as_deref()),
        record.storage_unit.label().to_string(),
        record.support.clone(),
        record.status.label().to_string(),
        text_cell(record.borrowed_to.as_deref()),
    ]
}

fn text_cell(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}

fn date_cell(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// `archivos.xlsx`, or `archivos_2024.xlsx` for a single year.
pub fn export_file_name(stem: &str, year: Option<i32>, extension: &str) -> String {
    match year {
        Some(year) => format!("{}_{}.{}", stem, year, extension),
        None => format!("{}.{}", stem, extension),
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode sheet: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serializes a sheet to one downloadable format.
pub trait Exporter {
    fn extension(&self) -> &'static str;

    fn export(&self, sheet: &Sheet) -> Result<Vec<u8>, ExportError>;
}

/// Pretty-printed JSON, the sheet as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn export(&self, sheet: &Sheet) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(sheet)?)
    }
}
