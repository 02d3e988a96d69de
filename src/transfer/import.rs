//! Spreadsheet rows into new records.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;

use super::*;
use crate::error::RegistryError;
use crate::record::{NewFileRecord, StorageUnit};

/// One spreadsheet row: column label to cell text.
pub type RawRow = HashMap<String, String>;

const DEFAULT_FOLIO: u32 = 1;
const DEFAULT_SUPPORT: &str = "PAPEL";

/// Outcome of parsing a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// Spreadsheet row number; the header is row 1.
    pub row: usize,
    pub record: Result<NewFileRecord, RegistryError>,
}

/// Header lookup that ignores case and surrounding whitespace.
struct Cells<'a> {
    cells: HashMap<String, &'a str>,
}

impl<'a> Cells<'a> {
    fn new(raw: &'a RawRow) -> Self {
        let cells = raw
            .iter()
            .map(|(label, value)| (label.trim().to_uppercase(), value.trim()))
            .collect();
        Self { cells }
    }

    fn get(&self, column: &str) -> Option<&'a str> {
        self.cells.get(column).copied().filter(|v| !v.is_empty())
    }

    fn text(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    fn parse<T: FromStr>(&self, column: &str, row: usize) -> Result<Option<T>, RegistryError> {
        self.get(column)
            .map(|value| {
                value.parse::<T>().map_err(|_| {
                    RegistryError::Validation(format!(
                        "row {}: invalid {} value {:?}",
                        row, column, value
                    ))
                })
            })
            .transpose()
    }

    fn date(&self, column: &str, row: usize) -> Result<Option<NaiveDate>, RegistryError> {
        self.get(column)
            .map(|value| {
                NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
                    RegistryError::Validation(format!(
                        "row {}: {} must be a YYYY-MM-DD date, got {:?}",
                        row, column, value
                    ))
                })
            })
            .transpose()
    }
}

/// Map spreadsheet rows to new records.
///
/// Blank cells take the registry defaults: item number 0, storage unit
/// CARPETA, folios 1 and support PAPEL. A cell that is present but cannot be
/// read fails its row only. Required fields are checked later, on `add`.
pub fn parse_rows(rows: &[RawRow]) -> Vec<ImportRow> {
    rows.iter()
        .enumerate()
        .map(|(index, raw)| {
            let row = index + 2;
            ImportRow {
                row,
                record: parse_row(raw, row),
            }
        })
        .collect()
}

fn parse_row(raw: &RawRow, row: usize) -> Result<NewFileRecord, RegistryError> {
    let cells = Cells::new(raw);

    Ok(NewFileRecord {
        item_number: cells.parse(COL_ITEM, row)?.unwrap_or(0),
        code: cells.text(COL_CODE),
        name: cells.text(COL_NAME),
        start_date: cells.date(COL_START_DATE, row)?,
        end_date: cells.date(COL_END_DATE, row)?,
        storage_unit: Some(cells.parse(COL_STORAGE_UNIT, row)?.unwrap_or(StorageUnit::Carpeta)),
        block: cells.text(COL_BLOCK),
        shelf: cells.text(COL_SHELF),
        folio_start: Some(cells.parse(COL_FOLIO_START, row)?.unwrap_or(DEFAULT_FOLIO)),
        folio_end: Some(cells.parse(COL_FOLIO_END, row)?.unwrap_or(DEFAULT_FOLIO)),
        support: Some(cells.text(COL_SUPPORT).unwrap_or_else(|| DEFAULT_SUPPORT.to_string())),
        box_number: None,
        folder_number: None,
        volume_number: None,
    })
}

/// The downloadable import template, with sample rows.
pub fn import_template() -> Sheet {
    let columns = [
        COL_ITEM,
        COL_CODE,
        COL_NAME,
        COL_START_DATE,
        COL_END_DATE,
        COL_BLOCK,
        COL_SHELF,
        COL_STORAGE_UNIT,
        COL_SUPPORT,
    ];
    let samples = [
        ["1", "DOC001", "Actas de Reunión", "2024-01-01", "2024-12-31", "A1", "E1", "CARPETA", "PAPEL"],
        ["2", "DOC002", "Correspondencia Interna", "2024-02-01", "2024-12-31", "B2", "E3", "TOMO", "PAPEL"],
        ["3", "DOC003", "Informes de Gestión", "2024-03-01", "2024-12-31", "C1", "E2", "CAJA", "PAPEL"],
    ];

    let mut sheet = Sheet::new("Plantilla", &columns);
    sheet.rows = samples
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    sheet
}
