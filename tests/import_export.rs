mod support;

use std::collections::HashMap;

use archive_registry::transfer::{
    export_file_name, export_sheet, import_template, parse_rows, Exporter, JsonExporter, RawRow,
    Sheet, COL_BORROWED_TO, COL_NAME, COL_STATUS,
};
use archive_registry::{FileStatus, RegistryError, StorageUnit};
use support::{flaky_store, new_record};

fn row(cells: &[(&str, &str)]) -> RawRow {
    cells
        .iter()
        .map(|(label, value)| (label.to_string(), value.to_string()))
        .collect::<HashMap<_, _>>()
}

#[test]
fn import_adds_good_rows_and_reports_bad_ones() {
    let mut store = flaky_store();
    let rows = vec![
        row(&[("NO. ITEM", "2"), ("NOMBRE DE LAS SERIES", "Informes"), ("UNIDAD DE CONSERVACIÓN", "CAJA")]),
        row(&[("NO. ITEM", "dos"), ("NOMBRE DE LAS SERIES", "Roto")]),
        row(&[("NO. ITEM", "3"), ("CÓDIGO", "DOC009")]),
        row(&[("No. ITEM", "1"), ("Nombre de las Series", "Actas"), ("FOLIO INICIAL", "4"), ("FOLIO FINAL", "20")]),
    ];

    let summary = store.import_rows(parse_rows(&rows));

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 2);
    let failed_rows: Vec<&str> = summary.failures.iter().map(|f| f.item.as_str()).collect();
    assert_eq!(failed_rows, vec!["row 3", "row 4"]);
    assert!(summary
        .failures
        .iter()
        .all(|f| matches!(f.error, RegistryError::Validation(_))));

    let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Actas", "Informes"]);
    let actas = &store.records()[0];
    assert_eq!(actas.folio_start, 4);
    assert_eq!(actas.folio_end, 20);
    assert_eq!(actas.support, "PAPEL");
    assert_eq!(store.records()[1].storage_unit, StorageUnit::Caja);
}

#[test]
fn template_imports_cleanly() {
    let mut store = flaky_store();
    let template = import_template();
    let rows: Vec<RawRow> = template
        .rows
        .iter()
        .map(|cells| template.columns.iter().cloned().zip(cells.iter().cloned()).collect())
        .collect();

    let summary = store.import_rows(parse_rows(&rows));
    assert!(summary.is_complete_success());
    assert_eq!(store.records().len(), 3);
}

#[test]
fn export_reflects_lending_state() {
    let mut store = flaky_store();
    let file = store.add(new_record(1, "Actas")).unwrap();
    store.add(new_record(2, "Informes")).unwrap();
    store.borrow(&file.id, "Ana").unwrap();

    let sheet = export_sheet("Archivos", store.records(), None);
    assert_eq!(sheet.cell(0, COL_STATUS), Some(FileStatus::Prestado.label()));
    assert_eq!(sheet.cell(0, COL_BORROWED_TO), Some("Ana"));
    assert_eq!(sheet.cell(1, COL_BORROWED_TO), Some("-"));

    let bytes = JsonExporter.export(&sheet).unwrap();
    let decoded: Sheet = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(decoded.cell(1, COL_NAME), Some("Informes"));
    assert_eq!(
        export_file_name("archivos", None, JsonExporter.extension()),
        "archivos.json"
    );
}
