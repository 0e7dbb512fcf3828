//! Workbook persistence round trips through a temporary directory.

use zipsheet_core::{
    CellValue, Sheet, Workbook, install_on_open_trigger,
    layout::{INTERFACE_SHEET, POSTAL_CODE_CELL},
};

#[test]
fn test_saved_workbook_keeps_cells_and_triggers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books").join("weather.json");

    let mut workbook = Workbook::template();
    workbook
        .sheet_mut(INTERFACE_SHEET)
        .unwrap()
        .set_value(POSTAL_CODE_CELL, "10001".into());
    install_on_open_trigger(&mut workbook);

    workbook.save(&path).unwrap();
    let loaded = Workbook::load(&path).unwrap();

    assert_eq!(loaded, workbook);
    assert_eq!(
        loaded.sheet(INTERFACE_SHEET).unwrap().value(POSTAL_CODE_CELL),
        CellValue::from("10001")
    );
    assert_eq!(loaded.triggers().len(), 1);
}

#[test]
fn test_missing_workbook_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = Workbook::load(&path).unwrap_err();

    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_corrupt_workbook_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Workbook::load(&path).unwrap_err();

    assert!(err.to_string().contains("Failed to parse workbook"));
}
