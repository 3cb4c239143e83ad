//! Workbook persistence tests (rust_xlsxwriter out, calamine back in)

use ase_migration::sheet::xlsx;
use ase_migration::utils::constants::HEADER_BACKGROUND;
use ase_migration::{
    CellKind, ErrorCode, HorizontalAlignment, MemoryWorkbook, PolicyRow, SheetWriter, Spreadsheet,
};
use calamine::{open_workbook, Data, Reader, Xlsx};

fn row(policy: &str, evaluating: &str) -> PolicyRow {
    PolicyRow {
        config_id: 1,
        config_name: "CfgA".to_string(),
        production_version: 2,
        policy_id: policy.to_string(),
        policy_name: format!("Policy {}", policy),
        current: "KRS".to_string(),
        eval: "ENABLED".to_string(),
        evaluating: evaluating.to_string(),
        expires: String::new(),
        mode: "KRS".to_string(),
    }
}

fn report_book() -> MemoryWorkbook {
    let mut book = MemoryWorkbook::new();
    book.insert_sheet("Notes").unwrap();
    book.set_value("Notes", 1, 1, "free text").unwrap();

    book.insert_sheet("ACME").unwrap();
    book.set_active_sheet("ACME").unwrap();
    SheetWriter::write_customer_sheet(&mut book, "ACME", &[row("p1", "ASE_AUTO"), row("p2", "")])
        .unwrap();
    book
}

#[test]
fn test_save_and_reload_keeps_sheets_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    xlsx::save(&report_book(), &path).unwrap();
    let loaded = xlsx::load(&path).unwrap();

    assert_eq!(loaded.sheet_names(), vec!["Notes", "ACME"]);
    assert_eq!(loaded.sheet("Notes").unwrap().value(1, 1), "free text");

    let acme = loaded.sheet("ACME").unwrap();
    assert_eq!(acme.row_values(1)[7], "Mode");
    assert_eq!(acme.value(2, 2), "p1");
    assert_eq!(acme.value(2, 6), "ASE_AUTO");
    assert_eq!(acme.value(3, 2), "p2");
    assert_eq!(acme.value(3, 6), "");
    assert_eq!(acme.last_row(), 3);
}

#[test]
fn test_reload_restores_report_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    xlsx::save(&report_book(), &path).unwrap();
    let loaded = xlsx::load(&path).unwrap();

    let acme = loaded.sheet("ACME").unwrap();
    assert_eq!(acme.column_width(3), Some(270));
    assert_eq!(acme.cell(1, 1).unwrap().background, Some(HEADER_BACKGROUND));
    assert_eq!(
        acme.cell(3, 8).unwrap().alignment,
        Some(HorizontalAlignment::Center)
    );

    let notes = loaded.sheet("Notes").unwrap();
    assert_eq!(notes.column_width(1), None);
    assert_eq!(notes.cell(1, 1).unwrap().background, None);
}

#[test]
fn test_reloaded_workbook_rejects_duplicate_customer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    xlsx::save(&report_book(), &path).unwrap();
    let mut loaded = xlsx::load(&path).unwrap();

    let err = loaded.insert_sheet("ACME").unwrap_err();
    assert_eq!(err.code, ErrorCode::SheetExists);
    loaded.insert_sheet("Globex").unwrap();

    xlsx::save(&loaded, &path).unwrap();
    assert_eq!(
        xlsx::load(&path).unwrap().sheet_names(),
        vec!["Notes", "ACME", "Globex"]
    );
}

#[test]
fn test_other_tabs_keep_numbers_booleans_and_formulas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let budget = workbook.add_worksheet();
    budget.set_name("Budget").unwrap();
    budget.write_number(0, 0, 42.5).unwrap();
    budget.write_formula(1, 0, "=A1*2").unwrap();
    budget.write_boolean(2, 0, true).unwrap();
    budget.write_string(3, 0, "note").unwrap();
    workbook.save(&path).unwrap();

    let mut book = xlsx::load(&path).unwrap();
    let budget = book.sheet("Budget").unwrap();
    assert_eq!(budget.cell(1, 1).unwrap().kind, CellKind::Number(42.5));
    assert_eq!(budget.value(1, 1), "42.5");
    assert_eq!(
        budget.cell(2, 1).unwrap().kind,
        CellKind::Formula("A1*2".to_string())
    );
    assert_eq!(budget.cell(3, 1).unwrap().kind, CellKind::Boolean(true));

    book.insert_sheet("ACME").unwrap();
    xlsx::save(&book, &path).unwrap();

    let mut reopened: Xlsx<_> = open_workbook(&path).unwrap();
    let values = reopened.worksheet_range("Budget").unwrap();
    assert_eq!(values.get_value((0, 0)), Some(&Data::Float(42.5)));
    assert_eq!(values.get_value((2, 0)), Some(&Data::Bool(true)));
    assert_eq!(values.get_value((3, 0)), Some(&Data::String("note".to_string())));

    let formulas = reopened.worksheet_formula("Budget").unwrap();
    assert_eq!(formulas.get_value((1, 0)), Some(&"A1*2".to_string()));
}

#[test]
fn test_load_or_new_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let book = xlsx::load_or_new(&dir.path().join("missing.xlsx")).unwrap();
    assert!(book.sheet_names().is_empty());
}

#[test]
fn test_load_rejects_non_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bogus.xlsx");
    std::fs::write(&path, b"not a zip").unwrap();

    let err = xlsx::load(&path).unwrap_err();
    assert_eq!(err.code, ErrorCode::WorkbookIo);
}
