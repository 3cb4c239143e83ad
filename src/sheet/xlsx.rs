//! Workbook persistence
//!
//! `save` writes every sheet of a `MemoryWorkbook` with rust_xlsxwriter.
//! `load` reopens a saved workbook with calamine. Numbers, booleans, dates
//! and formulas keep their type across a load/save cycle. Calamine does not
//! expose cell styles, so sheets that carry the report header get their
//! layout re-applied; other sheets lose their formatting.

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Color, Format, FormatAlign, Formula, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info};

use super::layout::is_report_header;
use super::{Cell, CellKind, HorizontalAlignment, MemoryWorkbook, SheetWriter, Spreadsheet};
use crate::models::{AppError, AppResult};

/// Number format for reopened date cells
const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Write the whole workbook to `path`, replacing any existing file
pub fn save(book: &MemoryWorkbook, path: &Path) -> AppResult<()> {
    let mut workbook = Workbook::new();

    for (index, sheet) in book.sheets().iter().enumerate() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name())?;

        for (column, pixels) in sheet.column_widths() {
            worksheet.set_column_width_pixels(column - 1, pixels)?;
        }

        for (row, column, cell) in sheet.cells() {
            write_cell(worksheet, row - 1, column - 1, cell)?;
        }

        if book.active_index() == Some(index) {
            worksheet.set_active(true);
        }
    }

    workbook.save(path)?;
    info!(
        "💾 Saved {} sheet(s) to {}",
        book.sheets().len(),
        path.display()
    );
    Ok(())
}

/// Reopen a workbook written by `save` (or any xlsx file)
pub fn load(path: &Path) -> AppResult<MemoryWorkbook> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e: calamine::XlsxError| {
        AppError::workbook_io(format!("Cannot open {}: {}", path.display(), e))
    })?;

    let mut book = MemoryWorkbook::new();
    for name in workbook.sheet_names().to_vec() {
        let range = workbook.worksheet_range(&name).map_err(|e| {
            AppError::workbook_io(format!("Cannot read sheet \"{}\": {}", name, e))
        })?;

        let formulas = workbook.worksheet_formula(&name).map_err(|e| {
            AppError::workbook_io(format!("Cannot read formulas of \"{}\": {}", name, e))
        })?;

        book.insert_sheet(&name)?;
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        for (r, row) in range.rows().enumerate() {
            for (c, data) in row.iter().enumerate() {
                let (text, kind) = cell_content(data);
                if text.is_empty() && kind == CellKind::Text {
                    continue;
                }
                book.set_cell(
                    &name,
                    start_row + r as u32 + 1,
                    (start_col + c as u32) as u16 + 1,
                    &text,
                    kind,
                )?;
            }
        }

        let (start_row, start_col) = formulas.start().unwrap_or((0, 0));
        for (r, row) in formulas.rows().enumerate() {
            for (c, formula) in row.iter().enumerate() {
                if formula.is_empty() {
                    continue;
                }
                let at_row = start_row + r as u32 + 1;
                let at_col = (start_col + c as u32) as u16 + 1;
                let cached = book
                    .sheet(&name)
                    .map(|sheet| sheet.value(at_row, at_col).to_string())
                    .unwrap_or_default();
                book.set_cell(&name, at_row, at_col, &cached, CellKind::Formula(formula.clone()))?;
            }
        }

        let layout = book
            .sheet(&name)
            .filter(|sheet| is_report_header(&sheet.row_values(1)))
            .map(|sheet| sheet.last_row());
        if let Some(last_row) = layout {
            SheetWriter::apply_layout(&mut book, &name, last_row)?;
        }
        debug!("Loaded sheet \"{}\" (report layout: {})", name, layout.is_some());
    }

    info!(
        "📂 Opened {} with {} sheet(s)",
        path.display(),
        book.sheets().len()
    );
    Ok(book)
}

/// `load` when the file exists, otherwise an empty workbook
pub fn load_or_new(path: &Path) -> AppResult<MemoryWorkbook> {
    if path.exists() {
        load(path)
    } else {
        debug!("{} does not exist yet; starting an empty workbook", path.display());
        Ok(MemoryWorkbook::new())
    }
}

fn write_cell(worksheet: &mut Worksheet, row: u32, column: u16, cell: &Cell) -> AppResult<()> {
    let format = cell_format(cell);
    match (&cell.kind, format) {
        (CellKind::Text, Some(format)) if cell.value.is_empty() => {
            worksheet.write_blank(row, column, &format)?;
        }
        (CellKind::Text, Some(format)) => {
            worksheet.write_string_with_format(row, column, &cell.value, &format)?;
        }
        (CellKind::Text, None) if !cell.value.is_empty() => {
            worksheet.write_string(row, column, &cell.value)?;
        }
        (CellKind::Text, None) => {}
        (CellKind::Number(number), Some(format)) => {
            worksheet.write_number_with_format(row, column, *number, &format)?;
        }
        (CellKind::Number(number), None) => {
            worksheet.write_number(row, column, *number)?;
        }
        (CellKind::Boolean(value), Some(format)) => {
            worksheet.write_boolean_with_format(row, column, *value, &format)?;
        }
        (CellKind::Boolean(value), None) => {
            worksheet.write_boolean(row, column, *value)?;
        }
        (CellKind::DateTime(serial), format) => {
            let format = format
                .unwrap_or_else(Format::new)
                .set_num_format(DATE_TIME_FORMAT);
            worksheet.write_number_with_format(row, column, *serial, &format)?;
        }
        (CellKind::Formula(text), format) => {
            let formula = Formula::new(text).set_result(&cell.value);
            match format {
                Some(format) => worksheet.write_formula_with_format(row, column, formula, &format)?,
                None => worksheet.write_formula(row, column, formula)?,
            };
        }
    }
    Ok(())
}

fn cell_format(cell: &Cell) -> Option<Format> {
    if !cell.is_styled() {
        return None;
    }
    let mut format = Format::new();
    if let Some(rgb) = cell.background {
        format = format.set_background_color(Color::RGB(rgb));
    }
    if let Some(alignment) = cell.alignment {
        format = format.set_align(match alignment {
            HorizontalAlignment::Left => FormatAlign::Left,
            HorizontalAlignment::Center => FormatAlign::Center,
            HorizontalAlignment::Right => FormatAlign::Right,
        });
    }
    Some(format)
}

/// Display text and kind of a calamine cell
fn cell_content(data: &Data) -> (String, CellKind) {
    match data {
        Data::Empty => (String::new(), CellKind::Text),
        Data::String(s) => (s.clone(), CellKind::Text),
        Data::Float(value) => (data.to_string(), CellKind::Number(*value)),
        Data::Int(value) => (data.to_string(), CellKind::Number(*value as f64)),
        Data::Bool(value) => (data.to_string(), CellKind::Boolean(*value)),
        Data::DateTime(value) => (data.to_string(), CellKind::DateTime(value.as_f64())),
        other => (other.to_string(), CellKind::Text),
    }
}
