//! Sheet Module - spreadsheet model and report output
//!
//! `Spreadsheet` mirrors the handful of host operations the report needs,
//! addressed 1-based like a spreadsheet UI. `MemoryWorkbook` implements it
//! in memory; `xlsx` persists it to disk and reopens it.

pub mod layout;
pub mod writer;
pub mod xlsx;

use std::collections::BTreeMap;

use crate::models::{AppError, AppResult};

pub use layout::{Column, COLUMNS};
pub use writer::SheetWriter;

/// Longest sheet name a workbook accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters a sheet name may not contain
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Horizontal cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

/// Spreadsheet operations used by the report writer
pub trait Spreadsheet {
    /// Names of all sheets, in tab order
    fn sheet_names(&self) -> Vec<String>;

    /// Case-insensitive existence check
    fn has_sheet(&self, name: &str) -> bool;

    /// Append a new, empty sheet. Fails if the name is taken or invalid.
    fn insert_sheet(&mut self, name: &str) -> AppResult<()>;

    fn set_active_sheet(&mut self, name: &str) -> AppResult<()>;

    fn active_sheet(&self) -> Option<String>;

    fn set_column_width(&mut self, sheet: &str, column: u16, pixels: u16) -> AppResult<()>;

    /// Fill `num_columns` cells of `row` starting at `column`
    fn set_background(
        &mut self,
        sheet: &str,
        row: u32,
        column: u16,
        num_columns: u16,
        rgb: u32,
    ) -> AppResult<()>;

    /// Align `num_rows` cells of `column` starting at `row`
    fn set_horizontal_alignment(
        &mut self,
        sheet: &str,
        row: u32,
        column: u16,
        num_rows: u32,
        alignment: HorizontalAlignment,
    ) -> AppResult<()>;

    fn set_value(&mut self, sheet: &str, row: u32, column: u16, value: &str) -> AppResult<()>;

    /// Write `values` left to right starting at (`row`, `column`)
    fn set_row_values(&mut self, sheet: &str, row: u32, column: u16, values: &[&str]) -> AppResult<()> {
        for (offset, value) in values.iter().enumerate() {
            self.set_value(sheet, row, column + offset as u16, value)?;
        }
        Ok(())
    }
}

/// Reject names a workbook cannot hold
pub fn validate_sheet_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_sheet_name(name, "name is empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(AppError::invalid_sheet_name(
            name,
            "name is longer than 31 characters",
        ));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(AppError::invalid_sheet_name(
            name,
            &format!("name contains `{}`", c),
        ));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(AppError::invalid_sheet_name(
            name,
            "name starts or ends with an apostrophe",
        ));
    }
    Ok(())
}

/// What a cell holds beyond its display text.
///
/// Report cells are always `Text`; the other kinds come from reopened
/// workbooks and are written back with the same type.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellKind {
    #[default]
    Text,
    Number(f64),
    Boolean(bool),
    /// Excel serial date
    DateTime(f64),
    /// Formula without the leading `=`; `value` holds the cached result
    Formula(String),
}

/// Map any name onto one `validate_sheet_name` accepts.
///
/// Forbidden characters become `-`, apostrophes at either end are dropped
/// and the result is cut to 31 characters.
pub fn sheet_safe_name(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '-' } else { c })
        .collect();
    let truncated: String = replaced
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    truncated.trim_end().trim_end_matches('\'').to_string()
}

/// One cell: text plus optional styling
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub value: String,
    pub kind: CellKind,
    pub background: Option<u32>,
    pub alignment: Option<HorizontalAlignment>,
}

impl Cell {
    pub fn is_styled(&self) -> bool {
        self.background.is_some() || self.alignment.is_some()
    }
}

/// A sparse sheet keyed by 1-based (row, column)
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u16), Cell>,
    column_widths: BTreeMap<u16, u16>,
}

impl Sheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self, row: u32, column: u16) -> Option<&Cell> {
        self.cells.get(&(row, column))
    }

    /// Cell text, empty when unset
    pub fn value(&self, row: u32, column: u16) -> &str {
        self.cell(row, column).map(|c| c.value.as_str()).unwrap_or("")
    }

    /// Text of a full row up to the last populated column
    pub fn row_values(&self, row: u32) -> Vec<String> {
        let last = self
            .cells
            .range((row, 0)..=(row, u16::MAX))
            .filter(|(_, cell)| !cell.value.is_empty())
            .map(|((_, col), _)| *col)
            .max()
            .unwrap_or(0);
        (1..=last).map(|col| self.value(row, col).to_string()).collect()
    }

    pub fn column_width(&self, column: u16) -> Option<u16> {
        self.column_widths.get(&column).copied()
    }

    /// Highest row holding a non-empty value
    pub fn last_row(&self) -> u32 {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.value.is_empty())
            .map(|((row, _), _)| *row)
            .max()
            .unwrap_or(0)
    }

    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &Cell)> {
        self.cells.iter().map(|((row, col), cell)| (*row, *col, cell))
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.column_widths.iter().map(|(col, px)| (*col, *px))
    }

    fn cell_mut(&mut self, row: u32, column: u16) -> AppResult<&mut Cell> {
        if row == 0 || column == 0 {
            return Err(AppError::invalid_range(row, column));
        }
        Ok(self.cells.entry((row, column)).or_default())
    }
}

/// In-memory workbook: ordered sheets plus the active one
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<Sheet>,
    active: Option<usize>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.position(name).map(|i| &self.sheets[i])
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    fn position(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.sheets
            .iter()
            .position(|s| s.name.to_lowercase() == wanted)
    }

    /// Set a cell's display text and kind together
    pub fn set_cell(
        &mut self,
        sheet: &str,
        row: u32,
        column: u16,
        value: &str,
        kind: CellKind,
    ) -> AppResult<()> {
        let cell = self.sheet_mut(sheet)?.cell_mut(row, column)?;
        cell.value = value.to_string();
        cell.kind = kind;
        Ok(())
    }

    fn sheet_mut(&mut self, name: &str) -> AppResult<&mut Sheet> {
        match self.position(name) {
            Some(i) => Ok(&mut self.sheets[i]),
            None => Err(AppError::sheet_not_found(name)),
        }
    }
}

impl Spreadsheet for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn insert_sheet(&mut self, name: &str) -> AppResult<()> {
        validate_sheet_name(name)?;
        if self.has_sheet(name) {
            return Err(AppError::sheet_exists(name));
        }
        self.sheets.push(Sheet::new(name));
        Ok(())
    }

    fn set_active_sheet(&mut self, name: &str) -> AppResult<()> {
        let index = self
            .position(name)
            .ok_or_else(|| AppError::sheet_not_found(name))?;
        self.active = Some(index);
        Ok(())
    }

    fn active_sheet(&self) -> Option<String> {
        self.active.map(|i| self.sheets[i].name.clone())
    }

    fn set_column_width(&mut self, sheet: &str, column: u16, pixels: u16) -> AppResult<()> {
        if column == 0 {
            return Err(AppError::invalid_range(1, column));
        }
        self.sheet_mut(sheet)?.column_widths.insert(column, pixels);
        Ok(())
    }

    fn set_background(
        &mut self,
        sheet: &str,
        row: u32,
        column: u16,
        num_columns: u16,
        rgb: u32,
    ) -> AppResult<()> {
        let sheet = self.sheet_mut(sheet)?;
        for col in column..column + num_columns {
            sheet.cell_mut(row, col)?.background = Some(rgb);
        }
        Ok(())
    }

    fn set_horizontal_alignment(
        &mut self,
        sheet: &str,
        row: u32,
        column: u16,
        num_rows: u32,
        alignment: HorizontalAlignment,
    ) -> AppResult<()> {
        let sheet = self.sheet_mut(sheet)?;
        for r in row..row + num_rows {
            sheet.cell_mut(r, column)?.alignment = Some(alignment);
        }
        Ok(())
    }

    fn set_value(&mut self, sheet: &str, row: u32, column: u16, value: &str) -> AppResult<()> {
        self.set_cell(sheet, row, column, value, CellKind::Text)
    }
}
