//! Sheet Writer
//!
//! Lays out one customer sheet: styled header row, then one row per policy.
//! Data cells are written one at a time at row `index + 2`, column
//! `column index + 1`.

use tracing::info;

use super::layout::{header_labels, COLUMNS};
use super::Spreadsheet;
use crate::models::{AppResult, PolicyRow};
use crate::utils::constants::HEADER_BACKGROUND;

/// Writes report sheets into any `Spreadsheet`
pub struct SheetWriter;

impl SheetWriter {
    /// Header plus every row. The sheet must already exist.
    pub fn write_customer_sheet<S: Spreadsheet + ?Sized>(
        book: &mut S,
        sheet: &str,
        rows: &[PolicyRow],
    ) -> AppResult<()> {
        Self::write_column_headers(book, sheet)?;
        Self::write_policy_data(book, sheet, rows)?;
        info!("📝 Wrote {} rows to sheet \"{}\"", rows.len(), sheet);
        Ok(())
    }

    /// Column widths, header fill and header labels
    pub fn write_column_headers<S: Spreadsheet + ?Sized>(book: &mut S, sheet: &str) -> AppResult<()> {
        Self::apply_header_style(book, sheet)?;
        book.set_row_values(sheet, 1, 1, &header_labels())
    }

    /// Column alignment, then each cell's value
    pub fn write_policy_data<S: Spreadsheet + ?Sized>(
        book: &mut S,
        sheet: &str,
        rows: &[PolicyRow],
    ) -> AppResult<()> {
        Self::apply_alignment(book, sheet, rows.len() as u32 + 1)?;

        for (column_index, column) in COLUMNS.iter().enumerate() {
            for (row_index, row) in rows.iter().enumerate() {
                book.set_value(
                    sheet,
                    row_index as u32 + 2,
                    column_index as u16 + 1,
                    column.value(row),
                )?;
            }
        }
        Ok(())
    }

    /// Restore widths, fill and alignment on a sheet whose content already
    /// follows the report layout (`last_row` includes the header).
    pub fn apply_layout<S: Spreadsheet + ?Sized>(book: &mut S, sheet: &str, last_row: u32) -> AppResult<()> {
        Self::apply_header_style(book, sheet)?;
        Self::apply_alignment(book, sheet, last_row.max(1))
    }

    fn apply_header_style<S: Spreadsheet + ?Sized>(book: &mut S, sheet: &str) -> AppResult<()> {
        for (index, column) in COLUMNS.iter().enumerate() {
            book.set_column_width(sheet, index as u16 + 1, column.width_px)?;
        }
        book.set_background(sheet, 1, 1, COLUMNS.len() as u16, HEADER_BACKGROUND)
    }

    fn apply_alignment<S: Spreadsheet + ?Sized>(book: &mut S, sheet: &str, last_row: u32) -> AppResult<()> {
        for (index, column) in COLUMNS.iter().enumerate() {
            if let Some(alignment) = column.alignment {
                book.set_horizontal_alignment(sheet, 1, index as u16 + 1, last_row, alignment)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{HorizontalAlignment, MemoryWorkbook};

    fn row(config: &str, policy: &str) -> PolicyRow {
        PolicyRow {
            config_id: 1,
            config_name: config.to_string(),
            production_version: 3,
            policy_id: policy.to_string(),
            policy_name: format!("{} policy", policy),
            current: "ASE_AUTO".to_string(),
            eval: "DISABLED".to_string(),
            evaluating: String::new(),
            expires: String::new(),
            mode: "ASE_AUTO".to_string(),
        }
    }

    fn written(rows: &[PolicyRow]) -> MemoryWorkbook {
        let mut book = MemoryWorkbook::new();
        book.insert_sheet("ACME").unwrap();
        SheetWriter::write_customer_sheet(&mut book, "ACME", rows).unwrap();
        book
    }

    #[test]
    fn test_header_row() {
        let book = written(&[]);
        let sheet = book.sheet("ACME").unwrap();
        assert_eq!(sheet.row_values(1), header_labels().map(String::from).to_vec());
        for col in 1..=8 {
            assert_eq!(sheet.cell(1, col).unwrap().background, Some(HEADER_BACKGROUND));
        }
        assert_eq!(sheet.column_width(1), Some(180));
        assert_eq!(sheet.column_width(6), Some(280));
        assert_eq!(sheet.column_width(9), None);
    }

    #[test]
    fn test_rows_follow_input_order() {
        let rows = vec![row("CfgA", "p1"), row("CfgA", "p2"), row("CfgB", "p1")];
        let book = written(&rows);
        let sheet = book.sheet("ACME").unwrap();

        assert_eq!(sheet.value(2, 1), "CfgA");
        assert_eq!(sheet.value(2, 2), "p1");
        assert_eq!(sheet.value(3, 2), "p2");
        assert_eq!(sheet.value(4, 1), "CfgB");
        assert_eq!(sheet.value(4, 2), "p1");
        assert_eq!(sheet.value(4, 3), "p1 policy");
        assert_eq!(sheet.value(4, 8), "ASE_AUTO");
        assert_eq!(sheet.last_row(), 4);
    }

    #[test]
    fn test_center_alignment_range() {
        let rows = vec![row("CfgA", "p1"), row("CfgA", "p2")];
        let book = written(&rows);
        let sheet = book.sheet("ACME").unwrap();

        for col in [5u16, 7, 8] {
            for r in 1..=3 {
                assert_eq!(
                    sheet.cell(r, col).unwrap().alignment,
                    Some(HorizontalAlignment::Center),
                    "row {} col {}",
                    r,
                    col
                );
            }
            assert!(sheet.cell(4, col).is_none());
        }
        assert_eq!(sheet.cell(2, 1).unwrap().alignment, None);
    }

    #[test]
    fn test_empty_evaluation_cells_are_blank() {
        let book = written(&[row("CfgA", "p1")]);
        let sheet = book.sheet("ACME").unwrap();
        assert_eq!(sheet.value(2, 6), "");
        assert_eq!(sheet.value(2, 7), "");
    }

    #[test]
    fn test_missing_sheet_fails() {
        let mut book = MemoryWorkbook::new();
        assert!(SheetWriter::write_customer_sheet(&mut book, "ACME", &[]).is_err());
    }
}
