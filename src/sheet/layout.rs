//! Report column layout
//!
//! The customer sheet has a fixed set of columns. Each entry names the
//! header, its pixel width, the `PolicyRow` field it shows and an optional
//! alignment; adding a column is a change to `COLUMNS` only.

use super::HorizontalAlignment;
use crate::models::PolicyRow;

/// Number of report columns
pub const COLUMN_COUNT: usize = 8;

/// One report column
#[derive(Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub width_px: u16,
    pub field: fn(&PolicyRow) -> &str,
    /// Applied to the header and every data cell of the column
    pub alignment: Option<HorizontalAlignment>,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("width_px", &self.width_px)
            .field("alignment", &self.alignment)
            .finish()
    }
}

impl Column {
    pub fn value<'r>(&self, row: &'r PolicyRow) -> &'r str {
        (self.field)(row)
    }
}

fn config_name(row: &PolicyRow) -> &str {
    &row.config_name
}

fn policy_id(row: &PolicyRow) -> &str {
    &row.policy_id
}

fn policy_name(row: &PolicyRow) -> &str {
    &row.policy_name
}

fn current(row: &PolicyRow) -> &str {
    &row.current
}

fn eval(row: &PolicyRow) -> &str {
    &row.eval
}

fn evaluating(row: &PolicyRow) -> &str {
    &row.evaluating
}

fn expires(row: &PolicyRow) -> &str {
    &row.expires
}

fn mode(row: &PolicyRow) -> &str {
    &row.mode
}

/// Columns in sheet order
pub const COLUMNS: [Column; COLUMN_COUNT] = [
    Column {
        header: "Configuration",
        width_px: 180,
        field: config_name,
        alignment: None,
    },
    Column {
        header: "Policy ID",
        width_px: 130,
        field: policy_id,
        alignment: None,
    },
    Column {
        header: "Policy Name",
        width_px: 270,
        field: policy_name,
        alignment: None,
    },
    Column {
        header: "Current State",
        width_px: 210,
        field: current,
        alignment: None,
    },
    Column {
        header: "Eval",
        width_px: 100,
        field: eval,
        alignment: Some(HorizontalAlignment::Center),
    },
    Column {
        header: "Evaluation Type",
        width_px: 280,
        field: evaluating,
        alignment: None,
    },
    Column {
        header: "Expires",
        width_px: 170,
        field: expires,
        alignment: Some(HorizontalAlignment::Center),
    },
    Column {
        header: "Mode",
        width_px: 100,
        field: mode,
        alignment: Some(HorizontalAlignment::Center),
    },
];

/// Header labels in column order
pub fn header_labels() -> [&'static str; COLUMN_COUNT] {
    COLUMNS.map(|c| c.header)
}

/// Whether a row of text is exactly the report header
pub fn is_report_header(values: &[String]) -> bool {
    values.len() == COLUMN_COUNT
        && values
            .iter()
            .zip(COLUMNS.iter())
            .all(|(value, column)| value == column.header)
}
