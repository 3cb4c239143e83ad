//! ASE Migration Library
//!
//! Builds a per-customer report of Akamai App & API Protector security
//! policy modes:
//! - resolves an account switch key to a customer name
//! - lists security configurations active on production
//! - fetches every policy's mode (current state, evaluation window)
//! - writes the rows into a new workbook sheet named after the customer

pub mod core;
pub mod dialog;
pub mod models;
pub mod providers;
pub mod sheet;
pub mod utils;

pub use crate::core::{
    customer_name_from_records, enumerate_configs, production_configs, resolve_customer_name,
    PolicyAggregator,
};
pub use dialog::{
    AccountSwitchKey, Button, CustomerReport, DialogController, MenuItem, PresetPrompt, Prompt,
    PromptResponse, TerminalPrompt,
};
pub use models::{
    AppConfig, AppError, AppResult, EdgeRc, ErrorCode, PolicyMode, PolicyRow, SecurityConfig,
    SecurityPolicy,
};
pub use providers::{AppSecClient, EdgeGridSigner};
pub use sheet::{
    sheet_safe_name, CellKind, HorizontalAlignment, MemoryWorkbook, SheetWriter, Spreadsheet,
    COLUMNS,
};
