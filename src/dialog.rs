//! Dialog Controller
//!
//! Asks for an account switch key and, on a confirmed non-empty answer, runs
//! the report: resolve the customer, open a new sheet for it, aggregate
//! policy state and write the rows. Cancel or an empty answer is a silent
//! no-op: no sheet, no API call.

use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{error, info};

use crate::core::{resolve_customer_name, PolicyAggregator};
use crate::models::{AppResult, PolicyRow};
use crate::providers::AppSecClient;
use crate::sheet::{sheet_safe_name, xlsx, SheetWriter, Spreadsheet};
use crate::utils::constants::{ABOUT_TEXT, MENU_ADD_CUSTOMER, MENU_TITLE, PROMPT_MESSAGE, PROMPT_TITLE};

/// Prompt button pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Ok,
    Cancel,
}

/// What the user answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptResponse {
    pub button: Button,
    pub text: String,
}

impl PromptResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            button: Button::Ok,
            text: text.into(),
        }
    }

    pub fn cancel() -> Self {
        Self {
            button: Button::Cancel,
            text: String::new(),
        }
    }

    /// The switch key, if OK was pressed with non-blank text
    pub fn accepted_key(&self) -> Option<AccountSwitchKey> {
        match self.button {
            Button::Ok => AccountSwitchKey::parse(&self.text),
            Button::Cancel => None,
        }
    }
}

/// An OK/Cancel text prompt
pub trait Prompt {
    fn prompt(&mut self, title: &str, message: &str) -> AppResult<PromptResponse>;
}

/// Prompt on a terminal: one line of input is OK, end of input is Cancel.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn prompt(&mut self, title: &str, message: &str) -> AppResult<PromptResponse> {
        write!(self.output, "{}\n{} (empty or Ctrl-D to cancel): ", title, message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(PromptResponse::cancel());
        }
        Ok(PromptResponse::ok(line.trim_end_matches(['\r', '\n'])))
    }
}

/// Answers every prompt with a fixed response (`--key`)
pub struct PresetPrompt {
    answer: Option<String>,
}

impl PresetPrompt {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            answer: Some(text.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self { answer: None }
    }
}

impl Prompt for PresetPrompt {
    fn prompt(&mut self, _title: &str, _message: &str) -> AppResult<PromptResponse> {
        Ok(match &self.answer {
            Some(text) => PromptResponse::ok(text.clone()),
            None => PromptResponse::cancel(),
        })
    }
}

/// `accountId:contractTypeId` as typed by the user.
///
/// The full text is sent as `accountSwitchKey` on appsec calls; only the
/// account segment is used to look up the customer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSwitchKey {
    raw: String,
}

impl AccountSwitchKey {
    /// `None` for blank input
    pub fn parse(text: &str) -> Option<Self> {
        let raw = text.trim();
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Text before the first `:`
    pub fn lookup_key(&self) -> &str {
        self.raw.split(':').next().unwrap_or_default()
    }

    /// Text after the first `:`; carried but not used by the report
    pub fn contract_type_id(&self) -> Option<&str> {
        self.raw.split(':').nth(1)
    }
}

/// Outcome of a completed "Add Customer" run
#[derive(Debug, Clone)]
pub struct CustomerReport {
    pub customer_name: String,
    /// Tab name actually used; `customer_name` made workbook-safe
    pub sheet_name: String,
    pub switch_key: AccountSwitchKey,
    pub rows: Vec<PolicyRow>,
}

/// Entries of the top-level menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    AddCustomer,
    About,
}

impl MenuItem {
    pub const ALL: [MenuItem; 2] = [MenuItem::AddCustomer, MenuItem::About];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::AddCustomer => MENU_ADD_CUSTOMER,
            MenuItem::About => "About",
        }
    }

    /// Menu choice by 1-based number or label (case-insensitive)
    pub fn from_choice(choice: &str) -> Option<Self> {
        let choice = choice.trim();
        if let Ok(n) = choice.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied());
        }
        Self::ALL
            .into_iter()
            .find(|item| item.label().eq_ignore_ascii_case(choice))
    }
}

/// Menu text: "Akamai" -> Add Customer, Help -> About
pub fn menu_text() -> String {
    format!(
        "{}\n  1) {}\n  ---\n  Help\n  2) {}",
        MENU_TITLE,
        MenuItem::AddCustomer.label(),
        MenuItem::About.label()
    )
}

/// Help -> About
pub fn about_text() -> &'static str {
    ABOUT_TEXT
}

/// Show the menu and return the chosen entry (`None` on cancel/unknown)
pub fn choose_menu_item(prompt: &mut dyn Prompt) -> AppResult<Option<MenuItem>> {
    let response = prompt.prompt(&menu_text(), "Choose an item")?;
    Ok(match response.button {
        Button::Ok => MenuItem::from_choice(&response.text),
        Button::Cancel => None,
    })
}

/// Drives one "Add Customer" invocation
pub struct DialogController;

impl DialogController {
    /// Ask for the switch key; `None` on Cancel or blank input
    pub fn prompt_for_key(prompt: &mut dyn Prompt) -> AppResult<Option<AccountSwitchKey>> {
        let response = prompt.prompt(PROMPT_TITLE, PROMPT_MESSAGE)?;
        let key = response.accepted_key();
        if key.is_none() {
            info!("Add Customer dismissed; nothing to do");
        }
        Ok(key)
    }

    /// Prompt, then run the report when a key was given
    pub async fn add_customer<S: Spreadsheet + ?Sized>(
        prompt: &mut dyn Prompt,
        client: &AppSecClient,
        book: &mut S,
    ) -> AppResult<Option<CustomerReport>> {
        match Self::prompt_for_key(prompt)? {
            Some(key) => Self::run(client, book, key).await.map(Some),
            None => Ok(None),
        }
    }

    /// Resolve, open the sheet, aggregate, write.
    ///
    /// The sheet is created before aggregation starts, so a failure part way
    /// through leaves an empty sheet behind.
    pub async fn run<S: Spreadsheet + ?Sized>(
        client: &AppSecClient,
        book: &mut S,
        key: AccountSwitchKey,
    ) -> AppResult<CustomerReport> {
        info!("➕ Adding customer for switch key {}", key.as_str());

        let customer_name = resolve_customer_name(client, key.lookup_key()).await?;
        let sheet_name = sheet_safe_name(&customer_name);
        if sheet_name != customer_name {
            info!("Sheet for \"{}\" is named \"{}\"", customer_name, sheet_name);
        }

        book.insert_sheet(&sheet_name)?;
        book.set_active_sheet(&sheet_name)?;

        let rows = PolicyAggregator::new(client, key.as_str())
            .build_full_rows()
            .await?;

        SheetWriter::write_customer_sheet(book, &sheet_name, &rows)?;

        Ok(CustomerReport {
            customer_name,
            sheet_name,
            switch_key: key,
            rows,
        })
    }

    /// `run` against the workbook file at `path`.
    ///
    /// The file is saved whenever a sheet was added, including after a
    /// failure part way through. A save error is returned only when the run
    /// itself succeeded; otherwise it is logged and the run error wins.
    pub async fn run_and_save(
        client: &AppSecClient,
        path: &Path,
        key: AccountSwitchKey,
    ) -> AppResult<CustomerReport> {
        let mut book = xlsx::load_or_new(path)?;
        let sheets_before = book.sheets().len();

        let result = Self::run(client, &mut book, key).await;

        if book.sheets().len() > sheets_before {
            if let Err(save_err) = xlsx::save(&book, path) {
                match &result {
                    Ok(_) => return Err(save_err),
                    Err(run_err) => error!(
                        "❌ Could not save {} after {}: {}",
                        path.display(),
                        run_err.code_str(),
                        save_err
                    ),
                }
            }
        }

        result
    }
}
