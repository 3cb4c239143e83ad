//! Centralized Error Handling Module
//!
//! Every failure in the pipeline carries a unique error code so a failed
//! "Add Customer" run can be traced from the log line alone.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - CFG_xxx: Configuration / credential errors
//! - API_xxx: Akamai OPEN API errors
//! - SHEET_xxx / WORKBOOK_xxx: Spreadsheet output errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Configuration Errors
    // ============================================
    /// `.edgerc` file could not be read
    ConfigMissingEdgerc,
    /// Requested `[section]` is not in the `.edgerc` file
    ConfigMissingSection,
    /// Required credential key missing from the section
    ConfigMissingField,
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // API Errors
    // ============================================
    /// Request could not be sent / connection failed
    ApiRequestFailed,
    /// Request timed out
    ApiTimeout,
    /// Non-2xx response
    ApiBadStatus,
    /// Response body was not the expected JSON
    ApiInvalidResponse,
    /// Account switch key lookup returned no account
    AccountNotFound,

    // ============================================
    // Spreadsheet Errors
    // ============================================
    /// A sheet with this name already exists
    SheetExists,
    /// Referenced sheet does not exist
    SheetNotFound,
    /// Sheet name violates workbook naming rules
    SheetInvalidName,
    /// Row/column outside the addressable grid
    SheetInvalidRange,
    /// Workbook could not be read or written
    WorkbookIo,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigMissingEdgerc => "CFG_MISSING_EDGERC",
            Self::ConfigMissingSection => "CFG_MISSING_SECTION",
            Self::ConfigMissingField => "CFG_MISSING_FIELD",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::ApiRequestFailed => "API_REQUEST_FAILED",
            Self::ApiTimeout => "API_TIMEOUT",
            Self::ApiBadStatus => "API_BAD_STATUS",
            Self::ApiInvalidResponse => "API_INVALID_RESPONSE",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",

            Self::SheetExists => "SHEET_EXISTS",
            Self::SheetNotFound => "SHEET_NOT_FOUND",
            Self::SheetInvalidName => "SHEET_INVALID_NAME",
            Self::SheetInvalidRange => "SHEET_INVALID_RANGE",
            Self::WorkbookIo => "WORKBOOK_IO",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Whether the user can fix this by editing credentials or input
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissingEdgerc
                | Self::ConfigMissingSection
                | Self::ConfigMissingField
                | Self::ConfigInvalidValue
                | Self::AccountNotFound
                | Self::SheetExists
                | Self::SheetInvalidName
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// `.edgerc` unreadable
    pub fn missing_edgerc(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::with_source(
            ErrorCode::ConfigMissingEdgerc,
            format!("Cannot read credentials file {}", path.display()),
            source,
        )
    }

    /// Section missing from `.edgerc`
    pub fn missing_section(section: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingSection,
            format!("Section [{}] not found in credentials file", section),
        )
    }

    /// Credential key missing
    pub fn missing_field(section: &str, field: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingField,
            format!("Section [{}] is missing `{}`", section, field),
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// Non-2xx API response
    pub fn bad_status(path: &str, status: u16, body: &str) -> Self {
        Self::new(
            ErrorCode::ApiBadStatus,
            format!("GET {} returned HTTP {}: {}", path, status, body.trim()),
        )
    }

    /// Unexpected response shape
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInvalidResponse, msg)
    }

    /// Account lookup produced nothing
    pub fn account_not_found(search: &str) -> Self {
        Self::new(
            ErrorCode::AccountNotFound,
            format!("No account matches switch key `{}`", search),
        )
    }

    /// Duplicate sheet
    pub fn sheet_exists(name: &str) -> Self {
        Self::new(
            ErrorCode::SheetExists,
            format!("A sheet named \"{}\" already exists", name),
        )
    }

    /// Unknown sheet
    pub fn sheet_not_found(name: &str) -> Self {
        Self::new(
            ErrorCode::SheetNotFound,
            format!("No sheet named \"{}\"", name),
        )
    }

    /// Bad sheet name
    pub fn invalid_sheet_name(name: &str, reason: &str) -> Self {
        Self::new(
            ErrorCode::SheetInvalidName,
            format!("Invalid sheet name \"{}\": {}", name, reason),
        )
    }

    /// Zero row/column (the grid is 1-based)
    pub fn invalid_range(row: u32, column: u16) -> Self {
        Self::new(
            ErrorCode::SheetInvalidRange,
            format!("Cell ({}, {}) is outside the sheet; rows and columns start at 1", row, column),
        )
    }

    /// Workbook read/write failure
    pub fn workbook_io(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::WorkbookIo, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::WorkbookIo, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::ApiTimeout, "Request timeout")
        } else if err.is_decode() {
            Self::with_source(ErrorCode::ApiInvalidResponse, "Response decode failed", err)
        } else {
            Self::with_source(ErrorCode::ApiRequestFailed, "Request failed", err)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ApiInvalidResponse, "JSON parse error", err)
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::with_source(ErrorCode::WorkbookIo, "Workbook write failed", err)
    }
}
