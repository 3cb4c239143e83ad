//! Configuration module
//!
//! Runtime settings come from the environment (overridable on the command
//! line); API credentials come from a named section of an `.edgerc` file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_EDGERC_FILE, DEFAULT_EDGERC_SECTION, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_BODY,
    DEFAULT_WORKBOOK, ENV_EDGERC, ENV_EDGERC_SECTION, ENV_HTTP_TIMEOUT_SECS, ENV_WORKBOOK,
};

/// Runtime configuration for one invocation
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the `.edgerc` credentials file
    pub edgerc_path: PathBuf,
    /// Section of the credentials file to use
    pub section: String,
    /// Workbook the customer sheets are written to
    pub workbook_path: PathBuf,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Replaces `https://<host>` from the credentials (local testing)
    pub base_url_override: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let edgerc_path = std::env::var(ENV_EDGERC)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_default()
                    .join(DEFAULT_EDGERC_FILE)
            });

        let http_timeout_secs = std::env::var(ENV_HTTP_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Self {
            edgerc_path,
            section: std::env::var(ENV_EDGERC_SECTION)
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_EDGERC_SECTION.to_string()),
            workbook_path: std::env::var(ENV_WORKBOOK)
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK)),
            http_timeout: Duration::from_secs(http_timeout_secs),
            base_url_override: None,
        }
    }
}

impl AppConfig {
    /// Apply command-line overrides on top of the environment defaults
    pub fn with_overrides(
        mut self,
        edgerc: Option<PathBuf>,
        section: Option<String>,
        workbook: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = edgerc {
            self.edgerc_path = path;
        }
        if let Some(section) = section {
            self.section = section;
        }
        if let Some(path) = workbook {
            self.workbook_path = path;
        }
        self
    }

    /// Load the credentials this configuration points at
    pub fn load_credentials(&self) -> AppResult<EdgeRc> {
        EdgeRc::from_file(&self.edgerc_path, &self.section)
    }
}

/// EdgeGrid client credentials from one `.edgerc` section.
///
/// The secret and tokens are kept out of `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct EdgeRc {
    pub host: String,
    pub client_token: String,
    pub client_secret: String,
    pub access_token: String,
    pub max_body: usize,
}

impl std::fmt::Debug for EdgeRc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeRc")
            .field("host", &self.host)
            .field("client_token", &"<hidden>")
            .field("client_secret", &"<hidden>")
            .field("access_token", &"<hidden>")
            .field("max_body", &self.max_body)
            .finish()
    }
}

impl EdgeRc {
    /// Read `section` from the credentials file at `path`
    pub fn from_file(path: &Path, section: &str) -> AppResult<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| AppError::missing_edgerc(path, e))?;
        let creds = Self::parse(&text, section)?;
        info!(
            "🔑 Loaded credentials [{}] from {} (host {})",
            section,
            path.display(),
            creds.host
        );
        Ok(creds)
    }

    /// Parse `section` out of `.edgerc` text
    pub fn parse(text: &str, section: &str) -> AppResult<Self> {
        let sections = parse_ini(text);
        let values = sections
            .get(section)
            .ok_or_else(|| AppError::missing_section(section))?;

        let field = |name: &str| -> AppResult<String> {
            values
                .get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| AppError::missing_field(section, name))
        };

        let host = field("host")?;
        let host = host
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();

        let max_body = match values.get("max_body") {
            Some(v) => v.parse::<usize>().map_err(|_| {
                AppError::invalid_config(format!(
                    "Section [{}] has non-numeric max_body `{}`",
                    section, v
                ))
            })?,
            None => DEFAULT_MAX_BODY,
        };

        Ok(Self {
            host,
            client_token: field("client_token")?,
            client_secret: field("client_secret")?,
            access_token: field("access_token")?,
            max_body,
        })
    }

    /// `https://<host>`
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host)
    }
}

/// Minimal INI reader for `.edgerc` files: `[section]` headers, `key = value`
/// pairs, `#`/`;` comment lines, optional quotes around values.
fn parse_ini(text: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            debug!("Ignoring malformed .edgerc line {}", lineno + 1);
            continue;
        };
        let Some(section) = current.as_ref() else {
            debug!("Ignoring .edgerc line {} outside any section", lineno + 1);
            continue;
        };

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);

        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_string(), value.to_string());
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    const EDGERC: &str = r#"
# shared credentials
[default]
client_secret = c2VjcmV0
host = akab-abc.luna.akamaiapis.net/
access_token = akab-access
client_token = akab-client

[other]
host = "https://akab-other.luna.akamaiapis.net"
client_secret = 'other-secret'
access_token = a
client_token = c
max_body = 2048
"#;

    #[test]
    fn test_parse_default_section() {
        let rc = EdgeRc::parse(EDGERC, "default").unwrap();
        assert_eq!(rc.host, "akab-abc.luna.akamaiapis.net");
        assert_eq!(rc.client_secret, "c2VjcmV0");
        assert_eq!(rc.access_token, "akab-access");
        assert_eq!(rc.client_token, "akab-client");
        assert_eq!(rc.max_body, DEFAULT_MAX_BODY);
        assert_eq!(rc.base_url(), "https://akab-abc.luna.akamaiapis.net");
    }

    #[test]
    fn test_parse_quoted_values() {
        let rc = EdgeRc::parse(EDGERC, "other").unwrap();
        assert_eq!(rc.host, "akab-other.luna.akamaiapis.net");
        assert_eq!(rc.client_secret, "other-secret");
        assert_eq!(rc.max_body, 2048);
    }

    #[test]
    fn test_missing_section() {
        let err = EdgeRc::parse(EDGERC, "ccu").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissingSection);
    }

    #[test]
    fn test_missing_field() {
        let err = EdgeRc::parse("[default]\nhost = h\n", "default").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissingField);
        assert!(err.message.contains("client_token"));
    }

    #[test]
    fn test_missing_file() {
        let err = EdgeRc::from_file(Path::new("/nonexistent/.edgerc"), "default").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissingEdgerc);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rc = EdgeRc::parse(EDGERC, "default").unwrap();
        let shown = format!("{:?}", rc);
        assert!(!shown.contains("c2VjcmV0"));
        assert!(shown.contains("akab-abc.luna.akamaiapis.net"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default().with_overrides(
            Some(PathBuf::from("/tmp/creds")),
            Some("ccu".to_string()),
            None,
        );
        assert_eq!(config.edgerc_path, PathBuf::from("/tmp/creds"));
        assert_eq!(config.section, "ccu");
    }
}
