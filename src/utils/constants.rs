//! Constants Module - Single Source of Truth
//!
//! Endpoint paths, defaults and UI strings used across the crate.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "ase-migration";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = concat!("ase-migration/", env!("CARGO_PKG_VERSION"));

// ============================================
// CONFIGURATION DEFAULTS
// ============================================

/// Credentials file looked up in the home directory
pub const DEFAULT_EDGERC_FILE: &str = ".edgerc";

/// Credentials section used when none is given
pub const DEFAULT_EDGERC_SECTION: &str = "default";

/// Workbook written when none is given
pub const DEFAULT_WORKBOOK: &str = "ase-migration.xlsx";

/// Default timeout for API requests (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// EdgeGrid `max_body` when the section does not set one
pub const DEFAULT_MAX_BODY: usize = 131_072;

/// Environment variables read by `AppConfig::default`
pub const ENV_EDGERC: &str = "AKAMAI_EDGERC";
pub const ENV_EDGERC_SECTION: &str = "AKAMAI_EDGERC_SECTION";
pub const ENV_WORKBOOK: &str = "ASE_WORKBOOK";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "ASE_HTTP_TIMEOUT_SECS";

// ============================================
// AKAMAI OPEN API ENDPOINTS
// ============================================

/// Account switch key search (identity management)
pub const ACCOUNT_SWITCH_KEYS_PATH: &str =
    "identity-management/v2/api-clients/self/account-switch-keys";

/// Security configuration list
pub const APPSEC_CONFIGS_PATH: &str = "/appsec/v1/configs";

/// Query parameter carrying the account switch key on appsec calls
pub const ACCOUNT_SWITCH_KEY_PARAM: &str = "accountSwitchKey";

/// Query parameter used by the account switch key search
pub const SEARCH_PARAM: &str = "search";

/// Security policies of one config version
pub fn security_policies_path(config_id: i64, version: i64) -> String {
    format!(
        "{}/{}/versions/{}/security-policies",
        APPSEC_CONFIGS_PATH, config_id, version
    )
}

/// Mode of one security policy
pub fn policy_mode_path(config_id: i64, version: i64, policy_id: &str) -> String {
    format!(
        "{}/{}/mode",
        security_policies_path(config_id, version),
        policy_id
    )
}

// ============================================
// UI STRINGS
// ============================================

/// Top-level menu
pub const MENU_TITLE: &str = "Akamai";

/// Menu entry that runs the report
pub const MENU_ADD_CUSTOMER: &str = "Add Customer";

/// Prompt title / message
pub const PROMPT_TITLE: &str = "Add Customer";
pub const PROMPT_MESSAGE: &str = "Account Switch Key (\"accountId:contractTypeId\")";

/// Help -> About text
pub const ABOUT_TEXT: &str = "In the Akamai menu item, select \"Add Customer\" and enter an Account key. \
Further instructions can be found at https://github.com/nighthauk/ase-migration. \
Created by Ryan Hauk. Reach out with support requests.";

// ============================================
// SHEET STYLING
// ============================================

/// Header row fill (#d0e0e3)
pub const HEADER_BACKGROUND: u32 = 0xD0E0E3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_paths() {
        assert_eq!(
            security_policies_path(12345, 7),
            "/appsec/v1/configs/12345/versions/7/security-policies"
        );
        assert_eq!(
            policy_mode_path(12345, 7, "abc1_1000"),
            "/appsec/v1/configs/12345/versions/7/security-policies/abc1_1000/mode"
        );
    }
}
