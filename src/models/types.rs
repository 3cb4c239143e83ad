//! Type definitions for the ASE migration report
//!
//! Raw API payloads are decoded into the `*Response` / `Raw*` shapes and then
//! narrowed into the records the report is built from. Everything here lives
//! for a single "Add Customer" run.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================
// IDENTITY MANAGEMENT
// ============================================

/// One entry of `GET /identity-management/v2/api-clients/self/account-switch-keys`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSwitchKeyRecord {
    #[serde(default)]
    pub account_switch_key: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
}

// ============================================
// SECURITY CONFIGURATIONS
// ============================================

/// Body of `GET /appsec/v1/configs`
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigsResponse {
    pub configurations: Vec<RawSecurityConfig>,
}

/// A configuration as listed by the API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSecurityConfig {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Absent (or `null`) when the config was never activated on production
    #[serde(default)]
    pub production_version: Option<i64>,
}

/// A configuration with a production version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    pub config_id: i64,
    pub config_name: String,
    pub production_version: i64,
}

// ============================================
// SECURITY POLICIES
// ============================================

/// Body of `GET /appsec/v1/configs/{configId}/versions/{version}/security-policies`
#[derive(Debug, Clone, Deserialize)]
pub struct PoliciesResponse {
    pub policies: Vec<SecurityPolicy>,
}

/// A security policy inside one config version
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPolicy {
    pub policy_id: String,
    #[serde(default)]
    pub policy_name: String,
    /// Overrides the parent config's id when the API reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<i64>,
    /// Overrides the parent config's production version when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_version: Option<i64>,
}

// ============================================
// POLICY MODE
// ============================================

/// Body of `GET .../security-policies/{policyId}/mode`
///
/// `evaluating` and `expires` are only sent during an active evaluation
/// window; outside it they decode to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolicyMode {
    #[serde(default, deserialize_with = "scalar_text")]
    pub current: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub eval: String,
    #[serde(default, deserialize_with = "truthy_text")]
    pub evaluating: String,
    #[serde(default, deserialize_with = "truthy_text")]
    pub expires: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub mode: String,
}

/// Render any JSON scalar as cell text; `null` becomes empty.
fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Like [`scalar_text`] but falsy values (`false`, `0`, `""`) also become empty.
fn truthy_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// ============================================
// REPORT ROW
// ============================================

/// One (config, policy) pair with its mode: a single report row.
///
/// Field precedence on overlap is config < policy < mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRow {
    pub config_id: i64,
    pub config_name: String,
    pub production_version: i64,
    pub policy_id: String,
    pub policy_name: String,
    pub current: String,
    pub eval: String,
    pub evaluating: String,
    pub expires: String,
    pub mode: String,
}

impl PolicyRow {
    pub fn merge(config: &SecurityConfig, policy: &SecurityPolicy, mode: PolicyMode) -> Self {
        Self {
            config_id: policy.config_id.unwrap_or(config.config_id),
            config_name: config.config_name.clone(),
            production_version: policy
                .production_version
                .unwrap_or(config.production_version),
            policy_id: policy.policy_id.clone(),
            policy_name: policy.policy_name.clone(),
            current: mode.current,
            eval: mode.eval,
            evaluating: mode.evaluating,
            expires: mode.expires,
            mode: mode.mode,
        }
    }
}
