//! Akamai OPEN API client
//!
//! Thin, signed GET wrappers around the four endpoints the report needs:
//! - `GET /identity-management/v2/api-clients/self/account-switch-keys`
//! - `GET /appsec/v1/configs`
//! - `GET /appsec/v1/configs/{configId}/versions/{version}/security-policies`
//! - `GET .../security-policies/{policyId}/mode`
//!
//! Requests are issued one at a time and never retried: any transport
//! failure, non-2xx status or undecodable body is returned as an error.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::edgegrid::EdgeGridSigner;
use crate::models::{
    AccountSwitchKeyRecord, AppConfig, AppError, AppResult, ConfigsResponse, EdgeRc, ErrorCode,
    PoliciesResponse, PolicyMode, SecurityPolicy,
};
use crate::utils::constants::{
    policy_mode_path, security_policies_path, ACCOUNT_SWITCH_KEYS_PATH, ACCOUNT_SWITCH_KEY_PARAM,
    APPSEC_CONFIGS_PATH, SEARCH_PARAM, USER_AGENT,
};

/// Signed client for the Akamai OPEN APIs
pub struct AppSecClient {
    client: reqwest::Client,
    base_url: Url,
    signer: EdgeGridSigner,
    timeout: Duration,
}

impl AppSecClient {
    /// Client for `https://<host>` from the credentials
    pub fn new(credentials: EdgeRc, timeout: Duration) -> AppResult<Self> {
        let base_url = credentials.base_url();
        Self::with_base_url(credentials, &base_url, timeout)
    }

    /// Client built from the runtime configuration
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let credentials = config.load_credentials()?;
        match &config.base_url_override {
            Some(base_url) => Self::with_base_url(credentials, base_url, config.http_timeout),
            None => Self::new(credentials, config.http_timeout),
        }
    }

    /// Client against an explicit base URL
    pub fn with_base_url(credentials: EdgeRc, base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::invalid_config(format!("Invalid API base URL `{}`: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::with_source(ErrorCode::ConfigInvalidValue, "Cannot build HTTP client", e))?;

        Ok(Self {
            client,
            base_url,
            signer: EdgeGridSigner::new(credentials),
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Account records matching `search`
    pub async fn account_switch_keys(&self, search: &str) -> AppResult<Vec<AccountSwitchKeyRecord>> {
        self.get_json(ACCOUNT_SWITCH_KEYS_PATH, &[(SEARCH_PARAM, search)])
            .await
    }

    /// Every security configuration visible under the switch key
    pub async fn security_configs(&self, switch_key: &str) -> AppResult<ConfigsResponse> {
        self.get_json(APPSEC_CONFIGS_PATH, &[(ACCOUNT_SWITCH_KEY_PARAM, switch_key)])
            .await
    }

    /// Security policies of one config version, in API order
    pub async fn security_policies(
        &self,
        config_id: i64,
        version: i64,
        switch_key: &str,
    ) -> AppResult<Vec<SecurityPolicy>> {
        let path = security_policies_path(config_id, version);
        let response: PoliciesResponse = self
            .get_json(&path, &[(ACCOUNT_SWITCH_KEY_PARAM, switch_key)])
            .await?;
        Ok(response.policies)
    }

    /// Mode of one policy
    pub async fn policy_mode(
        &self,
        config_id: i64,
        version: i64,
        policy_id: &str,
        switch_key: &str,
    ) -> AppResult<PolicyMode> {
        let path = policy_mode_path(config_id, version, policy_id);
        self.get_json(&path, &[(ACCOUNT_SWITCH_KEY_PARAM, switch_key)])
            .await
    }

    /// Signed GET returning the decoded JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> AppResult<T> {
        let url = self.endpoint(path, query)?;

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(AppError::invalid_config(format!("API URL has no host: {}", url))),
        };
        let path_and_query = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        let authorization = self.signer.sign("GET", url.scheme(), &host, &path_and_query);

        debug!("➡️ GET {}", path_and_query);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, authorization)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("⬅️ {} {} ({} bytes)", status.as_u16(), path_and_query, body.len());

        if !status.is_success() {
            return Err(AppError::bad_status(&url_path(path), status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::with_source(
                ErrorCode::ApiInvalidResponse,
                format!("Unexpected response body from GET {}", url_path(path)),
                e,
            )
        })
    }

    /// Absolute URL for an API path plus query parameters
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self
            .base_url
            .join(url_path(path).as_str())
            .map_err(|e| AppError::invalid_config(format!("Invalid API path `{}`: {}", path, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// API paths are rooted; tolerate a missing leading slash.
fn url_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
