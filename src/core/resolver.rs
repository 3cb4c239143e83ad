//! Account Resolver and Config Enumerator
//!
//! Turn an account switch key into the customer name used for the sheet tab,
//! and list the configurations that are live on production.

use tracing::{info, warn};

use crate::models::{
    AccountSwitchKeyRecord, AppError, AppResult, ConfigsResponse, SecurityConfig,
};
use crate::providers::AppSecClient;

/// Customer name for a lookup key: the first account name returned by the
/// switch-key search, cut at the first `_`.
pub async fn resolve_customer_name(client: &AppSecClient, lookup_key: &str) -> AppResult<String> {
    let records = client.account_switch_keys(lookup_key).await?;
    let name = customer_name_from_records(lookup_key, &records)?;
    info!("🏷️ Switch key {} belongs to {}", lookup_key, name);
    Ok(name)
}

/// Production configurations for the account, in API order.
pub async fn enumerate_configs(
    client: &AppSecClient,
    switch_key: &str,
) -> AppResult<Vec<SecurityConfig>> {
    let raw = client.security_configs(switch_key).await?;
    let total = raw.configurations.len();
    let configs = production_configs(raw);

    if configs.len() < total {
        warn!(
            "⚠️ Skipped {} of {} configs without a production version",
            total - configs.len(),
            total
        );
    }
    info!("📋 {} production security configs", configs.len());

    Ok(configs)
}

/// First record's `accountName` up to the first `_`.
///
/// No fallback: an empty result or a record without a name is an error.
pub fn customer_name_from_records(
    search: &str,
    records: &[AccountSwitchKeyRecord],
) -> AppResult<String> {
    let first = records
        .first()
        .ok_or_else(|| AppError::account_not_found(search))?;
    let account_name = first.account_name.as_deref().ok_or_else(|| {
        AppError::invalid_response(format!(
            "Account record for `{}` has no accountName",
            search
        ))
    })?;

    Ok(account_name
        .split('_')
        .next()
        .unwrap_or_default()
        .to_string())
}

/// Keep only configurations with a production version.
///
/// `"productionVersion": null` counts as missing: the config is skipped
/// instead of being queried for version `null`, which the policies
/// endpoint rejects.
pub fn production_configs(raw: ConfigsResponse) -> Vec<SecurityConfig> {
    raw.configurations
        .into_iter()
        .filter_map(|config| {
            config.production_version.map(|version| SecurityConfig {
                config_id: config.id,
                config_name: config.name,
                production_version: version,
            })
        })
        .collect()
}
