//! Policy Aggregator
//!
//! Walks every production config, lists its security policies and fetches
//! each policy's mode, producing one `PolicyRow` per (config, policy) pair.
//! Round trips are strictly sequential: one per config plus one per policy.
//! Rows are not deduplicated, so a policy id shared by two configs yields two
//! rows.

use tracing::{debug, info};

use super::resolver::enumerate_configs;
use crate::models::{AppResult, PolicyRow, SecurityConfig};
use crate::providers::AppSecClient;

/// Fetches and flattens policy state for one account
pub struct PolicyAggregator<'a> {
    client: &'a AppSecClient,
    switch_key: &'a str,
}

impl<'a> PolicyAggregator<'a> {
    pub fn new(client: &'a AppSecClient, switch_key: &'a str) -> Self {
        Self { client, switch_key }
    }

    /// Enumerate production configs, then aggregate their policies.
    pub async fn build_full_rows(&self) -> AppResult<Vec<PolicyRow>> {
        let configs = enumerate_configs(self.client, self.switch_key).await?;
        self.build_rows(&configs).await
    }

    /// Rows ordered by config order, then policy order within each config.
    /// The first failing request aborts the whole aggregation.
    pub async fn build_rows(&self, configs: &[SecurityConfig]) -> AppResult<Vec<PolicyRow>> {
        let mut rows = Vec::new();

        for config in configs {
            let policies = self
                .client
                .security_policies(config.config_id, config.production_version, self.switch_key)
                .await?;
            debug!(
                "{} ({} v{}): {} policies",
                config.config_name,
                config.config_id,
                config.production_version,
                policies.len()
            );

            for policy in &policies {
                // The mode lives under the config version the policy was listed from
                let mode = self
                    .client
                    .policy_mode(
                        config.config_id,
                        config.production_version,
                        &policy.policy_id,
                        self.switch_key,
                    )
                    .await?;
                rows.push(PolicyRow::merge(config, policy, mode));
            }
        }

        info!("📊 Aggregated {} policy rows from {} configs", rows.len(), configs.len());
        Ok(rows)
    }
}
