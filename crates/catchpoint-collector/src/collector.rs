//! Scrape orchestrator.
//!
//! One [`Collector::collect`] call runs the full fetch sequence: node status
//! per configured node, then the three account-wide resources, then the three
//! remaining per-node resources. Every fetch is paced through the rate
//! limiter and isolated — a failed fetch or normalization is logged and
//! skipped, never aborting the scrape. `catchpoint_up` is appended
//! unconditionally at the end.

use crate::config::Config;
use crate::error::ConfigError;
use crate::ratelimit::RateLimiter;
use crate::{normalize, CatchpointApi, CatchpointClient, MetricId, Observation};
use std::sync::Arc;
use tracing::warn;

pub struct Collector {
    node_ids: Vec<i64>,
    client: Arc<dyn CatchpointApi>,
    limiter: RateLimiter,
}

impl Collector {
    /// Builds a collector with the production HTTP transport.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = CatchpointClient::new(config.bearer_token.clone())?;
        Ok(Self {
            node_ids: config.node_ids.clone(),
            client: Arc::new(client),
            limiter: RateLimiter::from_secs(config.request_delay_secs),
        })
    }

    /// Builds a collector around an injected API implementation. Used by
    /// tests and embedders that manage their own transport.
    pub fn with_client(
        config: &Config,
        client: Arc<dyn CatchpointApi>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            node_ids: config.node_ids.clone(),
            client,
            limiter: RateLimiter::from_secs(config.request_delay_secs),
        })
    }

    /// Runs one full collection pass and returns every observation produced.
    /// Infallible: upstream failures shrink the result, the only guaranteed
    /// observation is the trailing `catchpoint_up`.
    pub async fn collect(&self) -> Vec<Observation> {
        let mut observations = Vec::new();

        for &node_id in &self.node_ids {
            self.limiter.wait().await;
            match self.client.fetch_node_status(node_id).await {
                Ok(response) => {
                    observations.extend(normalize::node_status(node_id, response.data.as_ref()));
                }
                Err(e) => warn!(node_id, error = %e, "Failed to fetch node status"),
            }
        }

        self.limiter.wait().await;
        match self.client.fetch_sla_purge_items().await {
            Ok(response) => {
                observations.extend(normalize::sla_purge_items(response.data.as_ref()));
            }
            Err(e) => warn!(error = %e, "Failed to fetch SLA purge items"),
        }

        self.limiter.wait().await;
        match self.client.fetch_test_errors_raw().await {
            Ok(response) => observations.extend(normalize::test_errors(response.data.as_ref())),
            Err(e) => warn!(error = %e, "Failed to fetch test errors"),
        }

        self.limiter.wait().await;
        match self.client.fetch_alerts().await {
            Ok(response) => {
                let alerts = response.data.map(|d| d.alerts).unwrap_or_default();
                observations.extend(normalize::alerts(&alerts));
            }
            Err(e) => warn!(error = %e, "Failed to fetch test alerts"),
        }

        for &node_id in &self.node_ids {
            self.limiter.wait().await;
            match self.client.fetch_node_test_runs(node_id).await {
                Ok(response) => {
                    let runs = response.data.map(|d| d.test_runs).unwrap_or_default();
                    observations.extend(normalize::test_runs(node_id, &runs));
                }
                Err(e) => warn!(node_id, error = %e, "Failed to fetch node test runs"),
            }

            self.limiter.wait().await;
            match self.client.fetch_node_run_rate(node_id).await {
                Ok(response) => match normalize::run_rate(node_id, response.data.as_ref()) {
                    Ok(mut obs) => observations.append(&mut obs),
                    Err(e) => warn!(node_id, error = %e, "Skipping node run rate"),
                },
                Err(e) => warn!(node_id, error = %e, "Failed to fetch node run rate"),
            }

            self.limiter.wait().await;
            match self.client.fetch_node_test_run_count(node_id).await {
                Ok(response) => {
                    let mut counts = normalize::test_run_count(node_id, response.data.as_ref());
                    for gap in &counts.gaps {
                        warn!(node_id, error = %gap, "Incomplete test run counts");
                    }
                    observations.append(&mut counts.observations);
                }
                Err(e) => warn!(node_id, error = %e, "Failed to fetch node test run count"),
            }
        }

        observations.push(Observation::unlabeled(MetricId::Up, 1.0));
        observations
    }
}
