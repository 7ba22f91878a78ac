//! Exporter configuration loaded from a TOML file.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable consulted when the config file omits `bearer_token`.
pub const BEARER_TOKEN_ENV: &str = "CATCHPOINT_BEARER_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct ExporterConfig {
    /// Catchpoint API credential. Falls back to `CATCHPOINT_BEARER_TOKEN`
    /// when absent from the file.
    pub bearer_token: Option<String>,
    /// Node ids to collect per-node metrics for.
    #[serde(default)]
    pub node_ids: Vec<i64>,
    /// Minimum delay between outbound API requests, in seconds.
    #[serde(default = "default_request_delay_secs")]
    pub request_delay_secs: u64,
    /// Port the HTTP server listens on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Path the metrics are served under.
    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
}

fn default_request_delay_secs() -> u64 {
    1
}

fn default_http_port() -> u16 {
    8080
}

fn default_telemetry_path() -> String {
    "/metrics".to_string()
}

impl ExporterConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: ExporterConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.bearer_token.is_none() {
            config.bearer_token = std::env::var(BEARER_TOKEN_ENV).ok().filter(|v| !v.is_empty());
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.telemetry_path.starts_with('/') {
            bail!(
                "telemetry_path must start with '/', got {:?}",
                self.telemetry_path
            );
        }
        // "/" is taken by the landing page; a second route there would
        // panic the router at startup.
        if self.telemetry_path == "/" {
            bail!("telemetry_path must not be \"/\"");
        }
        Ok(())
    }

    /// Projects the exporter config down to the collector's settings.
    pub fn collector_config(&self) -> catchpoint_collector::Config {
        catchpoint_collector::Config {
            bearer_token: self.bearer_token.clone().unwrap_or_default(),
            node_ids: self.node_ids.clone(),
            request_delay_secs: self.request_delay_secs,
        }
    }
}
