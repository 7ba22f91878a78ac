//! Collector configuration: credential, node set and request pacing.

use crate::error::ConfigError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bearer credential for the Catchpoint API. Must be non-empty; checked
    /// once at startup, never per scrape.
    pub bearer_token: String,
    /// Node ids to collect per-node metrics for.
    #[serde(default)]
    pub node_ids: Vec<i64>,
    /// Minimum delay between outbound API requests, in seconds.
    #[serde(default = "default_request_delay_secs")]
    pub request_delay_secs: u64,
}

fn default_request_delay_secs() -> u64 {
    1
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bearer_token.is_empty() {
            return Err(ConfigError::MissingBearerToken);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bearer_token_is_rejected() {
        let config = Config {
            bearer_token: String::new(),
            node_ids: vec![1],
            request_delay_secs: 1,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingBearerToken)
        ));
    }

    #[test]
    fn populated_config_validates() {
        let config = Config {
            bearer_token: "token".to_string(),
            node_ids: vec![1, 2],
            request_delay_secs: 0,
        };
        assert!(config.validate().is_ok());
    }
}
