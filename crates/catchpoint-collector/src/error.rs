//! Error types for the collector crate.
//!
//! Upstream fetch errors and normalization gaps are always recovered locally
//! by the orchestrator; only configuration errors are fatal, and only at
//! startup.

/// Errors raised by the Catchpoint API transport.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Non-2xx status from the API, with any vendor-supplied error messages
    /// recovered from the response body.
    #[error("API request failed with status {status}: {}", .messages.join(", "))]
    Api { status: u16, messages: Vec<String> },

    /// Underlying HTTP transport failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 2xx response whose body did not parse as the expected envelope.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Gaps found while normalizing a successfully fetched payload. These are
/// logged as diagnostics and skip the affected observations; they never abort
/// the scrape.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("no data in {resource} response for node {node_id}")]
    MissingData {
        resource: &'static str,
        node_id: i64,
    },

    #[error("empty {series} series for node {node_id}")]
    EmptySeries {
        series: &'static str,
        node_id: i64,
    },
}

/// Startup configuration errors. These are the only errors that prevent a
/// scrape cycle from starting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("bearer token must be specified")]
    MissingBearerToken,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors raised while rendering observations into the metric registry.
#[derive(Debug, thiserror::Error)]
pub enum ExpositionError {
    /// An observation's label count does not match its family's schema. This
    /// is a programming error in a normalizer, surfaced rather than dropped.
    #[error("label arity mismatch for {metric}: expected {expected} labels, got {got}")]
    LabelArity {
        metric: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("metric registry error: {0}")]
    Registry(#[from] prometheus::Error),
}
