//! HTTP transport for the Catchpoint API v2.
//!
//! Authenticates with a bearer token and decodes every response through the
//! shared [`ApiEnvelope`] shape. Error bodies are mined for vendor-supplied
//! messages so fetch failures are loggable with context.

use crate::error::UpstreamError;
use crate::models::{
    AlertsResponse, ApiEnvelope, ApiError, NodeRunRateResponse, NodeStatusResponse,
    NodeTestRunsResponse, SlaPurgeItemsResponse, TestErrorsResponse, TestRunCountResponse,
};
use crate::CatchpointApi;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://io.catchpoint.com/api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct CatchpointClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl CatchpointClient {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_base_url(bearer_token, DEFAULT_BASE_URL)
    }

    /// Points the client at a non-default base URL, e.g. a local stub server.
    pub fn with_base_url(
        bearer_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiEnvelope<T>, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Builds an [`UpstreamError::Api`] from a non-2xx response, recovering the
/// vendor's `errors[].message` strings when the body parses.
fn api_error(status: StatusCode, body: &str) -> UpstreamError {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        errors: Vec<ApiError>,
    }

    let messages = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.errors.into_iter().map(|e| e.message).collect())
        .unwrap_or_default();

    UpstreamError::Api {
        status: status.as_u16(),
        messages,
    }
}

#[async_trait::async_trait]
impl CatchpointApi for CatchpointClient {
    async fn fetch_node_status(&self, node_id: i64) -> Result<NodeStatusResponse, UpstreamError> {
        self.get_json(&format!("/nodes/status/{node_id}")).await
    }

    async fn fetch_sla_purge_items(&self) -> Result<SlaPurgeItemsResponse, UpstreamError> {
        self.get_json("/slapurgeitems").await
    }

    async fn fetch_test_errors_raw(&self) -> Result<TestErrorsResponse, UpstreamError> {
        self.get_json("/tests/errors/raw").await
    }

    async fn fetch_alerts(&self) -> Result<AlertsResponse, UpstreamError> {
        self.get_json("/tests/alerts").await
    }

    async fn fetch_node_test_runs(
        &self,
        node_id: i64,
    ) -> Result<NodeTestRunsResponse, UpstreamError> {
        self.get_json(&format!("/nodes/testrun/{node_id}")).await
    }

    async fn fetch_node_run_rate(
        &self,
        node_id: i64,
    ) -> Result<NodeRunRateResponse, UpstreamError> {
        self.get_json(&format!("/nodes/runrate/{node_id}")).await
    }

    async fn fetch_node_test_run_count(
        &self,
        node_id: i64,
    ) -> Result<TestRunCountResponse, UpstreamError> {
        self.get_json(&format!("/nodes/testruncount/{node_id}")).await
    }
}
