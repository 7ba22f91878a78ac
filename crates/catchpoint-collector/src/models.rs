//! Response shapes for the Catchpoint API v2.
//!
//! Every endpoint wraps its payload in the same envelope (`data`, `messages`,
//! `errors`, `completed`, `traceId`, `usageLimits`); only `data` is consumed
//! by the normalizers. Fields are a subset of what the API returns — serde
//! ignores the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Common JSON envelope returned by every Catchpoint API v2 endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub trace_id: String,
    pub usage_limits: Option<UsageLimits>,
}

impl<T> ApiEnvelope<T> {
    /// Builds a minimal successful envelope around a payload. Used by tests
    /// and the mock API.
    pub fn of(data: T) -> Self {
        Self {
            data: Some(data),
            messages: Vec::new(),
            errors: Vec::new(),
            completed: true,
            trace_id: String::new(),
            usage_limits: None,
        }
    }
}

pub type NodeStatusResponse = ApiEnvelope<NodeStatusData>;
pub type SlaPurgeItemsResponse = ApiEnvelope<SlaPurgeItemsData>;
pub type TestErrorsResponse = ApiEnvelope<TestErrorsData>;
pub type AlertsResponse = ApiEnvelope<AlertsData>;
pub type NodeTestRunsResponse = ApiEnvelope<NodeTestRunsData>;
pub type NodeRunRateResponse = ApiEnvelope<NodeRunRateData>;
pub type TestRunCountResponse = ApiEnvelope<TestRunCountData>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiMessage {
    pub information: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiError {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageLimits {
    pub client_id: i64,
    pub last_request_timestamp: Option<DateTime<Utc>>,
    pub limits: HashMap<String, i64>,
    pub runs: HashMap<String, i64>,
}

/// An identifier-name pair, ubiquitous in Catchpoint payloads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IdNamePair {
    pub id: i64,
    pub name: String,
}

// ---- /nodes/status/{id} ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStatusData {
    pub nodes: Option<Vec<NodeRecord>>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeRecord {
    pub id: i64,
    pub name: String,
    pub status: Option<IdNamePair>,
}

// ---- /slapurgeitems ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlaPurgeItemsData {
    pub sla_items: Option<Vec<SlaItem>>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlaItem {
    pub id: i64,
    pub name: String,
    pub reason: String,
    pub status_type: IdNamePair,
    pub interval_start: Option<DateTime<Utc>>,
    pub interval_end: Option<DateTime<Utc>>,
    pub tests: Vec<IdNamePair>,
}

// ---- /tests/errors/raw ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestErrorsData {
    pub response_items: Vec<TestErrorsResponseItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestErrorsResponseItem {
    pub start_time_utc: String,
    pub end_time_utc: String,
    // The API spells this field with a capital S.
    #[serde(rename = "timeZoneOffSet")]
    pub time_zone_offset: String,
    pub has_more_records: bool,
    pub dimensions: Vec<ErrorDimension>,
    pub metrics: Vec<ErrorMetricName>,
    pub summary_items: Vec<ErrorSummaryItem>,
}

/// A dimension tag. `name` is a colon-delimited compound such as
/// `"ErrorType:DNS"` or `"HostIP:192.0.2.1"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorDimension {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorMetricName {
    pub index: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorSummaryItem {
    pub values: Vec<f64>,
    pub dimensions: Vec<ErrorDimension>,
}

// ---- /tests/alerts ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertsData {
    pub alerts: Vec<Alert>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    pub id: String,
    pub report_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub level: IdNamePair,
    pub test: IdNamePair,
    pub node: IdNamePair,
    pub alert_type: IdNamePair,
    pub trigger_type: IdNamePair,
    pub warning_trigger: f64,
    pub critical_trigger: f64,
    #[serde(rename = "durationInSecond")]
    pub duration_in_seconds: i64,
}

// ---- /nodes/testrun/{id} ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeTestRunsData {
    pub test_runs: Vec<TestRun>,
    pub total_tests: i64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestRun {
    pub test_id: i64,
    pub test_name: String,
    pub division_name: String,
    pub runs: i64,
    pub usage_percentage: f64,
    pub down_time_percentage: f64,
    pub monitor_group: IdNamePair,
}

// ---- /nodes/runrate/{id} ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeRunRateData {
    pub node: NodeDetails,
    pub request_slippages: Vec<TimeValue>,
    pub run_rates: Vec<TimeValue>,
    pub has_more: bool,
}

/// The run-rate endpoint nests node identity one level deeper than the
/// other node endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeDetails {
    pub node: NodeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeInfo {
    pub id: i64,
    pub name: String,
    pub status: IdNamePair,
    pub is_paused: bool,
    pub run_rate: f64,
    pub instance_count: i64,
    pub active_instance_count: i64,
    pub capacity: i64,
    pub network_type: IdNamePair,
    pub os_type: IdNamePair,
}

/// One timestamped sample in an ordered series.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeValue {
    pub report_time: Option<DateTime<Utc>>,
    pub value: f64,
}

// ---- /nodes/testruncount/{id} ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestRunCountData {
    pub node: NodeInfo,
    pub all_test_runs: Vec<MonitorBucket>,
    pub unique_test_runs: Vec<MonitorBucket>,
    pub has_more: bool,
}

/// A categorized, time-ordered sample bucket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorBucket {
    pub monitor_set_type: IdNamePair,
    pub data: Vec<TimeValue>,
}
