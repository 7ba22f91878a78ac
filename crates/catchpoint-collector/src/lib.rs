//! Collection and transformation engine for the Catchpoint exporter.
//!
//! Each scrape drives the seven Catchpoint API queries, normalizes their
//! nested response shapes into flat [`Observation`]s and renders them into a
//! fresh Prometheus registry. All scrape state is local to one
//! [`Collector::collect`] call, so concurrent scrapes never share mutable
//! state.

pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod exposition;
pub mod models;
pub mod normalize;
pub mod ratelimit;

#[cfg(test)]
pub(crate) mod testing;

use crate::error::UpstreamError;
use crate::models::{
    AlertsResponse, NodeRunRateResponse, NodeStatusResponse, NodeTestRunsResponse,
    SlaPurgeItemsResponse, TestErrorsResponse, TestRunCountResponse,
};

pub use crate::client::CatchpointClient;
pub use crate::collector::Collector;
pub use crate::config::Config;
pub use crate::ratelimit::RateLimiter;

/// Read access to the seven Catchpoint API resources consumed by the
/// collector. The production transport is [`CatchpointClient`]; tests inject
/// a stub implementation with per-call behavior.
#[async_trait::async_trait]
pub trait CatchpointApi: Send + Sync {
    /// Identity and operational status of one node.
    async fn fetch_node_status(&self, node_id: i64) -> Result<NodeStatusResponse, UpstreamError>;

    /// All SLA purge items for the account.
    async fn fetch_sla_purge_items(&self) -> Result<SlaPurgeItemsResponse, UpstreamError>;

    /// Raw time-windowed test error summaries.
    async fn fetch_test_errors_raw(&self) -> Result<TestErrorsResponse, UpstreamError>;

    /// All currently reported test alerts.
    async fn fetch_alerts(&self) -> Result<AlertsResponse, UpstreamError>;

    /// Usage and downtime percentages per test run on one node.
    async fn fetch_node_test_runs(
        &self,
        node_id: i64,
    ) -> Result<NodeTestRunsResponse, UpstreamError>;

    /// Request slippage and run rate sample series for one node.
    async fn fetch_node_run_rate(&self, node_id: i64)
        -> Result<NodeRunRateResponse, UpstreamError>;

    /// Categorized test run count sample series for one node.
    async fn fetch_node_test_run_count(
        &self,
        node_id: i64,
    ) -> Result<TestRunCountResponse, UpstreamError>;
}

/// The fourteen metric families the collector can emit. The exposition layer
/// maps each variant to its Prometheus name, help text and label schema via
/// [`MetricId::family`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricId {
    NodeStatus,
    SlaPurgeItemsCount,
    TestErrorTotalCount,
    TestErrorByType,
    TestErrorByIp,
    TestAlertsCritical,
    TestAlertsWarning,
    UsagePercentage,
    DowntimePercentage,
    RequestSlippage,
    RunRate,
    TotalTestRuns,
    UniqueTestRuns,
    Up,
}

/// Immutable descriptor for one metric family. Constructed once as static
/// data; never mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct FamilySpec {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

const NODE_LABELS: &[&str] = &["node_id", "node_name"];
const TEST_LABELS: &[&str] = &["test_id", "test_name", "node_id", "node_name"];
const TEST_RUN_LABELS: &[&str] = &["node_id", "test_name", "monitor_group"];
const STATUS_LABELS: &[&str] = &["status_id"];
const ERROR_TYPE_LABELS: &[&str] = &["error_type"];
const IP_ADDRESS_LABELS: &[&str] = &["ip"];
const NO_LABELS: &[&str] = &[];

impl MetricId {
    pub const ALL: [MetricId; 14] = [
        MetricId::NodeStatus,
        MetricId::SlaPurgeItemsCount,
        MetricId::TestErrorTotalCount,
        MetricId::TestErrorByType,
        MetricId::TestErrorByIp,
        MetricId::TestAlertsCritical,
        MetricId::TestAlertsWarning,
        MetricId::UsagePercentage,
        MetricId::DowntimePercentage,
        MetricId::RequestSlippage,
        MetricId::RunRate,
        MetricId::TotalTestRuns,
        MetricId::UniqueTestRuns,
        MetricId::Up,
    ];

    pub fn family(self) -> FamilySpec {
        match self {
            MetricId::NodeStatus => FamilySpec {
                name: "catchpoint_node_status",
                help: "The operational status of a Catchpoint node (1 for active, 0 for inactive).",
                labels: NODE_LABELS,
            },
            MetricId::SlaPurgeItemsCount => FamilySpec {
                name: "catchpoint_sla_purge_items_count",
                help: "Count of SLA purge items by status.",
                labels: STATUS_LABELS,
            },
            MetricId::TestErrorTotalCount => FamilySpec {
                name: "catchpoint_test_error_total_count",
                help: "The total count of all test errors.",
                labels: NO_LABELS,
            },
            MetricId::TestErrorByType => FamilySpec {
                name: "catchpoint_test_error_by_type_count",
                help: "Count of errors segmented by error type.",
                labels: ERROR_TYPE_LABELS,
            },
            MetricId::TestErrorByIp => FamilySpec {
                name: "catchpoint_test_error_by_ip_count",
                help: "Error counts traced back to specific IP addresses.",
                labels: IP_ADDRESS_LABELS,
            },
            MetricId::TestAlertsCritical => FamilySpec {
                name: "catchpoint_test_alerts_critical_count",
                help: "Total number of critical alerts by test.",
                labels: TEST_LABELS,
            },
            MetricId::TestAlertsWarning => FamilySpec {
                name: "catchpoint_test_alerts_warning_count",
                help: "Total number of warning alerts by test.",
                labels: TEST_LABELS,
            },
            MetricId::UsagePercentage => FamilySpec {
                name: "catchpoint_usage_percentage",
                help: "Usage percentage of test runs on a node",
                labels: TEST_RUN_LABELS,
            },
            MetricId::DowntimePercentage => FamilySpec {
                name: "catchpoint_downtime_percentage",
                help: "Downtime percentage of test runs on a node",
                labels: TEST_RUN_LABELS,
            },
            MetricId::RequestSlippage => FamilySpec {
                name: "catchpoint_node_request_slippage",
                help: "The slippage in test requests timings on a node, showing delays in scheduled test executions",
                labels: NODE_LABELS,
            },
            MetricId::RunRate => FamilySpec {
                name: "catchpoint_node_run_rate",
                help: "The rate of which test runs are successfully completed on a node",
                labels: NODE_LABELS,
            },
            MetricId::TotalTestRuns => FamilySpec {
                name: "catchpoint_total_test_runs_count",
                help: "The total number of test runs on a node",
                labels: NODE_LABELS,
            },
            MetricId::UniqueTestRuns => FamilySpec {
                name: "catchpoint_unique_test_runs_count",
                help: "The number of unique test runs on a node",
                labels: NODE_LABELS,
            },
            MetricId::Up => FamilySpec {
                name: "catchpoint_up",
                help: "Indicates whether the last scrape of metrics from Catchpoint was successful.",
                labels: NO_LABELS,
            },
        }
    }
}

/// One flat, scrape-scoped numeric observation: a metric family, an ordered
/// label value list matching the family's schema, and a gauge value.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub metric: MetricId,
    pub labels: Vec<String>,
    pub value: f64,
}

impl Observation {
    pub fn new(metric: MetricId, labels: Vec<String>, value: f64) -> Self {
        Self {
            metric,
            labels,
            value,
        }
    }

    /// An observation with no labels (the `up` and error-total families).
    pub fn unlabeled(metric: MetricId, value: f64) -> Self {
        Self::new(metric, Vec::new(), value)
    }
}
