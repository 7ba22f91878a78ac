//! In-process stub of [`CatchpointApi`] for collector tests.

use crate::error::UpstreamError;
use crate::models::{
    Alert, AlertsData, AlertsResponse, ApiEnvelope, ErrorDimension, ErrorSummaryItem, IdNamePair,
    MonitorBucket, NodeDetails, NodeInfo, NodeRecord, NodeRunRateData, NodeRunRateResponse,
    NodeStatusData, NodeStatusResponse, NodeTestRunsData, NodeTestRunsResponse, SlaItem,
    SlaPurgeItemsData, SlaPurgeItemsResponse, TestErrorsData, TestErrorsResponse,
    TestErrorsResponseItem, TestRun, TestRunCountData, TestRunCountResponse, TimeValue,
};
use crate::CatchpointApi;

type Stub<T> = Box<dyn Fn(i64) -> Result<T, UpstreamError> + Send + Sync>;

/// A [`CatchpointApi`] whose seven methods are independently replaceable
/// closures. [`MockCatchpointApi::default`] answers every call with a fixed
/// healthy payload for node 1; individual stubs are swapped per test to model
/// failures and gaps. Account-wide endpoints ignore the closure's id
/// argument.
pub struct MockCatchpointApi {
    pub node_status: Stub<NodeStatusResponse>,
    pub sla_purge_items: Stub<SlaPurgeItemsResponse>,
    pub test_errors: Stub<TestErrorsResponse>,
    pub alerts: Stub<AlertsResponse>,
    pub node_test_runs: Stub<NodeTestRunsResponse>,
    pub node_run_rate: Stub<NodeRunRateResponse>,
    pub node_test_run_count: Stub<TestRunCountResponse>,
}

fn pair(id: i64, name: &str) -> IdNamePair {
    IdNamePair {
        id,
        name: name.to_string(),
    }
}

fn summary(value: f64, error_type: &str, host_ip: &str) -> ErrorSummaryItem {
    ErrorSummaryItem {
        values: vec![value],
        dimensions: vec![
            ErrorDimension {
                id: 1,
                name: format!("ErrorType:{error_type}"),
            },
            ErrorDimension {
                id: 101,
                name: format!("HostIP:{host_ip}"),
            },
        ],
    }
}

fn alert(level: &str, test: IdNamePair, node: IdNamePair) -> Alert {
    Alert {
        level: pair(0, level),
        test,
        node,
        ..Alert::default()
    }
}

fn samples(values: &[f64]) -> Vec<TimeValue> {
    values
        .iter()
        .map(|&value| TimeValue {
            report_time: None,
            value,
        })
        .collect()
}

pub fn canned_node_status(node_id: i64) -> NodeStatusResponse {
    ApiEnvelope::of(NodeStatusData {
        nodes: Some(vec![NodeRecord {
            id: node_id,
            name: format!("Node {node_id}"),
            status: Some(pair(1, "active")),
        }]),
        has_more: false,
    })
}

pub fn canned_sla_purge_items() -> SlaPurgeItemsResponse {
    ApiEnvelope::of(SlaPurgeItemsData {
        sla_items: Some(vec![SlaItem {
            id: 1,
            status_type: pair(1, "Active"),
            ..SlaItem::default()
        }]),
        has_more: false,
    })
}

pub fn canned_test_errors() -> TestErrorsResponse {
    ApiEnvelope::of(TestErrorsData {
        response_items: vec![TestErrorsResponseItem {
            summary_items: vec![
                summary(6.0, "DNS", "192.0.2.1"),
                summary(4.0, "Connection", "198.51.100.1"),
                summary(3.0, "SSL", "203.0.113.1"),
                summary(2.0, "NoResponse", "192.0.2.2"),
            ],
            ..TestErrorsResponseItem::default()
        }],
    })
}

pub fn canned_alerts() -> AlertsResponse {
    ApiEnvelope::of(AlertsData {
        alerts: vec![
            alert("Critical", pair(1, "Test 1"), pair(1, "Node 1")),
            alert("Warning", pair(2, "Test 2"), pair(1, "Node 1")),
        ],
        has_more: false,
    })
}

pub fn canned_node_test_runs() -> NodeTestRunsResponse {
    ApiEnvelope::of(NodeTestRunsData {
        test_runs: vec![TestRun {
            test_id: 1,
            test_name: "Test 1".to_string(),
            runs: 25,
            usage_percentage: 75.0,
            down_time_percentage: 5.0,
            monitor_group: pair(1, "Browser"),
            ..TestRun::default()
        }],
        total_tests: 1,
        has_more: false,
    })
}

pub fn canned_node_run_rate(node_id: i64) -> NodeRunRateResponse {
    ApiEnvelope::of(NodeRunRateData {
        node: NodeDetails {
            node: NodeInfo {
                id: node_id,
                name: format!("Node {node_id}"),
                ..NodeInfo::default()
            },
        },
        request_slippages: samples(&[100.0]),
        run_rates: samples(&[95.0]),
        has_more: false,
    })
}

pub fn canned_test_run_count(node_id: i64) -> TestRunCountResponse {
    ApiEnvelope::of(TestRunCountData {
        node: NodeInfo {
            id: node_id,
            name: format!("Node {node_id}"),
            ..NodeInfo::default()
        },
        all_test_runs: vec![
            MonitorBucket {
                monitor_set_type: pair(1, "Browser"),
                data: samples(&[25.0]),
            },
            MonitorBucket {
                monitor_set_type: pair(2, "API"),
                data: samples(&[10.0]),
            },
        ],
        unique_test_runs: vec![MonitorBucket {
            monitor_set_type: pair(1, "Browser"),
            data: samples(&[25.0]),
        }],
        has_more: false,
    })
}

fn stub_error() -> UpstreamError {
    UpstreamError::Api {
        status: 500,
        messages: vec!["stubbed failure".to_string()],
    }
}

impl Default for MockCatchpointApi {
    fn default() -> Self {
        Self {
            node_status: Box::new(|id| Ok(canned_node_status(id))),
            sla_purge_items: Box::new(|_| Ok(canned_sla_purge_items())),
            test_errors: Box::new(|_| Ok(canned_test_errors())),
            alerts: Box::new(|_| Ok(canned_alerts())),
            node_test_runs: Box::new(|_| Ok(canned_node_test_runs())),
            node_run_rate: Box::new(|id| Ok(canned_node_run_rate(id))),
            node_test_run_count: Box::new(|id| Ok(canned_test_run_count(id))),
        }
    }
}

impl MockCatchpointApi {
    /// A mock whose every method fails with an API error.
    pub fn failing() -> Self {
        Self {
            node_status: Box::new(|_| Err(stub_error())),
            sla_purge_items: Box::new(|_| Err(stub_error())),
            test_errors: Box::new(|_| Err(stub_error())),
            alerts: Box::new(|_| Err(stub_error())),
            node_test_runs: Box::new(|_| Err(stub_error())),
            node_run_rate: Box::new(|_| Err(stub_error())),
            node_test_run_count: Box::new(|_| Err(stub_error())),
        }
    }
}

#[async_trait::async_trait]
impl CatchpointApi for MockCatchpointApi {
    async fn fetch_node_status(&self, node_id: i64) -> Result<NodeStatusResponse, UpstreamError> {
        (self.node_status)(node_id)
    }

    async fn fetch_sla_purge_items(&self) -> Result<SlaPurgeItemsResponse, UpstreamError> {
        (self.sla_purge_items)(0)
    }

    async fn fetch_test_errors_raw(&self) -> Result<TestErrorsResponse, UpstreamError> {
        (self.test_errors)(0)
    }

    async fn fetch_alerts(&self) -> Result<AlertsResponse, UpstreamError> {
        (self.alerts)(0)
    }

    async fn fetch_node_test_runs(
        &self,
        node_id: i64,
    ) -> Result<NodeTestRunsResponse, UpstreamError> {
        (self.node_test_runs)(node_id)
    }

    async fn fetch_node_run_rate(
        &self,
        node_id: i64,
    ) -> Result<NodeRunRateResponse, UpstreamError> {
        (self.node_run_rate)(node_id)
    }

    async fn fetch_node_test_run_count(
        &self,
        node_id: i64,
    ) -> Result<TestRunCountResponse, UpstreamError> {
        (self.node_test_run_count)(node_id)
    }
}
