//! Pure normalizers mapping nested API payloads to flat observations.
//!
//! One function per upstream resource, no state between invocations. Gaps in
//! a payload either produce a sentinel observation (node status, SLA items),
//! a structured gap the orchestrator logs (test run counts), or a
//! [`NormalizeError`] that skips the node entirely (run rate). The run-rate
//! and run-count policies differ on purpose; see DESIGN.md.

use crate::error::NormalizeError;
use crate::models::{
    Alert, NodeRunRateData, NodeStatusData, SlaPurgeItemsData, TestErrorsData, TestRun,
    TestRunCountData,
};
use crate::{MetricId, Observation};
use std::collections::BTreeMap;

/// Sentinel node name / status id emitted when an upstream payload carries no
/// records for a requested entity.
pub const NO_DATA: &str = "no_data";

const ERROR_TYPE_PREFIX: &str = "ErrorType";
const HOST_IP_PREFIX: &str = "HostIP";

/// One observation per node record, status 1 only for an `"active"` status
/// name. A payload with no node records yields exactly one `no_data` sentinel
/// for the requested id, so every configured node id produces exactly one
/// status observation per scrape.
pub fn node_status(requested_id: i64, data: Option<&NodeStatusData>) -> Vec<Observation> {
    let nodes = data.and_then(|d| d.nodes.as_deref()).unwrap_or(&[]);
    if nodes.is_empty() {
        return vec![Observation::new(
            MetricId::NodeStatus,
            vec![requested_id.to_string(), NO_DATA.to_string()],
            0.0,
        )];
    }

    nodes
        .iter()
        .map(|node| {
            let active = node
                .status
                .as_ref()
                .is_some_and(|status| status.name == "active");
            Observation::new(
                MetricId::NodeStatus,
                vec![node.id.to_string(), node.name.clone()],
                if active { 1.0 } else { 0.0 },
            )
        })
        .collect()
}

/// Count of SLA purge items grouped by status-type name. Items with an empty
/// status-type name are not counted. When the grouping ends up empty the
/// normalizer emits a single `no_data` count of 0 rather than nothing.
pub fn sla_purge_items(data: Option<&SlaPurgeItemsData>) -> Vec<Observation> {
    let items = data.and_then(|d| d.sla_items.as_deref()).unwrap_or(&[]);

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for item in items {
        if !item.status_type.name.is_empty() {
            *counts.entry(&item.status_type.name).or_default() += 1;
        }
    }

    if counts.is_empty() {
        return vec![Observation::new(
            MetricId::SlaPurgeItemsCount,
            vec![NO_DATA.to_string()],
            0.0,
        )];
    }

    counts
        .into_iter()
        .map(|(status, count)| {
            Observation::new(
                MetricId::SlaPurgeItemsCount,
                vec![status.to_string()],
                count as f64,
            )
        })
        .collect()
}

/// Emits three families from the raw error summaries: a global total summing
/// every value of every summary item, and two group-bys keyed on the value
/// half of each `Type:Value` dimension string (split on the first colon).
///
/// A summary item whose values array is empty contributes to neither
/// group-by. Dimension names without a colon, and prefixes other than
/// `ErrorType` / `HostIP`, are ignored. The total is emitted even when the
/// payload is empty.
pub fn test_errors(data: Option<&TestErrorsData>) -> Vec<Observation> {
    let items = data.map(|d| d.response_items.as_slice()).unwrap_or(&[]);

    let mut total = 0.0;
    let mut by_type: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_ip: BTreeMap<String, f64> = BTreeMap::new();

    for item in items {
        for summary in &item.summary_items {
            total += summary.values.iter().sum::<f64>();

            for dimension in &summary.dimensions {
                let Some((prefix, value)) = dimension.name.split_once(':') else {
                    continue;
                };
                let Some(&first) = summary.values.first() else {
                    continue;
                };
                match prefix {
                    ERROR_TYPE_PREFIX => *by_type.entry(value.to_string()).or_default() += first,
                    HOST_IP_PREFIX => *by_ip.entry(value.to_string()).or_default() += first,
                    _ => {}
                }
            }
        }
    }

    let mut observations = vec![Observation::unlabeled(MetricId::TestErrorTotalCount, total)];
    observations.extend(
        by_type
            .into_iter()
            .map(|(kind, count)| Observation::new(MetricId::TestErrorByType, vec![kind], count)),
    );
    observations.extend(
        by_ip
            .into_iter()
            .map(|(ip, count)| Observation::new(MetricId::TestErrorByIp, vec![ip], count)),
    );
    observations
}

/// One count-of-1 observation per alert at exactly the `"Critical"` or
/// `"Warning"` level; all other levels are dropped. Repeated alerts for the
/// same (test, node) pair are emitted individually and collide at the sink
/// with last-write-wins semantics.
pub fn alerts(alerts: &[Alert]) -> Vec<Observation> {
    alerts
        .iter()
        .filter_map(|alert| {
            let metric = match alert.level.name.as_str() {
                "Critical" => MetricId::TestAlertsCritical,
                "Warning" => MetricId::TestAlertsWarning,
                _ => return None,
            };
            Some(Observation::new(
                metric,
                vec![
                    alert.test.id.to_string(),
                    alert.test.name.clone(),
                    alert.node.id.to_string(),
                    alert.node.name.clone(),
                ],
                1.0,
            ))
        })
        .collect()
}

/// One usage and one downtime observation per test run entry, labeled by the
/// requested node id, test name and monitor group name.
pub fn test_runs(requested_id: i64, runs: &[TestRun]) -> Vec<Observation> {
    let mut observations = Vec::with_capacity(runs.len() * 2);
    for run in runs {
        let labels = vec![
            requested_id.to_string(),
            run.test_name.clone(),
            run.monitor_group.name.clone(),
        ];
        observations.push(Observation::new(
            MetricId::UsagePercentage,
            labels.clone(),
            run.usage_percentage,
        ));
        observations.push(Observation::new(
            MetricId::DowntimePercentage,
            labels,
            run.down_time_percentage,
        ));
    }
    observations
}

/// Takes only the most recent slippage and run-rate sample for the node. An
/// empty sequence fails the whole normalization for this node — no sentinel,
/// no partial emission.
pub fn run_rate(
    requested_id: i64,
    data: Option<&NodeRunRateData>,
) -> Result<Vec<Observation>, NormalizeError> {
    let data = data.ok_or(NormalizeError::MissingData {
        resource: "node run rate",
        node_id: requested_id,
    })?;

    let slippage = data
        .request_slippages
        .last()
        .ok_or(NormalizeError::EmptySeries {
            series: "requestSlippages",
            node_id: requested_id,
        })?;
    let rate = data.run_rates.last().ok_or(NormalizeError::EmptySeries {
        series: "runRates",
        node_id: requested_id,
    })?;

    let node = &data.node.node;
    let labels = vec![node.id.to_string(), node.name.clone()];
    Ok(vec![
        Observation::new(MetricId::RequestSlippage, labels.clone(), slippage.value),
        Observation::new(MetricId::RunRate, labels, rate.value),
    ])
}

/// Observations plus the gaps found while producing them. Gaps are logged by
/// the orchestrator as diagnostics; they never fail the scrape.
#[derive(Debug, Default)]
pub struct NormalizedRunCounts {
    pub observations: Vec<Observation>,
    pub gaps: Vec<NormalizeError>,
}

/// Last sample of the first `allTestRuns` bucket, then last sample of the
/// first `uniqueTestRuns` bucket. A missing or empty `allTestRuns` bucket
/// skips the node entirely (unique runs included); a missing or empty
/// `uniqueTestRuns` bucket skips only that family.
pub fn test_run_count(requested_id: i64, data: Option<&TestRunCountData>) -> NormalizedRunCounts {
    let mut result = NormalizedRunCounts::default();

    let Some(data) = data else {
        result.gaps.push(NormalizeError::MissingData {
            resource: "test run count",
            node_id: requested_id,
        });
        return result;
    };

    let node = &data.node;
    let labels = vec![node.id.to_string(), node.name.clone()];

    match data.all_test_runs.first().and_then(|b| b.data.last()) {
        Some(last) => result.observations.push(Observation::new(
            MetricId::TotalTestRuns,
            labels.clone(),
            last.value,
        )),
        None => {
            result.gaps.push(NormalizeError::EmptySeries {
                series: "allTestRuns",
                node_id: node.id,
            });
            return result;
        }
    }

    match data.unique_test_runs.first().and_then(|b| b.data.last()) {
        Some(last) => result.observations.push(Observation::new(
            MetricId::UniqueTestRuns,
            labels,
            last.value,
        )),
        None => result.gaps.push(NormalizeError::EmptySeries {
            series: "uniqueTestRuns",
            node_id: node.id,
        }),
    }

    result
}
