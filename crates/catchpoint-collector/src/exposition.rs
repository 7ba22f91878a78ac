//! Prometheus text exposition.
//!
//! Each scrape renders its observations into a registry built from scratch,
//! so stale series from earlier scrapes can never linger. Only families that
//! received at least one observation are registered; a scrape where every
//! fetch failed therefore renders nothing but `catchpoint_up`.

use crate::error::ExpositionError;
use crate::{MetricId, Observation};
use prometheus::{Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::BTreeMap;

/// Renders observations as Prometheus text format, version 0.0.4.
///
/// Observations repeating the same family and label values overwrite each
/// other, last write wins. An observation whose label count does not match
/// its family's schema is a programming error and fails the render.
pub fn render(observations: &[Observation]) -> Result<String, ExpositionError> {
    let registry = Registry::new();

    let mut grouped: BTreeMap<MetricId, Vec<&Observation>> = BTreeMap::new();
    for observation in observations {
        grouped.entry(observation.metric).or_default().push(observation);
    }

    for (metric, group) in grouped {
        let family = metric.family();
        let opts = Opts::new(family.name, family.help);

        if family.labels.is_empty() {
            let gauge = Gauge::with_opts(opts)?;
            registry.register(Box::new(gauge.clone()))?;
            for observation in group {
                check_arity(metric, family.labels.len(), observation.labels.len())?;
                gauge.set(observation.value);
            }
        } else {
            let gauge = GaugeVec::new(opts, family.labels)?;
            registry.register(Box::new(gauge.clone()))?;
            for observation in group {
                check_arity(metric, family.labels.len(), observation.labels.len())?;
                let values: Vec<&str> = observation.labels.iter().map(String::as_str).collect();
                gauge.get_metric_with_label_values(&values)?.set(observation.value);
            }
        }
    }

    let encoder = TextEncoder::new();
    Ok(encoder.encode_to_string(&registry.gather())?)
}

fn check_arity(metric: MetricId, expected: usize, got: usize) -> Result<(), ExpositionError> {
    if expected != got {
        return Err(ExpositionError::LabelArity {
            metric: metric.family().name,
            expected,
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlabeled_families_render_as_plain_gauges() {
        let text = render(&[Observation::unlabeled(MetricId::Up, 1.0)]).unwrap();
        assert!(text.contains("# HELP catchpoint_up"));
        assert!(text.contains("# TYPE catchpoint_up gauge"));
        assert!(text.contains("catchpoint_up 1\n"));
    }

    #[test]
    fn labeled_families_render_with_label_pairs() {
        let text = render(&[Observation::new(
            MetricId::NodeStatus,
            vec!["1".to_string(), "Node 1".to_string()],
            1.0,
        )])
        .unwrap();
        assert!(text.contains("catchpoint_node_status{node_id=\"1\",node_name=\"Node 1\"} 1"));
    }

    #[test]
    fn only_observed_families_appear() {
        let text = render(&[
            Observation::unlabeled(MetricId::Up, 1.0),
            Observation::unlabeled(MetricId::TestErrorTotalCount, 15.0),
        ])
        .unwrap();
        assert!(text.contains("catchpoint_up 1"));
        assert!(text.contains("catchpoint_test_error_total_count 15"));
        assert!(!text.contains("catchpoint_node_status"));
        assert!(!text.contains("catchpoint_node_run_rate"));
    }

    #[test]
    fn duplicate_label_sets_keep_the_last_value() {
        let labels = vec!["1".to_string(), "Test 1".to_string(), "1".to_string(), "Node 1".to_string()];
        let text = render(&[
            Observation::new(MetricId::TestAlertsCritical, labels.clone(), 1.0),
            Observation::new(MetricId::TestAlertsCritical, labels, 1.0),
        ])
        .unwrap();
        // One series, not two.
        assert_eq!(text.matches("catchpoint_test_alerts_critical_count{").count(), 1);
    }

    #[test]
    fn label_arity_mismatch_fails_the_render() {
        let result = render(&[Observation::new(
            MetricId::NodeStatus,
            vec!["1".to_string()],
            1.0,
        )]);
        assert!(matches!(
            result,
            Err(ExpositionError::LabelArity {
                metric: "catchpoint_node_status",
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn empty_observation_list_renders_empty_output() {
        assert!(render(&[]).unwrap().is_empty());
    }
}
