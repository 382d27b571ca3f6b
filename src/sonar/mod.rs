// SPDX-License-Identifier: PMPL-1.0-or-later
//! SonarQube measures - metric kinds, wire types and parsed results

pub mod client;

pub use client::SonarClient;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A metric requested from `/api/measures/search`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    AlertStatus,
    Bugs,
    ReliabilityRating,
    Vulnerabilities,
    SecurityRating,
    CodeSmells,
    SqaleRating,
    DuplicatedLinesDensity,
    Coverage,
    Ncloc,
    NclocLanguageDistribution,
    CriticalViolations,
    BlockerViolations,
    MajorViolations,
    MinorViolations,
    InfoViolations,
}

impl MetricKind {
    /// Every metric, in the order it is requested
    pub const ALL: [MetricKind; 16] = [
        Self::AlertStatus,
        Self::Bugs,
        Self::ReliabilityRating,
        Self::Vulnerabilities,
        Self::SecurityRating,
        Self::CodeSmells,
        Self::SqaleRating,
        Self::DuplicatedLinesDensity,
        Self::Coverage,
        Self::Ncloc,
        Self::NclocLanguageDistribution,
        Self::CriticalViolations,
        Self::BlockerViolations,
        Self::MajorViolations,
        Self::MinorViolations,
        Self::InfoViolations,
    ];

    /// SonarQube metric key
    pub fn key(self) -> &'static str {
        match self {
            Self::AlertStatus => "alert_status",
            Self::Bugs => "bugs",
            Self::ReliabilityRating => "reliability_rating",
            Self::Vulnerabilities => "vulnerabilities",
            Self::SecurityRating => "security_rating",
            Self::CodeSmells => "code_smells",
            Self::SqaleRating => "sqale_rating",
            Self::DuplicatedLinesDensity => "duplicated_lines_density",
            Self::Coverage => "coverage",
            Self::Ncloc => "ncloc",
            Self::NclocLanguageDistribution => "ncloc_language_distribution",
            Self::CriticalViolations => "critical_violations",
            Self::BlockerViolations => "blocker_violations",
            Self::MajorViolations => "major_violations",
            Self::MinorViolations => "minor_violations",
            Self::InfoViolations => "info_violations",
        }
    }

    /// Look up a metric by its SonarQube key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Comma-joined `metricKeys` parameter
pub fn metric_keys() -> String {
    MetricKind::ALL
        .iter()
        .map(|kind| kind.key())
        .collect::<Vec<_>>()
        .join(",")
}

/// One `{metric, value}` record of a measures search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: String,
}

/// Body of `/api/measures/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasuresResponse {
    pub measures: Vec<Measure>,
}

/// Measures of one project, keyed by the metrics we asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measures {
    values: HashMap<MetricKind, String>,
}

impl Measures {
    /// Keep the requested metrics, drop anything else the server sent
    pub fn from_response(response: MeasuresResponse) -> Self {
        let values = response
            .measures
            .into_iter()
            .filter_map(|m| MetricKind::from_key(&m.metric).map(|kind| (kind, m.value)))
            .collect();
        Self { values }
    }

    /// Value of a metric, empty when the server did not report it
    pub fn get(&self, kind: MetricKind) -> &str {
        self.values.get(&kind).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, kind: MetricKind) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn quality_gate(&self) -> QualityGate {
        QualityGate::from_value(self.values.get(&MetricKind::AlertStatus).map(String::as_str))
    }
}

impl FromIterator<(MetricKind, String)> for Measures {
    fn from_iter<I: IntoIterator<Item = (MetricKind, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Quality gate verdict carried by the `alert_status` measure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityGate {
    Passed,
    Failed,
    Unknown,
}

impl QualityGate {
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("OK") => Self::Passed,
            Some("ERROR") => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(pairs: &[(&str, &str)]) -> MeasuresResponse {
        MeasuresResponse {
            measures: pairs
                .iter()
                .map(|(metric, value)| Measure {
                    metric: metric.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_every_kind_round_trips_through_its_key() {
        for kind in MetricKind::ALL {
            assert_eq!(MetricKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(MetricKind::from_key("sqale_index"), None);
    }

    #[test]
    fn test_metric_keys_matches_request_list() {
        assert_eq!(
            metric_keys(),
            "alert_status,bugs,reliability_rating,vulnerabilities,security_rating,\
             code_smells,sqale_rating,duplicated_lines_density,coverage,ncloc,\
             ncloc_language_distribution,critical_violations,blocker_violations,\
             major_violations,minor_violations,info_violations"
        );
    }

    #[test]
    fn test_unknown_metrics_ignored() {
        let measures = Measures::from_response(response(&[
            ("bugs", "3"),
            ("sqale_index", "120"),
            ("new_bugs", "1"),
        ]));
        assert_eq!(measures.len(), 1);
        assert_eq!(measures.get(MetricKind::Bugs), "3");
    }

    #[test]
    fn test_absent_metric_reads_empty() {
        let measures = Measures::from_response(response(&[("coverage", "87.5")]));
        assert!(!measures.contains(MetricKind::BlockerViolations));
        assert_eq!(measures.get(MetricKind::BlockerViolations), "");
    }

    #[test]
    fn test_measure_without_value_decodes() {
        let parsed: MeasuresResponse = serde_json::from_str(
            r#"{"measures":[{"metric":"coverage","component":"demo","bestValue":false}]}"#,
        )
        .unwrap();
        let measures = Measures::from_response(parsed);
        assert!(measures.contains(MetricKind::Coverage));
        assert_eq!(measures.get(MetricKind::Coverage), "");
    }

    #[test]
    fn test_quality_gate_values() {
        assert_eq!(QualityGate::from_value(Some("OK")), QualityGate::Passed);
        assert_eq!(QualityGate::from_value(Some("ERROR")), QualityGate::Failed);
        assert_eq!(QualityGate::from_value(Some("WARN")), QualityGate::Unknown);
        assert_eq!(QualityGate::from_value(Some("ok")), QualityGate::Unknown);
        assert_eq!(QualityGate::from_value(None), QualityGate::Unknown);
    }

    #[test]
    fn test_quality_gate_from_measures() {
        let measures = Measures::from_response(response(&[("alert_status", "ERROR")]));
        assert_eq!(measures.quality_gate(), QualityGate::Failed);
        assert_eq!(Measures::default().quality_gate(), QualityGate::Unknown);
    }
}
