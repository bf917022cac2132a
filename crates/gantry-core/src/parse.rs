//! Parse a k6 `--summary-export` file into a [`MetricSummary`].
//!
//! Pure function of file contents. Individual missing metrics degrade to
//! zero or `None`; only a missing file or an undecodable document fail.

use crate::errors::RunError;
use crate::model::MetricSummary;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
struct RawSummary {
    #[serde(default)]
    metrics: BTreeMap<String, RawMetric>,
}

/// One metric object from the export. Every field is optional; k6 only emits
/// the ones relevant to the metric's type (rate, trend, counter, check).
#[derive(Debug, Deserialize, Default)]
struct RawMetric {
    value: Option<f64>,
    #[serde(rename = "p(95)")]
    p95: Option<f64>,
    avg: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    passes: Option<f64>,
    fails: Option<f64>,
    count: Option<f64>,
}

pub fn parse_summary(path: &Path) -> Result<MetricSummary, RunError> {
    if !path.exists() {
        return Err(RunError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|e| RunError::MalformedResult {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let summary: RawSummary =
        serde_json::from_str(&raw).map_err(|e| RunError::MalformedResult {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let metric = |name: &str| summary.metrics.get(name);

    let req_failed = metric("http_req_failed");
    let duration = metric("http_req_duration");
    let checks = metric("checks");
    let reqs = metric("http_reqs");

    let count_of = |m: Option<&RawMetric>, pick: fn(&RawMetric) -> Option<f64>| {
        m.and_then(pick).map(|v| v.max(0.0) as u64).unwrap_or(0)
    };

    Ok(MetricSummary {
        fail_rate_pct: req_failed.and_then(|m| m.value).unwrap_or(0.0) * 100.0,
        p95_latency_ms: duration.and_then(|m| m.p95),
        avg_latency_ms: duration.and_then(|m| m.avg),
        min_latency_ms: duration.and_then(|m| m.min),
        max_latency_ms: duration.and_then(|m| m.max),
        checks_passed: count_of(checks, |m| m.passes),
        checks_failed: count_of(checks, |m| m.fails),
        total_requests: count_of(reqs, |m| m.count),
    })
}
