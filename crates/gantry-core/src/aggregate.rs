//! Grouped, filterable projections over (record, summary) pairs.
//!
//! Views are recomputed on demand and never mutate the underlying records;
//! filters return a new view and compose.

use crate::model::{MetricSummary, RunKind, RunRecord};
use crate::parse::parse_summary;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// One run joined with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub record: RunRecord,
    pub summary: MetricSummary,
}

/// Parse each discovered record's raw file. Unreadable or malformed files
/// are skipped with a warning so one corrupt export never hides the rest.
pub fn load_rows(records: Vec<RunRecord>) -> Vec<ResultRow> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        match parse_summary(&record.path) {
            Ok(summary) => rows.push(ResultRow { record, summary }),
            Err(e) => warn!(file = %record.path.display(), error = %e, "skipping unreadable result"),
        }
    }
    rows
}

/// Aggregate statistics over a selection. Means over an empty selection (or
/// one with no available entries) are `None`, never a division by zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub runs: usize,
    pub mean_p95_ms: Option<f64>,
    pub mean_fail_rate_pct: Option<f64>,
    pub total_requests: u64,
}

/// A filtered, grouped projection. Grouping key is (target, kind); rows
/// within a group are ordered by timestamp ascending.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateView {
    rows: Vec<ResultRow>,
}

impl AggregateView {
    pub fn build(mut rows: Vec<ResultRow>) -> Self {
        rows.sort_by(|a, b| {
            (&a.record.target, a.record.kind, a.record.timestamp).cmp(&(
                &b.record.target,
                b.record.kind,
                b.record.timestamp,
            ))
        });
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Keep rows whose target is in `names`. An empty list keeps everything
    /// (matches "no filter given" at the CLI).
    pub fn filter_targets(&self, names: &[String]) -> Self {
        if names.is_empty() {
            return self.clone();
        }
        Self {
            rows: self
                .rows
                .iter()
                .filter(|r| names.iter().any(|n| *n == r.record.target))
                .cloned()
                .collect(),
        }
    }

    /// Keep rows whose kind is in `kinds`. An empty list keeps everything.
    pub fn filter_kinds(&self, kinds: &[RunKind]) -> Self {
        if kinds.is_empty() {
            return self.clone();
        }
        Self {
            rows: self
                .rows
                .iter()
                .filter(|r| kinds.contains(&r.record.kind))
                .cloned()
                .collect(),
        }
    }

    /// Rows grouped by (target, kind), groups in key order.
    pub fn groups(&self) -> Vec<((String, RunKind), Vec<&ResultRow>)> {
        let mut map: BTreeMap<(String, RunKind), Vec<&ResultRow>> = BTreeMap::new();
        for row in &self.rows {
            map.entry((row.record.target.clone(), row.record.kind))
                .or_default()
                .push(row);
        }
        map.into_iter().collect()
    }

    /// Statistics over the whole selection.
    pub fn stats(&self) -> GroupStats {
        Self::stats_over(self.rows.iter())
    }

    fn stats_over<'a>(rows: impl Iterator<Item = &'a ResultRow>) -> GroupStats {
        let mut runs = 0usize;
        let mut p95_sum = 0.0f64;
        let mut p95_n = 0usize;
        let mut fail_sum = 0.0f64;
        let mut total_requests = 0u64;

        for row in rows {
            runs += 1;
            fail_sum += row.summary.fail_rate_pct;
            total_requests += row.summary.total_requests;
            if let Some(p95) = row.summary.p95_latency_ms {
                p95_sum += p95;
                p95_n += 1;
            }
        }

        GroupStats {
            runs,
            mean_p95_ms: (p95_n > 0).then(|| p95_sum / p95_n as f64),
            mean_fail_rate_pct: (runs > 0).then(|| fail_sum / runs as f64),
            total_requests,
        }
    }

    /// Statistics for one (target, kind) group.
    pub fn group_stats(&self, target: &str, kind: RunKind) -> GroupStats {
        Self::stats_over(
            self.rows
                .iter()
                .filter(|r| r.record.target == target && r.record.kind == kind),
        )
    }
}
