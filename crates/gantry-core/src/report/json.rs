//! Machine-readable rendering of an aggregate view.

use crate::aggregate::AggregateView;

pub fn render(view: &AggregateView) -> serde_json::Value {
    let groups: Vec<serde_json::Value> = view
        .groups()
        .into_iter()
        .map(|((target, kind), _rows)| {
            let stats = view.group_stats(&target, kind);
            serde_json::json!({
                "target": target,
                "kind": kind,
                "stats": stats,
            })
        })
        .collect();

    let runs: Vec<serde_json::Value> = view
        .rows()
        .iter()
        .map(|row| {
            serde_json::json!({
                "target": row.record.target,
                "kind": row.record.kind,
                "timestamp": row.record.timestamp.to_rfc3339(),
                "file": row.record.path,
                "summary": row.summary,
            })
        })
        .collect();

    serde_json::json!({
        "groups": groups,
        "runs": runs,
        "stats": view.stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AggregateView, ResultRow};
    use crate::model::{MetricSummary, RunKind, RunRecord};
    use chrono::{TimeZone, Utc};

    #[test]
    fn renders_groups_runs_and_overall_stats() {
        let view = AggregateView::build(vec![ResultRow {
            record: RunRecord {
                target: "gcp".into(),
                kind: RunKind::Load,
                timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
                path: "results/k6/gcp/load/load_20260101T000000Z.json".into(),
            },
            summary: MetricSummary {
                total_requests: 42,
                ..Default::default()
            },
        }]);

        let v = render(&view);
        assert_eq!(v["groups"][0]["target"], "gcp");
        assert_eq!(v["groups"][0]["kind"], "load");
        assert_eq!(v["runs"][0]["summary"]["total_requests"], 42);
        assert_eq!(v["stats"]["runs"], 1);
        assert!(v["stats"]["mean_p95_ms"].is_null());
    }

    #[test]
    fn empty_view_renders_empty_arrays() {
        let v = render(&AggregateView::default());
        assert_eq!(v["groups"].as_array().unwrap().len(), 0);
        assert_eq!(v["runs"].as_array().unwrap().len(), 0);
        assert_eq!(v["stats"]["runs"], 0);
    }
}
