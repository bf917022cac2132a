//! Console rendering. Formatters are pure `String` producers so they are
//! unit-testable; printing happens only in the `print_*` helpers at the
//! boundary. Rendering never mutates the underlying records.

use crate::aggregate::AggregateView;
use crate::engine::{BatchReport, PairOutcome, PairState};
use crate::model::{format_run_timestamp, MetricSummary};

fn fmt_opt_ms(v: Option<f64>) -> String {
    v.map(|x| format!("{:.2}", x)).unwrap_or_else(|| "n/a".into())
}

/// Single-run metric table, shown after an explicit `run`.
#[must_use]
pub fn format_run_summary(file_name: &str, s: &MetricSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Run summary: {}\n", file_name));
    out.push_str(&format!("  {:<22}{:.2}\n", "Fail rate (%)", s.fail_rate_pct));
    out.push_str(&format!(
        "  {:<22}{}\n",
        "p95 latency (ms)",
        fmt_opt_ms(s.p95_latency_ms)
    ));
    out.push_str(&format!("  {:<22}{}\n", "Checks passed", s.checks_passed));
    out.push_str(&format!("  {:<22}{}\n", "Checks failed", s.checks_failed));
    out.push_str(&format!("  {:<22}{}\n", "Total requests", s.total_requests));
    out
}

/// Aggregate table: one line per (target, kind) group, then every run.
#[must_use]
pub fn format_aggregate(view: &AggregateView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<6} {:>5} {:>15} {:>14} {:>12}\n",
        "TARGET", "KIND", "RUNS", "MEAN P95 (MS)", "MEAN FAIL (%)", "TOTAL REQS"
    ));
    let groups = view.groups();
    for ((target, kind), _) in &groups {
        let stats = view.group_stats(target, *kind);
        out.push_str(&format!(
            "{:<12} {:<6} {:>5} {:>15} {:>14} {:>12}\n",
            target,
            kind,
            stats.runs,
            fmt_opt_ms(stats.mean_p95_ms),
            fmt_opt_ms(stats.mean_fail_rate_pct),
            stats.total_requests
        ));
    }

    out.push_str("\nRuns:\n");
    for row in view.rows() {
        out.push_str(&format!(
            "  {:<12} {:<6} {}  p95={} fail={:.2}% checks={}/{} reqs={}\n",
            row.record.target,
            row.record.kind,
            format_run_timestamp(row.record.timestamp),
            fmt_opt_ms(row.summary.p95_latency_ms),
            row.summary.fail_rate_pct,
            row.summary.checks_passed,
            row.summary.checks_failed,
            row.summary.total_requests
        ));
    }

    let overall = view.stats();
    out.push_str(&format!(
        "\n{} runs across {} groups, {} requests total\n",
        overall.runs,
        groups.len(),
        overall.total_requests
    ));
    out
}

/// One status line per pair, icon first.
#[must_use]
pub fn format_pair_line(o: &PairOutcome) -> String {
    let label = format!("{}/{}", o.target, o.kind);
    match &o.state {
        PairState::Reported => {
            let p95 = o
                .summary
                .as_ref()
                .map(|s| fmt_opt_ms(s.p95_latency_ms))
                .unwrap_or_else(|| "n/a".into());
            format!("✅ {:<20} reported  p95={}", label, p95)
        }
        PairState::Failed(stage) => {
            let err = o
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            format!("❌ {:<20} failed while {}: {}", label, stage, err)
        }
        PairState::Skipped => format!("⏭️  {:<20} skipped (cancelled)", label),
    }
}

pub fn print_batch_summary(report: &BatchReport) {
    eprintln!();
    for outcome in &report.outcomes {
        eprintln!("{}", format_pair_line(outcome));
    }
    eprintln!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!(
        "All pairs attempted: {} reported, {} failed, {} skipped",
        report.reported_count(),
        report.failed_count(),
        report.skipped_count()
    );
}
