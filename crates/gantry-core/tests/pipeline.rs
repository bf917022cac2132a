//! End-to-end over the public API: orchestrate a batch with a scripted
//! process runner, then rediscover the written artifacts and aggregate them.
//! No real external process is spawned.

use gantry_core::aggregate::{load_rows, AggregateView};
use gantry_core::config::GantryConfig;
use gantry_core::discover::discover_records;
use gantry_core::engine::Engine;
use gantry_core::model::RunKind;
use gantry_core::process::{Captured, CommandRunner, CommandSpec, RunStatus};
use std::path::Path;
use std::time::Duration;

struct ScriptedRunner;

impl CommandRunner for ScriptedRunner {
    fn capture(&self, _spec: &CommandSpec) -> std::io::Result<Captured> {
        Ok(Captured {
            exit_code: Some(0),
            stdout: "http://svc.example/\n".into(),
            stderr: String::new(),
        })
    }

    fn run(&self, spec: &CommandSpec, _timeout: Option<Duration>) -> std::io::Result<RunStatus> {
        let out = spec
            .args
            .iter()
            .position(|a| a == "--summary-export")
            .map(|i| spec.args[i + 1].clone())
            .expect("engine invocation always exports a summary");
        std::fs::write(
            out,
            r#"{
                "metrics": {
                    "http_req_failed": {"value": 0.02},
                    "http_req_duration": {"p(95)": 345.6},
                    "checks": {"passes": 10, "fails": 1},
                    "http_reqs": {"count": 11}
                }
            }"#,
        )?;
        Ok(RunStatus {
            exit_code: Some(0),
            timed_out: false,
        })
    }
}

fn config(results_root: &Path, target_dir: &Path) -> GantryConfig {
    serde_yaml::from_str(&format!(
        r#"
version: 1
results_root: {}
targets:
  aws:
    dir: {}
  gcp:
    dir: {}
scripts:
  smoke: k6/smoke.js
  load: k6/load.js
"#,
        results_root.display(),
        target_dir.display(),
        target_dir.display(),
    ))
    .unwrap()
}

#[test]
fn batch_results_survive_rediscovery_and_aggregate() {
    let tmp = tempfile::tempdir().unwrap();
    let results_root = tmp.path().join("results/k6");
    let cfg = config(&results_root, tmp.path());

    let runner = ScriptedRunner;
    let engine = Engine::new(&cfg, &runner);
    let report = engine.run_all(&cfg.target_names(), &RunKind::ALL);

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.reported_count(), 4);
    assert!(!report.any_failed());

    // Written artifacts follow the on-disk contract and round-trip through
    // discovery.
    let records = discover_records(&results_root);
    assert_eq!(records.len(), 4);
    assert!(records
        .iter()
        .all(|r| r.path.starts_with(&results_root)));

    let view = AggregateView::build(load_rows(records));
    assert_eq!(view.len(), 4);

    let stats = view.stats();
    assert_eq!(stats.runs, 4);
    assert_eq!(stats.total_requests, 44);
    assert!((stats.mean_p95_ms.unwrap() - 345.6).abs() < 1e-9);
    assert!((stats.mean_fail_rate_pct.unwrap() - 2.0).abs() < 1e-9);

    // Narrowing to one group leaves the full view untouched.
    let aws_smoke = view
        .filter_targets(&["aws".to_string()])
        .filter_kinds(&[RunKind::Smoke]);
    assert_eq!(aws_smoke.len(), 1);
    assert_eq!(view.len(), 4);
}
