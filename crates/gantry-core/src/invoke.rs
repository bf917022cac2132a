//! Drive one load-test run: prepare the results directory, compute the
//! timestamped output path, and execute the engine synchronously.

use crate::errors::RunError;
use crate::model::{format_run_timestamp, RunKind};
use crate::process::{CommandRunner, CommandSpec};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// What to run.
#[derive(Debug, Clone)]
pub struct InvokePlan {
    pub script: PathBuf,
    pub target_url: String,
    /// Identity tag the script asserts against (`EXPECT_CLOUD`).
    pub expect: String,
    pub target: String,
    pub kind: RunKind,
}

/// Recognized invocation options. Nothing else is forwarded to the engine.
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    pub engine_command: String,
    pub results_root: PathBuf,
    pub timeout: Option<Duration>,
    /// Extra `--tag name=value` forwarded verbatim.
    pub extra_tag: Option<String>,
}

/// Where the engine wrote (or should have written) its summary, plus how the
/// child exited. A non-zero exit is recorded here, not treated as an error:
/// the summary file is the source of truth and the parse stage decides.
#[derive(Debug, Clone)]
pub struct InvokeOutcome {
    pub path: PathBuf,
    pub exit_code: Option<i32>,
    pub started_at: DateTime<Utc>,
}

/// Result file path for a run started at `at`.
///
/// Second precision: runs started in different seconds get distinct names.
/// Two runs started within the same second would collide; gantry invokes the
/// engine serially, so this is accepted rather than worked around.
pub fn result_path(root: &Path, target: &str, kind: RunKind, at: DateTime<Utc>) -> PathBuf {
    root.join(target)
        .join(kind.as_str())
        .join(format!("{}_{}.json", kind.as_str(), format_run_timestamp(at)))
}

pub fn invoke(
    plan: &InvokePlan,
    options: &InvokeOptions,
    runner: &dyn CommandRunner,
) -> Result<InvokeOutcome, RunError> {
    let out_dir = options.results_root.join(&plan.target).join(plan.kind.as_str());
    std::fs::create_dir_all(&out_dir).map_err(|e| RunError::Io {
        path: out_dir.clone(),
        source: e,
    })?;

    let started_at = Utc::now();
    let out_file = result_path(&options.results_root, &plan.target, plan.kind, started_at);

    let mut spec = CommandSpec::new(&options.engine_command)
        .arg("run")
        .arg(plan.script.to_string_lossy())
        .args(["-e".to_string(), format!("TARGET={}", plan.target_url)])
        .args(["-e".to_string(), format!("EXPECT_CLOUD={}", plan.expect)])
        .args(["--tag".to_string(), format!("provider={}", plan.target)])
        .args([
            "--summary-export".to_string(),
            out_file.to_string_lossy().into_owned(),
        ]);
    if let Some(tag) = &options.extra_tag {
        spec = spec.args(["--tag".to_string(), tag.clone()]);
    }

    info!(
        provider = %plan.target,
        kind = %plan.kind,
        url = %plan.target_url,
        command = %spec.display_line(),
        "running load test"
    );

    let status = runner
        .run(&spec, options.timeout)
        .map_err(|e| RunError::Invocation {
            program: options.engine_command.clone(),
            source: e,
        })?;

    if status.timed_out {
        let secs = options.timeout.map(|t| t.as_secs()).unwrap_or(0);
        return Err(RunError::Timeout {
            program: options.engine_command.clone(),
            secs,
        });
    }

    if status.exit_code != Some(0) {
        // Not fatal here: thresholds failing make k6 exit non-zero while the
        // summary export is still written. The parse stage decides.
        warn!(
            provider = %plan.target,
            kind = %plan.kind,
            exit_code = ?status.exit_code,
            "load-test engine exited non-zero"
        );
    }

    Ok(InvokeOutcome {
        path: out_file,
        exit_code: status.exit_code,
        started_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RunStatus;
    use chrono::TimeZone;
    use std::cell::RefCell;

    struct FakeRunner {
        runs: RefCell<Vec<(CommandSpec, Option<Duration>)>>,
        status: std::io::Result<RunStatus>,
    }

    impl FakeRunner {
        fn exiting(code: Option<i32>, timed_out: bool) -> Self {
            Self {
                runs: RefCell::new(Vec::new()),
                status: Ok(RunStatus {
                    exit_code: code,
                    timed_out,
                }),
            }
        }

        fn failing_to_spawn() -> Self {
            Self {
                runs: RefCell::new(Vec::new()),
                status: Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "k6: command not found",
                )),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn capture(&self, _spec: &CommandSpec) -> std::io::Result<crate::process::Captured> {
            unreachable!("invocation never captures");
        }

        fn run(
            &self,
            spec: &CommandSpec,
            timeout: Option<Duration>,
        ) -> std::io::Result<RunStatus> {
            self.runs.borrow_mut().push((spec.clone(), timeout));
            match &self.status {
                Ok(s) => Ok(*s),
                Err(e) => Err(std::io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn plan() -> InvokePlan {
        InvokePlan {
            script: PathBuf::from("k6/smoke.js"),
            target_url: "http://svc.example/".into(),
            expect: "aws".into(),
            target: "aws".into(),
            kind: RunKind::Smoke,
        }
    }

    fn options(root: &Path) -> InvokeOptions {
        InvokeOptions {
            engine_command: "k6".into(),
            results_root: root.to_path_buf(),
            timeout: None,
            extra_tag: None,
        }
    }

    #[test]
    fn result_paths_differ_across_seconds() {
        let root = Path::new("results/k6");
        let a = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 2).unwrap();
        let pa = result_path(root, "aws", RunKind::Smoke, a);
        let pb = result_path(root, "aws", RunKind::Smoke, b);
        assert_ne!(pa, pb);
        assert_eq!(
            pa,
            Path::new("results/k6/aws/smoke/smoke_20260101T120000Z.json")
        );
    }

    #[test]
    fn builds_the_engine_command_line() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::exiting(Some(0), false);
        let out = invoke(&plan(), &options(tmp.path()), &runner).unwrap();

        let runs = runner.runs.borrow();
        let (spec, timeout) = &runs[0];
        assert_eq!(spec.program, "k6");
        assert_eq!(spec.args[0], "run");
        assert_eq!(spec.args[1], "k6/smoke.js");
        assert!(spec.args.contains(&"TARGET=http://svc.example/".to_string()));
        assert!(spec.args.contains(&"EXPECT_CLOUD=aws".to_string()));
        assert!(spec.args.contains(&"provider=aws".to_string()));
        assert!(spec
            .args
            .contains(&out.path.to_string_lossy().into_owned()));
        assert!(timeout.is_none());
        assert_eq!(out.exit_code, Some(0));
    }

    #[test]
    fn creates_the_results_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::exiting(Some(0), false);
        invoke(&plan(), &options(tmp.path()), &runner).unwrap();
        assert!(tmp.path().join("aws/smoke").is_dir());
        // Idempotent on a second run.
        invoke(&plan(), &options(tmp.path()), &runner).unwrap();
    }

    #[test]
    fn nonzero_exit_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::exiting(Some(99), false);
        let out = invoke(&plan(), &options(tmp.path()), &runner).unwrap();
        assert_eq!(out.exit_code, Some(99));
    }

    #[test]
    fn spawn_failure_is_an_invocation_error() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::failing_to_spawn();
        let err = invoke(&plan(), &options(tmp.path()), &runner).unwrap_err();
        assert!(matches!(err, RunError::Invocation { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn deadline_overrun_is_a_timeout_error() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::exiting(None, true);
        let mut opts = options(tmp.path());
        opts.timeout = Some(Duration::from_secs(30));
        let err = invoke(&plan(), &opts, &runner).unwrap_err();
        assert!(matches!(err, RunError::Timeout { secs: 30, .. }));
    }

    #[test]
    fn extra_tag_is_forwarded() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FakeRunner::exiting(Some(0), false);
        let mut opts = options(tmp.path());
        opts.extra_tag = Some("release=1.2.0".into());
        invoke(&plan(), &opts, &runner).unwrap();
        let runs = runner.runs.borrow();
        assert!(runs[0].0.args.contains(&"release=1.2.0".to_string()));
    }
}
