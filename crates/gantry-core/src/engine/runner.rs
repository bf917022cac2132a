//! Batch orchestration over (target, kind) pairs.
//!
//! Each pair walks Pending → Resolving → Invoking → Parsing → Reported, or
//! stops at Failed with the stage recorded. One pair's failure never aborts
//! the batch: the error is logged with the target, kind, and stage, and the
//! next pair runs. Execution is sequential by design — concurrent load runs
//! would skew each other's measurements.

use crate::config::GantryConfig;
use crate::errors::RunError;
use crate::invoke::{invoke, InvokeOptions, InvokePlan};
use crate::model::{MetricSummary, RunKind};
use crate::parse::parse_summary;
use crate::process::CommandRunner;
use crate::resolve::resolve;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Pipeline stage a pair was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Invoking,
    Parsing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Resolving => "resolving",
            Stage::Invoking => "invoking",
            Stage::Parsing => "parsing",
        })
    }
}

/// Terminal state of one (target, kind) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    Reported,
    Failed(Stage),
    /// Batch was cancelled before this pair ran.
    Skipped,
}

/// What happened to one pair. `result_path` and `engine_exit` survive a
/// parse-stage failure so the operator can inspect the partial artifact.
#[derive(Debug)]
pub struct PairOutcome {
    pub target: String,
    pub kind: RunKind,
    pub state: PairState,
    pub error: Option<RunError>,
    pub result_path: Option<PathBuf>,
    pub summary: Option<MetricSummary>,
    pub engine_exit: Option<i32>,
}

impl PairOutcome {
    fn failed(target: &str, kind: RunKind, stage: Stage, error: RunError) -> Self {
        Self {
            target: target.to_string(),
            kind,
            state: PairState::Failed(stage),
            error: Some(error),
            result_path: None,
            summary: None,
            engine_exit: None,
        }
    }

    fn skipped(target: &str, kind: RunKind) -> Self {
        Self {
            target: target.to_string(),
            kind,
            state: PairState::Skipped,
            error: None,
            result_path: None,
            summary: None,
            engine_exit: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, PairState::Failed(_))
    }

    pub fn is_reported(&self) -> bool {
        self.state == PairState::Reported
    }
}

/// Outcome of a whole batch. Every pair is accounted for: reported, failed,
/// or skipped by cancellation.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<PairOutcome>,
}

impl BatchReport {
    pub fn reported_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_reported()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == PairState::Skipped)
            .count()
    }

    pub fn any_failed(&self) -> bool {
        self.failed_count() > 0
    }
}

pub struct Engine<'a> {
    cfg: &'a GantryConfig,
    runner: &'a dyn CommandRunner,
    timeout: Option<Duration>,
    cancel: Arc<AtomicBool>,
}

impl<'a> Engine<'a> {
    pub fn new(cfg: &'a GantryConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            cfg,
            runner,
            timeout: cfg.timeout(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the config-level timeout (e.g. from a CLI flag).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shared flag a signal handler or embedding caller can set; checked
    /// between stages and between pairs. Already-written result files stay
    /// valid.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Run one (target, kind) pair through the full pipeline.
    pub fn run_pair(&self, target: &str, kind: RunKind, override_url: Option<&str>) -> PairOutcome {
        let target = target.to_ascii_lowercase();
        info!(provider = %target, kind = %kind, "pair starting");

        let url = match resolve(&target, override_url, self.cfg, self.runner) {
            Ok(url) => url,
            Err(e) => {
                warn!(provider = %target, kind = %kind, stage = %Stage::Resolving, error = %e, "pair failed");
                return PairOutcome::failed(&target, kind, Stage::Resolving, e);
            }
        };

        if self.cancelled() {
            return PairOutcome::skipped(&target, kind);
        }

        let plan = InvokePlan {
            script: self.cfg.scripts.for_kind(kind).to_path_buf(),
            target_url: url,
            expect: target.clone(),
            target: target.clone(),
            kind,
        };
        let options = InvokeOptions {
            engine_command: self.cfg.engine.command.clone(),
            results_root: self.cfg.results_root.clone(),
            timeout: self.timeout,
            extra_tag: None,
        };

        let outcome = match invoke(&plan, &options, self.runner) {
            Ok(o) => o,
            Err(e) => {
                warn!(provider = %target, kind = %kind, stage = %Stage::Invoking, error = %e, "pair failed");
                return PairOutcome::failed(&target, kind, Stage::Invoking, e);
            }
        };

        match parse_summary(&outcome.path) {
            Ok(summary) => {
                info!(provider = %target, kind = %kind, file = %outcome.path.display(), "pair reported");
                PairOutcome {
                    target,
                    kind,
                    state: PairState::Reported,
                    error: None,
                    result_path: Some(outcome.path),
                    summary: Some(summary),
                    engine_exit: outcome.exit_code,
                }
            }
            Err(e) => {
                warn!(provider = %target, kind = %kind, stage = %Stage::Parsing, error = %e, "pair failed");
                PairOutcome {
                    target,
                    kind,
                    state: PairState::Failed(Stage::Parsing),
                    error: Some(e),
                    result_path: Some(outcome.path),
                    summary: None,
                    engine_exit: outcome.exit_code,
                }
            }
        }
    }

    /// Run every (target, kind) combination. Always attempts (or accounts
    /// for) every pair and always emits the completion marker.
    pub fn run_all(&self, targets: &[String], kinds: &[RunKind]) -> BatchReport {
        let mut report = BatchReport::default();

        for target in targets {
            for kind in kinds {
                if self.cancelled() {
                    warn!(provider = %target, kind = %kind, "batch cancelled; skipping pair");
                    report.outcomes.push(PairOutcome::skipped(target, *kind));
                    continue;
                }
                report.outcomes.push(self.run_pair(target, *kind, None));
            }
        }

        info!(
            reported = report.reported_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "batch complete"
        );
        report
    }
}
