use super::super::args::RunArgs;
use crate::exit_codes;
use gantry_core::config::load_config;
use gantry_core::engine::{Engine, PairState};
use gantry_core::model::RunKind;
use gantry_core::process::SystemRunner;
use gantry_core::report::console::{format_pair_line, format_run_summary};
use std::path::Path;

pub(crate) fn run(args: RunArgs, config_path: &Path) -> anyhow::Result<i32> {
    let cfg = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let kind: RunKind = match args.kind.parse() {
        Ok(k) => k,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let runner = SystemRunner;
    let timeout = args.timeout.map(Into::into).or_else(|| cfg.timeout());
    let engine = Engine::new(&cfg, &runner).with_timeout(timeout);

    let outcome = engine.run_pair(&args.target, kind, args.url.as_deref());
    match outcome.state {
        PairState::Reported => {
            let file_name = outcome
                .result_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let summary = outcome.summary.as_ref().expect("reported pair has summary");
            println!("{}", format_run_summary(&file_name, summary));
            if let Some(code) = outcome.engine_exit.filter(|c| *c != 0) {
                eprintln!("note: load-test engine exited with code {}", code);
            }
            Ok(exit_codes::SUCCESS)
        }
        PairState::Failed(_) => {
            eprintln!("{}", format_pair_line(&outcome));
            Ok(outcome
                .error
                .map(|e| e.exit_code())
                .unwrap_or(exit_codes::RUN_FAILED))
        }
        PairState::Skipped => Ok(exit_codes::RUN_FAILED),
    }
}
