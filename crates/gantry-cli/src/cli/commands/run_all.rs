use super::super::args::RunAllArgs;
use crate::exit_codes;
use gantry_core::config::load_config;
use gantry_core::engine::Engine;
use gantry_core::model::RunKind;
use gantry_core::process::SystemRunner;
use gantry_core::report::console::print_batch_summary;
use std::path::Path;

pub(crate) fn run(args: RunAllArgs, config_path: &Path) -> anyhow::Result<i32> {
    let cfg = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let runner = SystemRunner;
    let timeout = args.timeout.map(Into::into).or_else(|| cfg.timeout());
    let engine = Engine::new(&cfg, &runner).with_timeout(timeout);

    tracing::info!(targets = cfg.targets.len(), "starting batch over all targets");
    let report = engine.run_all(&cfg.target_names(), &RunKind::ALL);
    print_batch_summary(&report);

    // Default: 0 once every pair was attempted (failures are reported, not
    // propagated). --strict opts into a non-zero exit for CI gating.
    if args.strict && report.any_failed() {
        Ok(exit_codes::RUN_FAILED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}
