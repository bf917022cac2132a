use super::super::args::ServeDashboardArgs;
use crate::exit_codes;
use gantry_core::config::load_config;
use gantry_core::process::{CommandRunner, CommandSpec, SystemRunner};
use std::path::Path;

pub(crate) fn run(_args: ServeDashboardArgs, config_path: &Path) -> anyhow::Result<i32> {
    let cfg = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let Some(dashboard) = &cfg.dashboard else {
        eprintln!("config error: no dashboard command configured");
        return Ok(exit_codes::CONFIG_ERROR);
    };

    let spec = CommandSpec::new(&dashboard.command).args(dashboard.args.iter().cloned());
    eprintln!("Launching results viewer: {}", spec.display_line());

    // The viewer owns the terminal until the user quits it.
    let status = match SystemRunner.run(&spec, None) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to start {}: {}", dashboard.command, e);
            return Ok(exit_codes::INVOCATION_ERROR);
        }
    };

    if status.exit_code != Some(0) {
        eprintln!("viewer exited with {:?}", status.exit_code);
        return Ok(exit_codes::RUN_FAILED);
    }
    Ok(exit_codes::SUCCESS)
}
