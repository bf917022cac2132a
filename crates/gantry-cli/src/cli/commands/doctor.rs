use super::super::args::DoctorArgs;
use crate::exit_codes;
use gantry_core::config::load_config;
use gantry_core::model::RunKind;
use gantry_core::process::binary_on_path;
use std::path::Path;

fn check(ok: bool, label: &str, detail: &str) -> bool {
    if ok {
        println!("✅ {:<24} {}", label, detail);
    } else {
        println!("❌ {:<24} {}", label, detail);
    }
    ok
}

pub(crate) fn run(_args: DoctorArgs, config_path: &Path) -> anyhow::Result<i32> {
    let cfg = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            println!("Config Status: FAILED");
            println!("  File:  {}", config_path.display());
            println!("  Error: {}", e);
            return Ok(exit_codes::RUN_FAILED);
        }
    };
    println!("Config Status: OK ({})", config_path.display());

    let mut failures = 0usize;

    let engine = &cfg.engine.command;
    if !check(
        binary_on_path(engine).is_some(),
        "load-test engine",
        &format!("{} on PATH", engine),
    ) {
        failures += 1;
        println!("   install it, e.g. (Ubuntu): sudo apt update && sudo apt install -y k6");
    }

    let resolver = &cfg.resolver.command;
    if !check(
        binary_on_path(resolver).is_some(),
        "resolver tool",
        &format!("{} on PATH", resolver),
    ) {
        failures += 1;
    }

    for (name, tc) in &cfg.targets {
        if !check(
            tc.dir.is_dir(),
            &format!("target '{}'", name),
            &tc.dir.display().to_string(),
        ) {
            failures += 1;
        }
    }

    for kind in RunKind::ALL {
        let script = cfg.scripts.for_kind(kind);
        if !check(
            script.is_file(),
            &format!("{} script", kind),
            &script.display().to_string(),
        ) {
            failures += 1;
        }
    }

    if failures == 0 {
        println!("\nAll checks passed.");
        Ok(exit_codes::SUCCESS)
    } else {
        println!("\n{} check(s) failed.", failures);
        Ok(exit_codes::RUN_FAILED)
    }
}
