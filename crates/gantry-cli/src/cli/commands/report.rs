use super::super::args::{ReportArgs, ReportFormat};
use crate::exit_codes;
use gantry_core::aggregate::{load_rows, AggregateView};
use gantry_core::config::load_config;
use gantry_core::discover::discover_records;
use gantry_core::model::RunKind;
use gantry_core::report::{console, json};
use std::path::Path;

pub(crate) fn run(args: ReportArgs, config_path: &Path) -> anyhow::Result<i32> {
    let cfg = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let mut kinds = Vec::new();
    for raw in &args.kinds {
        match raw.parse::<RunKind>() {
            Ok(k) => kinds.push(k),
            Err(e) => {
                eprintln!("{}", e);
                return Ok(exit_codes::CONFIG_ERROR);
            }
        }
    }

    let records = discover_records(&cfg.results_root);
    let view = AggregateView::build(load_rows(records))
        .filter_targets(&args.targets)
        .filter_kinds(&kinds);

    if view.is_empty() && args.format == ReportFormat::Text {
        println!("No results found. Run some tests first.");
        return Ok(exit_codes::SUCCESS);
    }

    match args.format {
        ReportFormat::Text => print!("{}", console::format_aggregate(&view)),
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json::render(&view))?)
        }
    }
    Ok(exit_codes::SUCCESS)
}
