//! Recover prior runs from the persisted results layout:
//! `<root>/<target>/<kind>/<kind>_<UTCtimestamp>.json`.
//!
//! That path convention is the only on-disk contract. Anything that does not
//! match it (unknown kind directories, foreign files, unparsable stems) is
//! skipped, not an error.

use crate::model::{parse_run_timestamp, RunKind, RunRecord};
use std::path::Path;
use tracing::debug;

pub fn discover_records(root: &Path) -> Vec<RunRecord> {
    let mut records = Vec::new();

    let Ok(targets) = std::fs::read_dir(root) else {
        debug!(root = %root.display(), "results root not readable; nothing to discover");
        return records;
    };

    for target_entry in targets.flatten() {
        let target_dir = target_entry.path();
        if !target_dir.is_dir() {
            continue;
        }
        let target = target_entry.file_name().to_string_lossy().into_owned();

        let Ok(kind_dirs) = std::fs::read_dir(&target_dir) else {
            continue;
        };
        for kind_entry in kind_dirs.flatten() {
            let kind_dir = kind_entry.path();
            if !kind_dir.is_dir() {
                continue;
            }
            let Ok(kind) = kind_entry
                .file_name()
                .to_string_lossy()
                .parse::<RunKind>()
            else {
                debug!(dir = %kind_dir.display(), "skipping unknown kind directory");
                continue;
            };

            let Ok(files) = std::fs::read_dir(&kind_dir) else {
                continue;
            };
            for file in files.flatten() {
                let path = file.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                // Stem contract: <kind>_<timestamp>.
                let Some((prefix, ts)) = stem.split_once('_') else {
                    debug!(file = %path.display(), "skipping file without kind prefix");
                    continue;
                };
                if prefix != kind.as_str() {
                    debug!(file = %path.display(), "skipping file with foreign prefix");
                    continue;
                }
                let Some(timestamp) = parse_run_timestamp(ts) else {
                    debug!(file = %path.display(), "skipping file with unparsable timestamp");
                    continue;
                };

                records.push(RunRecord {
                    target: target.clone(),
                    kind,
                    timestamp,
                    path,
                });
            }
        }
    }

    records.sort_by(|a, b| {
        (&a.target, a.kind, a.timestamp).cmp(&(&b.target, b.kind, b.timestamp))
    });
    records
}
