use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Timestamp layout used in result file names (UTC, second precision).
/// The trailing `Z` is appended literally; see [`format_run_timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// The load profile applied by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    /// Minimal sanity check: few VUs, short duration.
    Smoke,
    /// Sustained higher-volume test.
    Load,
}

impl RunKind {
    pub const ALL: [RunKind; 2] = [RunKind::Smoke, RunKind::Load];

    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::Smoke => "smoke",
            RunKind::Load => "load",
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown run kind: {0} (expected smoke|load)")]
pub struct UnknownKind(pub String);

impl FromStr for RunKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smoke" => Ok(RunKind::Smoke),
            "load" => Ok(RunKind::Load),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// A named environment whose endpoint is under test. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub url: String,
    /// Identity tag the target is expected to report (checked by the
    /// load-test script, not by gantry itself).
    pub expect: String,
}

/// One invocation of the load-test engine. Append-only; the raw result file
/// is the source of truth for everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub target: String,
    pub kind: RunKind,
    pub timestamp: DateTime<Utc>,
    pub path: PathBuf,
}

/// Normalized metrics extracted from one result file.
///
/// Recomputed on every read; parsing the same file always yields the same
/// summary. Absent metrics degrade to zero or `None` rather than failing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSummary {
    pub fail_rate_pct: f64,
    pub p95_latency_ms: Option<f64>,
    pub avg_latency_ms: Option<f64>,
    pub min_latency_ms: Option<f64>,
    pub max_latency_ms: Option<f64>,
    pub checks_passed: u64,
    pub checks_failed: u64,
    pub total_requests: u64,
}

pub fn format_run_timestamp(at: DateTime<Utc>) -> String {
    format!("{}Z", at.format(TIMESTAMP_FORMAT))
}

pub fn parse_run_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let bare = s.strip_suffix('Z')?;
    NaiveDateTime::parse_from_str(bare, TIMESTAMP_FORMAT)
        .ok()
        .map(|n| n.and_utc())
}
