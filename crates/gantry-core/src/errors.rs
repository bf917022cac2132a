use std::path::PathBuf;
use thiserror::Error;

/// Configuration load/parse failure. Setup errors abort immediately and are
/// never converted to a per-pair failure.
#[derive(Debug, Error)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);

/// Error taxonomy for a single (target, kind) run.
///
/// During batch orchestration every pair-local variant is caught, logged with
/// the stage it occurred at, and the batch proceeds. For an explicit single
/// run they map onto process exit codes via [`RunError::exit_code`].
#[derive(Debug, Error)]
pub enum RunError {
    /// Cannot determine a target URL.
    #[error("cannot resolve target '{target}': {reason}")]
    Resolution { target: String, reason: String },

    /// Child process could not be started. Distinct from a started process
    /// that exits non-zero, which is not an error at this layer.
    #[error("failed to start {program}: {source}")]
    Invocation {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Result file absent at parse time.
    #[error("result file does not exist: {path}")]
    MissingFile { path: PathBuf },

    /// Result file present but not decodable as a summary export.
    #[error("malformed result file {path}: {reason}")]
    MalformedResult { path: PathBuf, reason: String },

    /// Child exceeded the configured deadline and was killed.
    #[error("{program} exceeded timeout of {secs}s")]
    Timeout { program: String, secs: u64 },

    /// Filesystem failure while preparing a run (e.g. results dir creation).
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RunError {
    /// Exit code for the CLI when the error is fatal to an explicit run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Resolution { .. } | Self::Config(_) => 2,
            Self::Invocation { .. } | Self::Io { .. } => 3,
            Self::MissingFile { .. } | Self::MalformedResult { .. } | Self::Timeout { .. } => 1,
        }
    }

    /// Whether the error is recoverable per pair during batch orchestration.
    /// Setup failures (config) are not: they abort before the batch starts.
    pub fn is_pair_local(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}
