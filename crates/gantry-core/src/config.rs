use crate::errors::ConfigError;
use crate::model::RunKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Top-level gantry.yaml.
///
/// Recognized options are enumerated explicitly; unknown target names or
/// kinds fail at lookup time, not deep inside a run.
#[derive(Debug, Clone, Deserialize)]
pub struct GantryConfig {
    pub version: u32,
    #[serde(default = "default_results_root")]
    pub results_root: PathBuf,
    pub targets: BTreeMap<String, TargetConfig>,
    pub scripts: ScriptsConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub dashboard: Option<DashboardConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Directory the resolver command runs in (e.g. a terraform workspace).
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptsConfig {
    pub smoke: PathBuf,
    pub load: PathBuf,
}

impl ScriptsConfig {
    pub fn for_kind(&self, kind: RunKind) -> &Path {
        match kind {
            RunKind::Smoke => &self.smoke,
            RunKind::Load => &self.load,
        }
    }
}

/// Command run inside a target's directory to obtain its service URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_resolver_command")]
    pub command: String,
    #[serde(default = "default_resolver_args")]
    pub args: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            command: default_resolver_command(),
            args: default_resolver_args(),
        }
    }
}

/// The load-test engine binary.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_command")]
    pub command: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_engine_command(),
        }
    }
}

/// External interactive viewer spawned by `serve-dashboard`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl GantryConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn target_names(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }
}

fn default_results_root() -> PathBuf {
    PathBuf::from("results/k6")
}

fn default_resolver_command() -> String {
    "terraform".into()
}

fn default_resolver_args() -> Vec<String> {
    vec!["output".into(), "-raw".into(), "service_url".into()]
}

fn default_engine_command() -> String {
    "k6".into()
}

pub fn load_config(path: &Path) -> Result<GantryConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    let cfg: GantryConfig = serde_yaml::from_str(&raw)
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }
    if cfg.targets.is_empty() {
        return Err(ConfigError("config has no targets".into()));
    }
    Ok(cfg)
}
