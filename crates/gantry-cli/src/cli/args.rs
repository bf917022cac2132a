use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gantry",
    version,
    about = "Multi-cloud load-test orchestration — resolve endpoints, drive k6 runs, aggregate results"
)]
pub struct Cli {
    /// Path to the gantry config file
    #[arg(long, global = true, default_value = "gantry.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one target/kind pair and print its metric summary
    Run(RunArgs),
    /// Run every configured target across all kinds
    RunAll(RunAllArgs),
    /// Render an aggregate view over existing result files
    Report(ReportArgs),
    /// Launch the external interactive results viewer
    ServeDashboard(ServeDashboardArgs),
    /// Preflight: check tools, target directories, and scripts
    Doctor(DoctorArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Target name (a key under `targets` in the config)
    pub target: String,

    /// Run kind: smoke or load
    pub kind: String,

    /// Override the service URL instead of querying the resolver
    #[arg(long)]
    pub url: Option<String>,

    /// Kill the load-test engine after this long (e.g. "90s", "15m")
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,
}

#[derive(clap::Args, Debug)]
pub struct RunAllArgs {
    /// Exit non-zero if any pair failed (default: exit 0 once every pair
    /// was attempted)
    #[arg(long)]
    pub strict: bool,

    /// Kill the load-test engine after this long (e.g. "90s", "15m")
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,
}

#[derive(clap::ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Restrict to these targets (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Restrict to these kinds (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub kinds: Vec<String>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(clap::Args, Debug)]
pub struct ServeDashboardArgs {}

#[derive(clap::Args, Debug)]
pub struct DoctorArgs {}
