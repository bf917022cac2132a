use super::super::args::{Cli, Command};

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => super::run::run(args, &cli.config),
        Command::RunAll(args) => super::run_all::run(args, &cli.config),
        Command::Report(args) => super::report::run(args, &cli.config),
        Command::ServeDashboard(args) => super::dashboard::run(args, &cli.config),
        Command::Doctor(args) => super::doctor::run(args, &cli.config),
    }
}
