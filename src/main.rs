//! Bootcli: phase-aware command dispatcher for site maintenance.
//!
//! This is the main entry point for the `bootcli` CLI. It parses the global
//! options, hands the rest of the command line to the runner, prints what the
//! run produced and exits with the matching status.

mod cli;
mod commands;
mod output;

pub mod bootstrap;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod exit_codes;
pub mod registry;
pub mod resolver;
pub mod runner;
pub mod site;

#[cfg(test)]
mod test_support;

use cli::Cli;
use dispatch::Dispatcher;
use output::OutputOptions;
use runner::Runner;
use site::BaseInitializer;
use std::process::ExitCode;
use tracing::Level;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);
    dispatch::panic_hook::install();

    let bootstrapper = site::standard_bootstrapper(
        BaseInitializer::new(env!("CARGO_PKG_VERSION")),
        cli.root.clone(),
    );
    let mut runner = Runner::new(bootstrapper, Dispatcher::new(commands::core_callbacks()))
        .with_contributor(commands::core_contributor());
    cli.record_options(runner.context_mut());

    let report = runner.run(&cli.args);

    let options = OutputOptions {
        json: cli.json,
        quiet: cli.quiet,
    };
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    if let Err(err) = output::write_report(&report, options, &mut stdout.lock(), &mut stderr.lock()) {
        tracing::error!(error = %err, "failed to write output");
    }

    ExitCode::from(report.exit_code() as u8)
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
