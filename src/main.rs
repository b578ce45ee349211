use std::io::IsTerminal;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::core::domain::{Outcome, RunConfig};
use crate::core::pipeline::{RunError, reporting::AnyReporter, run};
use crate::native::executor::NativeExecutor;

mod cli;
mod constants;
mod core;
mod native;

#[cfg(test)]
mod stubs;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    set_panic_hook();

    let config = RunConfig::from(cli);
    colored::control::set_override(config.color);

    let reporter = AnyReporter::new(config.report_mode, std::io::stdout(), config.color);
    let outcome = match run(config, Arc::new(NativeExecutor::new()), reporter).await {
        Ok((summary, _)) => Outcome::from(&summary),
        Err(RunError::Launch(err)) => {
            eprintln!("{}", err);
            Outcome::LaunchError
        }
        Err(err) => {
            eprintln!("{}", err);
            Outcome::Internal
        }
    };

    outcome.into()
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
