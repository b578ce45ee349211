use std::{io::IsTerminal, num::NonZeroUsize};

use clap::{Parser, ValueEnum};

use crate::{
    constants::DEFAULT_CONCURRENCY,
    core::domain::{ReportMode, RunConfig},
};

/// Run test commands in parallel and report which ones failed
#[derive(Debug, Parser)]
#[command(name = "parallel", version, long_about = None)]
#[command(after_help = "Example:\n  parallel -n 2 \"mocha test.js\" \"mocha test2.js\"")]
pub struct Cli {
    /// How many commands to run in parallel
    #[arg(short = 'n', long, env = "PARALLEL_NUMBER", default_value_t = DEFAULT_CONCURRENCY)]
    pub number: NonZeroUsize,

    /// How finished commands are reported
    #[arg(long, env = "PARALLEL_REPORTER", value_enum, default_value_t = ReportMode::Line)]
    pub reporter: ReportMode,

    /// When to color the pass/fail glyphs
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Commands to run; each one is split on whitespace
    #[arg(required = true, value_name = "COMMANDS")]
    pub commands: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(&self) -> bool {
        match self {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        let color = cli.color.enabled();
        RunConfig::new(cli.commands, cli.number)
            .with_report_mode(cli.reporter)
            .with_color(color)
    }
}
