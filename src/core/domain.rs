use std::{fmt, num::NonZeroUsize, process::ExitCode, time::Duration};

use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

/// A command line as given by the user. Identity is the literal string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Command(String);

impl Command {
    pub fn new(line: impl Into<String>) -> Self {
        Command(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the command on whitespace into the program and its arguments.
    ///
    /// Quoting is not interpreted, so an argument can never contain spaces.
    /// Returns `None` for an empty or whitespace-only command.
    pub fn program_and_args(&self) -> Option<(&str, Vec<&str>)> {
        let mut parts = self.0.split_whitespace();
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Command {
    fn from(line: &str) -> Self {
        Command::new(line)
    }
}

impl From<String> for Command {
    fn from(line: String) -> Self {
        Command(line)
    }
}

/// One scheduled execution of a command.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub id: Uuid,
    pub index: usize,
    pub command: Command,
}

impl Invocation {
    pub fn new(index: usize, command: Command) -> Self {
        Invocation {
            id: Uuid::new_v4(),
            index,
            command,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommandResult {
    pub invocation_id: Uuid,
    pub command: Command,
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub output: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to launch '{command}': {msg}")]
pub struct LaunchError {
    pub command: Command,
    pub msg: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportMode {
    /// One line per finished command
    #[default]
    Line,
    /// One dot per finished command
    Dots,
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub commands: Vec<Command>,
    pub concurrency: NonZeroUsize,
    pub report_mode: ReportMode,
    pub color: bool,
}

impl RunConfig {
    pub fn new<C>(commands: Vec<C>, concurrency: NonZeroUsize) -> Self
    where
        C: Into<Command>,
    {
        RunConfig {
            commands: commands.into_iter().map(Into::into).collect(),
            concurrency,
            report_mode: ReportMode::default(),
            color: false,
        }
    }

    pub fn with_report_mode(self, report_mode: ReportMode) -> Self {
        Self {
            report_mode,
            ..self
        }
    }

    pub fn with_color(self, color: bool) -> Self {
        Self { color, ..self }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub success_count: usize,
    pub failure_count: usize,
    pub failure_outputs: IndexMap<Command, String>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Whole seconds, rounded up.
    pub fn elapsed_secs(&self) -> u128 {
        self.elapsed.as_millis().div_ceil(1000)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    AllPassed,
    SomeFailed,
    LaunchError,
    Internal,
}

impl Outcome {
    pub fn code(&self) -> u8 {
        match self {
            Outcome::AllPassed => 0,
            Outcome::SomeFailed | Outcome::LaunchError | Outcome::Internal => 1,
        }
    }
}

impl From<&RunSummary> for Outcome {
    fn from(summary: &RunSummary) -> Self {
        if summary.failure_count == 0 {
            Outcome::AllPassed
        } else {
            Outcome::SomeFailed
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_and_args_splits_on_whitespace() {
        let command = Command::new("  mocha   test.js --reporter dot ");
        let (program, args) = command.program_and_args().unwrap();
        assert_eq!(program, "mocha");
        assert_eq!(args, vec!["test.js", "--reporter", "dot"]);
    }

    #[test]
    fn test_program_and_args_ignores_quotes() {
        let command = Command::new("echo \"hello world\"");
        let (_, args) = command.program_and_args().unwrap();
        assert_eq!(args, vec!["\"hello", "world\""]);
    }

    #[test]
    fn test_program_and_args_empty() {
        assert!(Command::new("").program_and_args().is_none());
        assert!(Command::new(" \t ").program_and_args().is_none());
    }

    #[test]
    fn test_run_config_accepts_empty_commands() {
        let config = RunConfig::new(Vec::<String>::new(), NonZeroUsize::new(3).unwrap());
        assert!(config.commands.is_empty());
        assert_eq!(config.concurrency.get(), 3);
        assert_eq!(config.report_mode, ReportMode::Line);
    }

    #[test]
    fn test_elapsed_secs_rounds_up() {
        let mut summary = RunSummary {
            success_count: 0,
            failure_count: 0,
            failure_outputs: IndexMap::new(),
            elapsed: Duration::ZERO,
        };
        assert_eq!(summary.elapsed_secs(), 0);
        summary.elapsed = Duration::from_millis(1);
        assert_eq!(summary.elapsed_secs(), 1);
        summary.elapsed = Duration::from_millis(2000);
        assert_eq!(summary.elapsed_secs(), 2);
        summary.elapsed = Duration::from_millis(2001);
        assert_eq!(summary.elapsed_secs(), 3);
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::AllPassed.code(), 0);
        assert_eq!(Outcome::SomeFailed.code(), 1);
        assert_eq!(Outcome::LaunchError.code(), 1);
        assert_eq!(Outcome::Internal.code(), 1);
    }

    #[test]
    fn test_launch_error_message_names_command() {
        let err = LaunchError {
            command: Command::new("nope --flag"),
            msg: "No such file or directory (os error 2)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to launch 'nope --flag': No such file or directory (os error 2)"
        );
    }
}
