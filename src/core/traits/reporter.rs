use std::io;

use crate::core::domain::{CommandResult, RunSummary};

/// Renders the progress of a run and its final summary.
pub trait Reporter: Send {
    fn started(&mut self, total: usize) -> io::Result<()>;

    fn command_finished(&mut self, result: &CommandResult) -> io::Result<()>;

    fn finished(&mut self, summary: &RunSummary) -> io::Result<()>;
}
