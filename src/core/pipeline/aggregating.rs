use std::{io, num::NonZeroUsize, time::Duration};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tokio::{sync::mpsc::Receiver, task::JoinHandle};

use crate::core::{
    domain::{Command, CommandResult, RunSummary},
    traits::reporter::Reporter,
};

/// Accumulated results of one run.
#[derive(Clone, Debug)]
pub struct RunState {
    pub total: usize,
    pub limit: NonZeroUsize,
    pub started_at: DateTime<Utc>,
    pub success_count: usize,
    pub failure_count: usize,
    /// Keyed by the literal command. A command that fails twice keeps its
    /// first position but only the output of the later failure.
    pub failure_outputs: IndexMap<Command, String>,
}

impl RunState {
    pub fn new(total: usize, limit: NonZeroUsize) -> Self {
        Self {
            total,
            limit,
            started_at: Utc::now(),
            success_count: 0,
            failure_count: 0,
            failure_outputs: IndexMap::new(),
        }
    }

    pub fn record(&mut self, result: &CommandResult) {
        if result.succeeded {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
            self.failure_outputs
                .insert(result.command.clone(), result.output.clone());
        }
    }

    pub fn completed(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub fn into_summary(self, elapsed: Duration) -> RunSummary {
        RunSummary {
            success_count: self.success_count,
            failure_count: self.failure_count,
            failure_outputs: self.failure_outputs,
            elapsed,
        }
    }
}

/// Drains `res_rx` on its own task, recording every result and passing it to
/// the reporter. The task ends once all senders are dropped and hands back
/// the state and the reporter.
#[tracing::instrument(skip_all, fields(total = state.total))]
pub fn handle_aggregating<R>(
    mut res_rx: Receiver<CommandResult>,
    mut state: RunState,
    mut reporter: R,
) -> JoinHandle<io::Result<(RunState, R)>>
where
    R: Reporter + 'static,
{
    tokio::spawn(async move {
        while let Some(result) = res_rx.recv().await {
            state.record(&result);
            tracing::debug!(
                "Recorded {} [{}] with exit code {:?} ({}/{} done)",
                result.command,
                result.invocation_id,
                result.exit_code,
                state.completed(),
                state.total
            );
            reporter.command_finished(&result)?;
        }
        Ok((state, reporter))
    })
}
