use futures::stream::FuturesUnordered;
use std::{num::NonZeroUsize, sync::Arc};
use tokio::{
    sync::mpsc::Sender,
    time::{Duration, Instant},
};
use tokio_stream::StreamExt;

use crate::core::{
    domain::{Command, CommandResult, Invocation, LaunchError},
    traits::executor::Executor,
};

/// Runs commands through an executor, keeping at most `limit` of them in
/// flight at any time.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    executor: Arc<dyn Executor>,
    limit: NonZeroUsize,
}

impl Dispatcher {
    pub fn new(executor: Arc<dyn Executor>, limit: NonZeroUsize) -> Self {
        Self { executor, limit }
    }

    /// Executes every command and forwards each result to `res_tx` in
    /// completion order. Returns the elapsed time of the whole run.
    ///
    /// A launch error stops the run: no further commands are started and the
    /// executions still in flight are dropped, which kills their processes.
    #[tracing::instrument(skip(self, commands, res_tx), fields(total = commands.len(), limit = self.limit.get()))]
    pub async fn run(
        &self,
        commands: Vec<Command>,
        res_tx: Sender<CommandResult>,
    ) -> Result<Duration, LaunchError> {
        if commands.is_empty() {
            return Ok(Duration::ZERO);
        }

        let started_at = Instant::now();
        let mut pending = commands
            .into_iter()
            .enumerate()
            .map(|(index, command)| Invocation::new(index, command));
        let mut in_flight = FuturesUnordered::new();

        for invocation in pending.by_ref().take(self.limit.get()) {
            in_flight.push(self.execute(invocation));
        }

        while let Some(result) = in_flight.next().await {
            let result = match result {
                Ok(result) => result,
                Err(err) => {
                    tracing::debug!(
                        "Aborting run, {} execution(s) abandoned: {}",
                        in_flight.len(),
                        err
                    );
                    return Err(err);
                }
            };

            if res_tx.send(result).await.is_err() {
                tracing::error!("Result receiver dropped, stopping dispatch");
                break;
            }

            if let Some(invocation) = pending.next() {
                in_flight.push(self.execute(invocation));
            }
        }

        Ok(started_at.elapsed())
    }

    fn execute(
        &self,
        invocation: Invocation,
    ) -> impl Future<Output = Result<CommandResult, LaunchError>> + use<> {
        let executor = self.executor.clone();
        tracing::debug!(
            "Starting #{} {:?} ({})",
            invocation.index,
            invocation.command.as_str(),
            invocation.id
        );
        async move { executor.execute(&invocation).await }
    }
}
