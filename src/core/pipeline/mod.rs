use std::{io, sync::Arc};

use thiserror::Error;
use tokio::{sync::mpsc::channel, task::JoinError};

use crate::{
    constants::RESULT_CHANNEL_CAPACITY,
    core::{
        domain::{CommandResult, LaunchError, RunConfig, RunSummary},
        traits::{executor::Executor, reporter::Reporter},
    },
};

use aggregating::{RunState, handle_aggregating};
use dispatching::Dispatcher;

pub mod aggregating;
pub mod dispatching;
pub mod reporting;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Launch(#[from] LaunchError),
    #[error("Failed to write report: {0}")]
    Report(#[from] io::Error),
    #[error("Result aggregation stopped unexpectedly: {0}")]
    Aggregator(#[from] JoinError),
}

/// Runs every configured command and reports the results.
///
/// On success the reporter has printed the final summary and is handed back.
/// A launch error ends the run before the summary is printed.
#[tracing::instrument(skip_all, fields(total = config.commands.len(), limit = config.concurrency.get()))]
pub async fn run<R>(
    config: RunConfig,
    executor: Arc<dyn Executor>,
    mut reporter: R,
) -> Result<(RunSummary, R), RunError>
where
    R: Reporter + 'static,
{
    let total = config.commands.len();
    reporter.started(total)?;

    let state = RunState::new(total, config.concurrency);
    tracing::info!(
        "Run of {} command(s) started at {} with limit {}",
        state.total,
        state.started_at,
        state.limit
    );

    let (res_tx, res_rx) = channel::<CommandResult>(RESULT_CHANNEL_CAPACITY);
    let aggregating = handle_aggregating(res_rx, state, reporter);
    let dispatched = Dispatcher::new(executor, config.concurrency)
        .run(config.commands, res_tx)
        .await;

    let aggregated = aggregating.await;
    let elapsed = dispatched?;
    let (state, mut reporter) = aggregated??;

    let summary = state.into_summary(elapsed);
    tracing::info!(
        "Run finished: {} succeeded, {} failed in {:?}",
        summary.success_count,
        summary.failure_count,
        summary.elapsed
    );
    reporter.finished(&summary)?;

    Ok((summary, reporter))
}
