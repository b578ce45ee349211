use crate::core::domain::{CommandResult, Invocation, LaunchError};

/// Runs a single command to completion.
///
/// A command that starts and exits nonzero is an `Ok` result with
/// `succeeded == false`. `Err` is reserved for commands that could not be
/// started at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Executor: std::fmt::Debug + Send + Sync {
    async fn execute(&self, invocation: &Invocation) -> Result<CommandResult, LaunchError>;
}
