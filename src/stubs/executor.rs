use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::core::{
    domain::{Command, CommandResult, Invocation, LaunchError},
    traits::executor::Executor,
};

/// Executor that sleeps instead of spawning processes.
///
/// Every command succeeds unless it was registered as failing or
/// unlaunchable. The stub keeps track of how many executions overlap.
#[derive(Debug, Clone, Default)]
pub struct ExecutorStub {
    delay: Duration,
    delays: HashMap<Command, Duration>,
    failing: HashSet<Command>,
    unlaunchable: HashSet<Command>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    started: Arc<AtomicUsize>,
}

impl ExecutorStub {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn failing(mut self, command: &str) -> Self {
        self.failing.insert(Command::new(command));
        self
    }

    pub fn unlaunchable(mut self, command: &str) -> Self {
        self.unlaunchable.insert(Command::new(command));
        self
    }

    pub fn with_delay(mut self, command: &str, delay: Duration) -> Self {
        self.delays.insert(Command::new(command), delay);
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Executor for ExecutorStub {
    #[tracing::instrument(skip(self))]
    async fn execute(&self, invocation: &Invocation) -> Result<CommandResult, LaunchError> {
        let command = &invocation.command;
        self.started.fetch_add(1, Ordering::SeqCst);

        if self.unlaunchable.contains(command) {
            return Err(LaunchError {
                command: command.clone(),
                msg: "No such file or directory (os error 2)".to_string(),
            });
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(command).copied().unwrap_or(self.delay);
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let succeeded = !self.failing.contains(command);
        let result = CommandResult {
            invocation_id: invocation.id,
            command: command.clone(),
            succeeded,
            exit_code: Some(if succeeded { 0 } else { 1 }),
            output: if succeeded {
                String::new()
            } else {
                format!("{} failed (#{})\n", command, invocation.index)
            },
            duration_ms: delay.as_millis() as u64,
        };
        tracing::debug!("Execution result: {:?}", result);

        Ok(result)
    }
}
