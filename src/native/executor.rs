use std::process::Stdio;

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Command as ProcessCommand,
    time::Instant,
};

use crate::core::{
    domain::{CommandResult, Invocation, LaunchError},
    traits::executor::Executor,
};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Spawns commands as child processes of the current one.
#[derive(Clone, Debug, Default)]
pub struct NativeExecutor;

impl NativeExecutor {
    pub fn new() -> Self {
        NativeExecutor
    }
}

#[async_trait::async_trait]
impl Executor for NativeExecutor {
    #[tracing::instrument(skip(self, invocation), fields(id = %invocation.id, command = %invocation.command))]
    async fn execute(&self, invocation: &Invocation) -> Result<CommandResult, LaunchError> {
        let started_at = Instant::now();
        let launch_error = |msg: String| LaunchError {
            command: invocation.command.clone(),
            msg,
        };

        let (program, args) = invocation
            .command
            .program_and_args()
            .ok_or_else(|| launch_error("command is empty".to_string()))?;

        let mut child = ProcessCommand::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| launch_error(e.to_string()))?;
        tracing::debug!(pid = child.id(), "Process spawned");

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(launch_error("output pipes are not available".to_string()));
        };

        let output = read_combined(stdout, stderr)
            .await
            .map_err(|e| launch_error(format!("failed to read output: {}", e)))?;
        let status = child
            .wait()
            .await
            .map_err(|e| launch_error(format!("failed to wait for process: {}", e)))?;

        let duration_ms = started_at.elapsed().as_millis() as u64;
        tracing::debug!(?status, duration_ms, "Process exited");

        Ok(CommandResult {
            invocation_id: invocation.id,
            command: invocation.command.clone(),
            succeeded: status.success(),
            exit_code: status.code(),
            output: String::from_utf8_lossy(&output).to_string(),
            duration_ms,
        })
    }
}

/// Reads both streams until they are closed, appending chunks to one buffer
/// in the order they arrive.
async fn read_combined<O, E>(mut stdout: O, mut stderr: E) -> std::io::Result<Vec<u8>>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut combined = Vec::new();
    let mut stdout_buf = [0u8; READ_CHUNK_SIZE];
    let mut stderr_buf = [0u8; READ_CHUNK_SIZE];
    let mut stdout_open = true;
    let mut stderr_open = true;

    while stdout_open || stderr_open {
        tokio::select! {
            read = stdout.read(&mut stdout_buf), if stdout_open => match read? {
                0 => stdout_open = false,
                n => combined.extend_from_slice(&stdout_buf[..n]),
            },
            read = stderr.read(&mut stderr_buf), if stderr_open => match read? {
                0 => stderr_open = false,
                n => combined.extend_from_slice(&stderr_buf[..n]),
            },
        }
    }

    Ok(combined)
}
