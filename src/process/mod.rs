// mysqltool/src/process/mod.rs
//! Runs the MySQL client tools.

use std::fs::File;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use which::which;

use crate::command::{CommandLine, Redirect};
use crate::errors::{PluginError, Result};

#[cfg(test)]
pub(crate) mod stub;

/// Bounds on how long a tool may run. The default waits forever.
#[derive(Debug, Clone, Default)]
pub struct WaitLimits {
    pub timeout: Option<Duration>,
    pub cancel: CancellationToken,
}

impl WaitLimits {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` to completion. A non-zero exit is an error.
    async fn run(&self, command: &CommandLine, limits: &WaitLimits) -> Result<()>;
}

/// Spawns the tool found on `PATH`, without a shell.
#[derive(Debug, Clone, Default)]
pub struct SystemProcessRunner;

fn find_executable(program: &str) -> Result<PathBuf> {
    which(program).map_err(|_| PluginError::ToolNotFound {
        program: program.to_string(),
    })
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, command: &CommandLine, limits: &WaitLimits) -> Result<()> {
        let program = command.program().to_string();
        let argv = command.argv()?;
        let executable = find_executable(&program)?;
        debug!("Running {} ({})", command, executable.display());

        let mut cmd = Command::new(&executable);
        cmd.args(argv)
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match command.redirect() {
            Redirect::StdoutTo(path) => {
                let file = File::create(path).map_err(|e| PluginError::file(path, e))?;
                cmd.stdin(Stdio::null()).stdout(Stdio::from(file));
            }
            Redirect::StdinFrom(path) => {
                let file = File::open(path).map_err(|e| PluginError::file(path, e))?;
                cmd.stdin(Stdio::from(file)).stdout(Stdio::null());
            }
        }

        let child = cmd.spawn().map_err(|source| PluginError::Launch {
            program: program.clone(),
            source,
        })?;

        // Dropping the output future drops the child, and kill_on_drop kills it.
        let output = child.wait_with_output();
        let output = tokio::select! {
            output = output => output?,
            _ = limits.cancel.cancelled() => {
                warn!("{} cancelled", program);
                return Err(PluginError::Cancelled { program });
            }
            _ = sleep_or_forever(limits.timeout) => {
                let after = limits.timeout.unwrap_or_default();
                warn!("{} timed out after {:?}", program, after);
                return Err(PluginError::TimedOut { program, after });
            }
        };

        if !output.status.success() {
            return Err(PluginError::ProcessFailed {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", program, stderr.trim());
        }
        debug!("✓ {} finished", program);
        Ok(())
    }
}

async fn sleep_or_forever(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending::<()>().await,
    }
}
