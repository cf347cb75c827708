use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt as _;
use tokio::process::Command;

/// Fully resolved command line for one wallet tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: PathBuf,
    pub env: Vec<(String, String)>,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs wallet tool invocations.
///
/// A non-zero exit is reported through [`ToolOutput::code`]; `Err` is reserved for failures
/// of the execution layer itself (spawn, pipes, wait).
#[async_trait]
pub trait ToolGateway: Send + Sync {
    async fn execute(&self, invocation: &ToolInvocation) -> Result<ToolOutput>;
}

#[async_trait]
impl<T: ToolGateway + ?Sized> ToolGateway for Arc<T> {
    async fn execute(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        (**self).execute(invocation).await
    }
}

/// Spawns the wallet tool as a child process.
///
/// The child is killed if the returned future is dropped, so callers cancel a run by
/// dropping it (timeouts included).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGateway;

#[async_trait]
impl ToolGateway for ProcessGateway {
    async fn execute(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .env_clear()
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawn {}", invocation.program.display()))?;

        let output = match &invocation.stdin {
            Some(input) => {
                let mut stdin = child.stdin.take().context("child stdin unavailable")?;
                let write = async move {
                    stdin.write_all(input).await?;
                    stdin.shutdown().await
                };
                let (written, output) = tokio::join!(write, child.wait_with_output());
                match written {
                    Ok(()) => {}
                    // tool exited without draining stdin
                    Err(e) if e.kind() == IoErrorKind::BrokenPipe => {
                        tracing::debug!(
                            program = %invocation.program.display(),
                            "stdin closed early"
                        );
                    }
                    Err(e) => return Err(e).context("write payload to stdin"),
                }
                output
            }
            None => child.wait_with_output().await,
        }
        .with_context(|| format!("wait for {}", invocation.program.display()))?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
