use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use liquid_swap::liquid::exec::{ToolGateway, ToolInvocation, ToolOutput};

#[derive(Debug, Clone)]
enum Reply {
    Output(ToolOutput),
    Fail(String),
}

/// Scripted wallet tool: records every invocation and how many ran at once.
#[derive(Debug)]
pub struct StubGateway {
    reply: Reply,
    delay: Duration,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    invocations: Mutex<Vec<ToolInvocation>>,
}

impl StubGateway {
    pub fn output(output: ToolOutput) -> Self {
        Self {
            reply: Reply::Output(output),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Exit 0 with `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::output(ToolOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        })
    }

    pub fn exit(code: i32, stdout: &str, stderr: &str) -> Self {
        Self::output(ToolOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    }

    /// Execution-layer failure, as if the process could not be spawned.
    pub fn failing(message: &str) -> Self {
        let mut stub = Self::ok("");
        stub.reply = Reply::Fail(message.to_string());
        stub
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.invocations.lock().expect("invocations mutex").clone()
    }

    pub fn last_invocation(&self) -> Option<ToolInvocation> {
        self.invocations().pop()
    }
}

#[async_trait]
impl ToolGateway for StubGateway {
    async fn execute(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.invocations
            .lock()
            .expect("invocations mutex")
            .push(invocation.clone());

        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::Fail(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}
