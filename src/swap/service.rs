use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use crate::liquid::exec::{ToolGateway, ToolInvocation, ToolOutput};
use crate::liquid::wallet::{SwapCommand, WalletCli, WalletCliConfig};
use crate::swap::{ConfidentialAddress, Payload, ProposalInfo, SwapError, SwapProposal};

const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(120);

/// Exclusive right to run the wallet tool. The tool is not safe for concurrent use, so
/// every invocation, whatever the swap or subject, goes through one guard.
#[derive(Debug, Default)]
pub struct ExecutionGuard {
    lock: Mutex<()>,
}

impl ExecutionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits (FIFO) for the guard. Dropping the returned value releases it; dropping the
    /// pending future gives up the wait.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub wallet: WalletCliConfig,
    /// Deadline covering both the wait for the guard and the tool run.
    /// `None` waits forever.
    pub exec_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            wallet: WalletCliConfig::default(),
            exec_timeout: Some(DEFAULT_EXEC_TIMEOUT),
        }
    }
}

/// Drives the propose/accept/finalize negotiation and payload inspection through the
/// wallet tool. Stateless between calls: each step consumes the previous step's payload.
pub struct SwapOrchestrator<G> {
    cli: WalletCli,
    gateway: G,
    guard: Arc<ExecutionGuard>,
    exec_timeout: Option<Duration>,
}

impl<G: ToolGateway> SwapOrchestrator<G> {
    pub fn new(cfg: OrchestratorConfig, gateway: G) -> Self {
        Self::with_guard(cfg, gateway, Arc::new(ExecutionGuard::new()))
    }

    /// Shares `guard` with other orchestrators driving the same wallet.
    pub fn with_guard(cfg: OrchestratorConfig, gateway: G, guard: Arc<ExecutionGuard>) -> Self {
        Self {
            cli: WalletCli::new(cfg.wallet),
            gateway,
            guard,
            exec_timeout: cfg.exec_timeout,
        }
    }

    pub fn wallet(&self) -> &WalletCli {
        &self.cli
    }

    pub fn guard(&self) -> &Arc<ExecutionGuard> {
        &self.guard
    }

    pub async fn propose(
        &self,
        swap_id: u64,
        address: &ConfidentialAddress,
        proposal: &ProposalInfo,
        fee_rate: f64,
    ) -> Result<SwapProposal, SwapError> {
        if address.is_empty() {
            return Err(SwapError::InvalidProposal("empty address"));
        }
        if !proposal.is_valid() {
            return Err(SwapError::InvalidProposal("malformed asset id or amount"));
        }

        let invocation = self.cli.propose(address, proposal, fee_rate);
        self.run(SwapCommand::Propose, swap_id, &invocation).await
    }

    pub async fn accept(
        &self,
        swap_id: u64,
        address: &ConfidentialAddress,
        payload: &Payload,
        fee_rate: f64,
    ) -> Result<SwapProposal, SwapError> {
        if address.is_empty() {
            return Err(SwapError::InvalidProposal("empty address"));
        }
        check_input_payload(SwapCommand::Accept, swap_id, payload)?;

        let invocation = self.cli.accept(address, payload, fee_rate);
        self.run(SwapCommand::Accept, swap_id, &invocation).await
    }

    pub async fn finalize(
        &self,
        swap_id: u64,
        payload: &Payload,
    ) -> Result<SwapProposal, SwapError> {
        check_input_payload(SwapCommand::Finalize, swap_id, payload)?;

        let invocation = self.cli.finalize(payload);
        self.run(SwapCommand::Finalize, swap_id, &invocation).await
    }

    /// Read-only inspection of `payload`, does not advance the negotiation.
    pub async fn info(
        &self,
        swap_id: u64,
        payload: &Payload,
    ) -> Result<SwapProposal, SwapError> {
        check_input_payload(SwapCommand::Info, swap_id, payload)?;

        let invocation = self.cli.info(payload);
        self.run(SwapCommand::Info, swap_id, &invocation).await
    }

    async fn run(
        &self,
        command: SwapCommand,
        swap_id: u64,
        invocation: &ToolInvocation,
    ) -> Result<SwapProposal, SwapError> {
        let mut result = SwapProposal::stamped(swap_id);

        let output = match self.exec_timeout {
            Some(limit) => tokio::time::timeout(limit, self.execute(command, swap_id, invocation))
                .await
                .map_err(|_| {
                    tracing::error!(
                        swap_id,
                        command = command.as_str(),
                        timeout = ?limit,
                        "wallet tool deadline exceeded"
                    );
                    SwapError::Execution(format!(
                        "{} exceeded deadline of {limit:?}",
                        command.as_str()
                    ))
                })??,
            None => self.execute(command, swap_id, invocation).await?,
        };

        result.payload = Payload::new(output.stdout.trim_end());
        if !result.payload.is_valid() {
            tracing::error!(
                swap_id,
                command = command.as_str(),
                payload = result.payload.as_str(),
                "wallet tool returned an invalid payload"
            );
            return Err(SwapError::InvalidPayload);
        }

        tracing::debug!(
            swap_id,
            command = command.as_str(),
            payload_len = result.payload.len(),
            "swap proposal step done"
        );
        Ok(result)
    }

    /// Runs `invocation` while holding the guard. Released on every return path, and when
    /// the future is dropped.
    async fn execute(
        &self,
        command: SwapCommand,
        swap_id: u64,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutput, SwapError> {
        let _guard = self.guard.acquire().await;

        let output = self.gateway.execute(invocation).await.map_err(|e| {
            let detail = format!("{e:#}");
            tracing::error!(
                swap_id,
                command = command.as_str(),
                error = %detail,
                "wallet tool execution failed"
            );
            SwapError::Execution(format!("{}: {detail}", command.as_str()))
        })?;

        if !output.success() {
            tracing::error!(
                swap_id,
                command = command.as_str(),
                code = ?output.code,
                stdout = %output.stdout,
                stderr = %output.stderr,
                "wallet tool exited with failure"
            );
            return Err(SwapError::Execution(format!(
                "{} exited with code {:?}",
                command.as_str(),
                output.code
            )));
        }

        if output.stdout.trim().is_empty() {
            tracing::error!(
                swap_id,
                command = command.as_str(),
                stderr = %output.stderr,
                "wallet tool produced no output"
            );
            return Err(SwapError::Execution(format!(
                "{} produced no output",
                command.as_str()
            )));
        }

        Ok(output)
    }
}

fn check_input_payload(
    command: SwapCommand,
    swap_id: u64,
    payload: &Payload,
) -> Result<(), SwapError> {
    if payload.is_valid() {
        return Ok(());
    }

    tracing::error!(
        swap_id,
        command = command.as_str(),
        payload = payload.as_str(),
        "invalid input payload"
    );
    Err(SwapError::InvalidPayload)
}
