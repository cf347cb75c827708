use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::bus::{BusError, DEFAULT_WORKERS_PER_SUBJECT, Operation};
use crate::liquid::exec::ToolGateway;
use crate::swap::service::SwapOrchestrator;
use crate::swap::{SwapError, SwapProposal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Requests processed concurrently per subject.
    pub workers_per_subject: usize,
    /// Subscribe `Swap.AcceptProposal` as well.
    pub enable_accept: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            workers_per_subject: DEFAULT_WORKERS_PER_SUBJECT,
            enable_accept: false,
        }
    }
}

struct Route {
    operation: Operation,
    workers: Semaphore,
}

/// Binds subjects to orchestrator operations and converts envelopes in and out.
pub struct ProtocolRouter<G> {
    orchestrator: Arc<SwapOrchestrator<G>>,
    routes: HashMap<&'static str, Route>,
}

impl<G: ToolGateway> ProtocolRouter<G> {
    pub fn new(cfg: RouterConfig, orchestrator: Arc<SwapOrchestrator<G>>) -> Self {
        let mut operations = vec![
            Operation::CreateProposal,
            Operation::InfoProposal,
            Operation::FinalizeProposal,
        ];
        if cfg.enable_accept {
            operations.push(Operation::AcceptProposal);
        }

        let workers = cfg.workers_per_subject.max(1);
        let routes = operations
            .into_iter()
            .map(|operation| {
                let route = Route {
                    operation,
                    workers: Semaphore::new(workers),
                };
                (operation.subject(), route)
            })
            .collect::<HashMap<_, _>>();

        tracing::debug!(
            workers_per_subject = workers,
            enable_accept = cfg.enable_accept,
            "liquid swap handlers registered"
        );

        Self {
            orchestrator,
            routes,
        }
    }

    pub fn subjects(&self) -> Vec<&'static str> {
        let mut subjects: Vec<_> = self.routes.keys().copied().collect();
        subjects.sort_unstable();
        subjects
    }

    pub fn is_subscribed(&self, subject: &str) -> bool {
        self.routes.contains_key(subject)
    }

    /// Handles one request envelope and returns the encoded reply envelope.
    pub async fn dispatch(&self, subject: &str, data: &[u8]) -> Result<Vec<u8>, BusError> {
        let Some(route) = self.routes.get(subject) else {
            tracing::warn!(subject, "no handler subscribed");
            return Err(BusError::NoResponder(subject.to_string()));
        };

        let request_id = Uuid::new_v4();
        let _permit = route.workers.acquire().await.map_err(|e| {
            tracing::error!(%request_id, subject, error = %e, "worker pool closed");
            BusError::Internal
        })?;

        let request = SwapProposal::decode(data).map_err(|e| {
            tracing::error!(%request_id, subject, error = %e, "decode request envelope");
            BusError::Internal
        })?;

        let response = self.handle(route.operation, &request).await.map_err(|e| {
            tracing::error!(
                %request_id,
                subject,
                swap_id = request.swap_id,
                kind = %e.kind(),
                error = %e,
                "swap proposal request failed"
            );
            BusError::Internal
        })?;

        response.encode().map_err(|e| {
            tracing::error!(%request_id, subject, error = %e, "encode reply envelope");
            BusError::Internal
        })
    }

    async fn handle(
        &self,
        operation: Operation,
        request: &SwapProposal,
    ) -> Result<SwapProposal, SwapError> {
        let orchestrator = &self.orchestrator;
        match operation {
            Operation::CreateProposal => {
                orchestrator
                    .propose(
                        request.swap_id,
                        &request.address,
                        &request.proposal,
                        request.fee_rate,
                    )
                    .await
            }
            Operation::AcceptProposal => {
                orchestrator
                    .accept(
                        request.swap_id,
                        &request.address,
                        &request.payload,
                        request.fee_rate,
                    )
                    .await
            }
            Operation::FinalizeProposal => {
                orchestrator
                    .finalize(request.swap_id, &request.payload)
                    .await
            }
            Operation::InfoProposal => orchestrator.info(request.swap_id, &request.payload).await,
        }
    }
}
