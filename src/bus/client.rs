use std::time::Duration;

use anyhow::{Context as _, Result};
use tonic::Code;
use tonic::transport::{Channel, Endpoint};

use crate::bus::{
    SWAP_ACCEPT_PROPOSAL_SUBJECT, SWAP_CREATE_PROPOSAL_SUBJECT, SWAP_FINALIZE_PROPOSAL_SUBJECT,
    SWAP_INFO_PROPOSAL_SUBJECT,
};
use crate::proto::v1 as pb;
use crate::proto::v1::swap_bus_client::SwapBusClient;
use crate::swap::{ConfidentialAddress, ErrorKind, Payload, ProposalInfo, SwapError, SwapProposal};

/// Counterparty side of the negotiation. Requests are checked locally before anything is
/// put on the bus, so obviously malformed input never reaches the service.
#[derive(Debug, Clone)]
pub struct SwapClient {
    inner: SwapBusClient<Channel>,
    timeout: Option<Duration>,
}

impl SwapClient {
    pub async fn connect(url: String) -> Result<Self> {
        let inner = SwapBusClient::connect(url)
            .await
            .context("connect swap bus")?;
        Ok(Self {
            inner,
            timeout: None,
        })
    }

    /// Defers connecting until the first request.
    pub fn connect_lazy(url: String) -> Result<Self> {
        let channel = Endpoint::from_shared(url)
            .context("parse swap bus url")?
            .connect_lazy();
        Ok(Self::new(channel))
    }

    pub fn new(channel: Channel) -> Self {
        Self {
            inner: SwapBusClient::new(channel),
            timeout: None,
        }
    }

    /// Deadline sent along with every request; the service abandons the request (and any
    /// wallet tool run) once it passes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn create_proposal(
        &mut self,
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

        let request = SwapProposal {
            swap_id,
            address: address.clone(),
            proposal: proposal.clone(),
            fee_rate,
            ..SwapProposal::default()
        };
        let result = self.request(SWAP_CREATE_PROPOSAL_SUBJECT, &request).await?;

        tracing::debug!(swap_id = result.swap_id, "create swap proposal");
        Ok(result)
    }

    pub async fn accept_proposal(
        &mut self,
        swap_id: u64,
        address: &ConfidentialAddress,
        payload: &Payload,
        fee_rate: f64,
    ) -> Result<SwapProposal, SwapError> {
        if address.is_empty() {
            return Err(SwapError::InvalidProposal("empty address"));
        }
        if !payload.is_valid() {
            return Err(SwapError::InvalidPayload);
        }

        let request = SwapProposal {
            swap_id,
            address: address.clone(),
            fee_rate,
            payload: payload.clone(),
            ..SwapProposal::default()
        };
        let result = self.request(SWAP_ACCEPT_PROPOSAL_SUBJECT, &request).await?;

        tracing::debug!(swap_id = result.swap_id, "accept swap proposal");
        Ok(result)
    }

    pub async fn finalize_proposal(
        &mut self,
        swap_id: u64,
        payload: &Payload,
    ) -> Result<SwapProposal, SwapError> {
        if !payload.is_valid() {
            return Err(SwapError::InvalidPayload);
        }

        let request = SwapProposal {
            swap_id,
            payload: payload.clone(),
            ..SwapProposal::default()
        };
        let result = self.request(SWAP_FINALIZE_PROPOSAL_SUBJECT, &request).await?;

        tracing::debug!(swap_id = result.swap_id, "finalize swap proposal");
        Ok(result)
    }

    pub async fn info_proposal(
        &mut self,
        swap_id: u64,
        payload: &Payload,
    ) -> Result<SwapProposal, SwapError> {
        if !payload.is_valid() {
            return Err(SwapError::InvalidPayload);
        }

        let request = SwapProposal {
            swap_id,
            payload: payload.clone(),
            ..SwapProposal::default()
        };
        let result = self.request(SWAP_INFO_PROPOSAL_SUBJECT, &request).await?;

        tracing::debug!(swap_id = result.swap_id, "info swap proposal");
        Ok(result)
    }

    async fn request(
        &mut self,
        subject: &str,
        request: &SwapProposal,
    ) -> Result<SwapProposal, SwapError> {
        let data = request
            .encode()
            .map_err(|e| SwapError::RequestFailed(format!("encode request: {e}")))?;

        let mut bus_request = tonic::Request::new(pb::BusRequest {
            subject: subject.to_string(),
            data,
        });
        if let Some(timeout) = self.timeout {
            bus_request.set_timeout(timeout);
        }

        let reply = self
            .inner
            .request(bus_request)
            .await
            .map_err(|status| {
                tracing::error!(
                    subject,
                    code = ?status.code(),
                    message = status.message(),
                    "swap bus request failed"
                );
                if status.code() == Code::Internal
                    && status.message() == ErrorKind::InternalError.as_str()
                {
                    SwapError::Internal
                } else {
                    SwapError::RequestFailed(format!("{subject}: {}", status.message()))
                }
            })?
            .into_inner();

        SwapProposal::decode(&reply.data)
            .map_err(|e| SwapError::RequestFailed(format!("decode reply: {e}")))
    }
}
