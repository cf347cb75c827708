pub mod client;
pub mod grpc;
pub mod router;

pub const SWAP_CREATE_PROPOSAL_SUBJECT: &str = "Swap.CreateProposal";
pub const SWAP_INFO_PROPOSAL_SUBJECT: &str = "Swap.InfoProposal";
pub const SWAP_ACCEPT_PROPOSAL_SUBJECT: &str = "Swap.AcceptProposal";
pub const SWAP_FINALIZE_PROPOSAL_SUBJECT: &str = "Swap.FinalizeProposal";

pub const DEFAULT_WORKERS_PER_SUBJECT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateProposal,
    InfoProposal,
    AcceptProposal,
    FinalizeProposal,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::CreateProposal,
        Operation::InfoProposal,
        Operation::AcceptProposal,
        Operation::FinalizeProposal,
    ];

    pub fn subject(&self) -> &'static str {
        match self {
            Operation::CreateProposal => SWAP_CREATE_PROPOSAL_SUBJECT,
            Operation::InfoProposal => SWAP_INFO_PROPOSAL_SUBJECT,
            Operation::AcceptProposal => SWAP_ACCEPT_PROPOSAL_SUBJECT,
            Operation::FinalizeProposal => SWAP_FINALIZE_PROPOSAL_SUBJECT,
        }
    }

    pub fn from_subject(subject: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.subject() == subject)
    }
}

/// Failures a remote caller gets to see. Orchestration detail stays in the service logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("no responder for subject {0}")]
    NoResponder(String),

    #[error("InternalError")]
    Internal,
}
