use std::fmt;

/// Finite set of failure classes a swap operation can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidProposal,
    InvalidPayload,
    ExecutionError,
    RequestFailed,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidProposal => "InvalidProposal",
            ErrorKind::InvalidPayload => "InvalidPayload",
            ErrorKind::ExecutionError => "ExecutionError",
            ErrorKind::RequestFailed => "RequestFailed",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("invalid proposal: {0}")]
    InvalidProposal(&'static str),

    #[error("invalid payload")]
    InvalidPayload,

    #[error("execution failed: {0}")]
    Execution(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("internal error")]
    Internal,
}

impl SwapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwapError::InvalidProposal(_) => ErrorKind::InvalidProposal,
            SwapError::InvalidPayload => ErrorKind::InvalidPayload,
            SwapError::Execution(_) => ErrorKind::ExecutionError,
            SwapError::RequestFailed(_) => ErrorKind::RequestFailed,
            SwapError::Internal => ErrorKind::InternalError,
        }
    }
}
