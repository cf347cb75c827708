pub mod error;
pub mod payload;
pub mod proposal;
pub mod service;

use std::fmt;

use chrono::{DateTime, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};

pub use error::{ErrorKind, SwapError};
pub use payload::Payload;
pub use proposal::ProposalInfo;

/// Hex-encoded 32-byte asset tag.
pub const ASSET_ID_LENGTH: usize = 64;

// Fee rates are in L-BTC per kB: 150 sat/kB.
pub const DEFAULT_FEE_RATE: f64 = 150.0 / 100_000_000.0;
pub const MINIMUM_FEE_RATE: f64 = 150.0 / 100_000_000.0;

/// Largest amount of any single asset in whole-coin units (21M, the network money cap).
pub const MAX_AMOUNT: f64 = 21_000_000.0;

pub const AMOUNT_PRECISION: i32 = 8;
pub const FEE_RATE_PRECISION: i32 = 9;

/// Amount in whole-coin units.
pub type Amount = f64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_valid_length(&self) -> bool {
        self.0.len() == ASSET_ID_LENGTH
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receiving address. Opaque to this layer beyond being non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidentialAddress(String);

impl ConfidentialAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ConfidentialAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for ConfidentialAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Envelope exchanged at every negotiation step, on the request and on the reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwapProposal {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "SwapID", default)]
    pub swap_id: u64,
    #[serde(default)]
    pub address: ConfidentialAddress,
    #[serde(alias = "ProposalInfo", default)]
    pub proposal: ProposalInfo,
    #[serde(default)]
    pub fee_rate: f64,
    #[serde(default)]
    pub payload: Payload,
}

impl SwapProposal {
    /// Fresh result envelope stamped with the current time, millisecond precision.
    pub fn stamped(swap_id: u64) -> Self {
        Self {
            timestamp: Some(Utc::now().trunc_subsecs(3)),
            swap_id,
            ..Self::default()
        }
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn decode(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}
