use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use serde::{Deserialize, Serialize};

/// Opaque swap artifact produced and consumed by the wallet tool, carried either as raw
/// JSON or base64-wrapped JSON.
///
/// Validation checks the transport shape only. Whether the enclosed transaction makes sense
/// is the wallet's business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_valid(&self) -> bool {
        if self.0.is_empty() {
            return false;
        }

        match decode_base64(&self.0) {
            Ok(decoded) => is_json_object(&decoded),
            Err(_) => is_json_object(self.0.as_bytes()),
        }
    }

    /// Bytes to feed the wallet tool on stdin; `None` when there is nothing to send.
    pub fn stdin(&self) -> Option<&[u8]> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.as_bytes())
        }
    }
}

impl From<String> for Payload {
    fn from(payload: String) -> Self {
        Self(payload)
    }
}

impl From<&str> for Payload {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

// Padded standard alphabet; non-zero trailing bits are accepted.
const LENIENT: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PAD.with_decode_allow_trailing_bits(true));

// Line breaks are skipped, wallet output is usually newline terminated.
fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();
    LENIENT.decode(compact)
}

fn is_json_object(data: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(data).is_ok()
}
