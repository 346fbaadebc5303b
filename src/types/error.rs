use ethers::types::Bytes;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Claim order out of encodable range: {0}")]
    EncodingRange(String),
    #[error("Order batch must contain at least one order")]
    EmptyBatch,
    #[error("Malformed order payload: {0}")]
    Decode(String),
    #[error("Call rejected by network: {reason}")]
    CallRejected { reason: String, data: Option<Bytes> },
    #[error("Transport failure, call outcome unknown: {0}")]
    Transport(String),
}

impl ClaimError {
    /// True for failures raised before anything was sent to the network.
    pub fn is_encoding(&self) -> bool {
        matches!(self, ClaimError::EncodingRange(_) | ClaimError::EmptyBatch)
    }
}

/// Failure reported by a [`Network`](crate::network::Network) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Rejected: {reason}")]
    Rejected { reason: String, data: Option<Bytes> },
    #[error("Transport: {0}")]
    Transport(String),
}

impl From<NetworkError> for ClaimError {
    fn from(error: NetworkError) -> Self {
        match error {
            NetworkError::Rejected { reason, data } => ClaimError::CallRejected { reason, data },
            NetworkError::Transport(msg) => ClaimError::Transport(msg),
        }
    }
}
