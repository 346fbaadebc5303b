//! Seam between the lifecycle client and the payment network.
//!
//! Implementations own the signing identity and the RPC connection; the
//! client only hands them fully encoded calls.

mod rpc;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use ethers::types::{Address, H256, U64};

use crate::types::{AgreementCall, NetworkError};

pub use self::rpc::{EthersNetwork, SignerClient};

/// Outcome of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: H256,
    pub block_number: Option<U64>,
    pub success: bool,
}

#[async_trait]
pub trait Network: Send + Sync {
    /// Account every call is signed by.
    fn sender(&self) -> Address;

    /// Signs and broadcasts the call, returning once the node accepted it.
    async fn submit(&self, call: &AgreementCall) -> Result<H256, NetworkError>;

    /// Waits until the transaction is mined.
    async fn confirm(&self, tx_hash: H256) -> Result<Receipt, NetworkError>;
}
