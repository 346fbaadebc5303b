use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, MiddlewareError, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TransactionRequest, H256, U64},
};
use tracing::debug;

use super::{Network, Receipt};
use crate::types::{AgreementCall, ClaimError, NetworkError};

/// Signing client over plain HTTP JSON-RPC.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// [`Network`] backed by an `ethers` middleware stack.
#[derive(Debug)]
pub struct EthersNetwork<M> {
    client: Arc<M>,
    sender: Address,
}

impl<M: Middleware + 'static> EthersNetwork<M> {
    /// `sender` must be the account the middleware signs with.
    pub fn new(client: Arc<M>, sender: Address) -> Self {
        Self { client, sender }
    }

    pub fn client(&self) -> &Arc<M> {
        &self.client
    }
}

impl EthersNetwork<SignerClient> {
    /// Connects to `rpc_url` and binds `wallet` to the node's chain id.
    pub async fn connect(rpc_url: &str, wallet: LocalWallet) -> Result<Self, ClaimError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ClaimError::Configuration(format!("rpc url {rpc_url:?}: {e}")))?;

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| ClaimError::Transport(e.to_string()))?;

        let wallet = wallet.with_chain_id(chain_id.as_u64());
        let sender = wallet.address();
        debug!(%sender, %chain_id, "connected signer");

        Ok(Self::new(Arc::new(SignerMiddleware::new(provider, wallet)), sender))
    }
}

fn classify<E: MiddlewareError>(error: E) -> NetworkError {
    match error.as_error_response() {
        Some(response) => NetworkError::Rejected {
            reason: response.message.clone(),
            data: response.as_revert_data(),
        },
        None => NetworkError::Transport(error.to_string()),
    }
}

#[async_trait]
impl<M: Middleware + 'static> Network for EthersNetwork<M> {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn submit(&self, call: &AgreementCall) -> Result<H256, NetworkError> {
        let tx = TransactionRequest::new()
            .from(self.sender)
            .to(call.host)
            .data(call.input.clone());

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(classify)?;

        Ok(pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: H256) -> Result<Receipt, NetworkError> {
        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?
            .ok_or_else(|| {
                NetworkError::Transport(format!("transaction {tx_hash:?} dropped from mempool"))
            })?;

        Ok(Receipt {
            tx_hash,
            block_number: receipt.block_number,
            success: receipt.status == Some(U64::one()),
        })
    }
}
