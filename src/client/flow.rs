use ethers::types::{Bytes, H256};
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    network::{Network, Receipt},
    types::{
        AgreementCall, ClaimError, ClaimOrder, FlowOperation, FlowSpec, NetworkError, OrderBatch,
    },
    utils::{agreement, codec},
};

/// Drives the payer -> controller flow that backs a tile claim.
///
/// The flow is either absent or running at the configured rate; the client
/// never tracks which. Each operation is exactly one signed `callAgreement`
/// and errors are reported as the network gave them, without retries.
pub struct FlowClient<N> {
    config: ClientConfig,
    network: N,
}

impl<N: Network> FlowClient<N> {
    pub fn new(config: ClientConfig, network: N) -> Self {
        Self { config, network }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// The flow a create/update carrying `batch` would describe.
    ///
    /// The rate is the configured constant no matter how many tiles the
    /// batch holds.
    pub fn flow_spec(&self, batch: &OrderBatch) -> FlowSpec {
        FlowSpec {
            payer: self.network.sender(),
            payee: self.config.controller,
            token: self.config.token,
            rate: self.config.flow_rate,
            extra_data: codec::encode_orders(batch),
        }
    }

    /// The flow a release removes, with no payload attached.
    pub fn release_spec(&self) -> FlowSpec {
        FlowSpec {
            payer: self.network.sender(),
            payee: self.config.controller,
            token: self.config.token,
            rate: self.config.flow_rate,
            extra_data: Bytes::new(),
        }
    }

    /// Builds the host call for `operation` without sending it.
    pub fn agreement_call(&self, operation: FlowOperation, flow: FlowSpec) -> AgreementCall {
        let call_data = match operation {
            FlowOperation::Create => agreement::create_flow_call(flow.token, flow.payee, flow.rate),
            FlowOperation::Update => agreement::update_flow_call(flow.token, flow.payee, flow.rate),
            FlowOperation::Delete => {
                agreement::delete_flow_call(flow.token, flow.payer, flow.payee)
            }
        };
        let user_data = flow.extra_data.clone();
        let input = agreement::call_agreement_data(self.config.agreement, &call_data, &user_data);

        AgreementCall {
            host: self.config.host,
            agreement: self.config.agreement,
            operation,
            call_data,
            user_data,
            input,
            flow,
        }
    }

    /// Starts the flow and attaches `batch` as the claimed tiles.
    ///
    /// Returns once the transaction is accepted for submission. The
    /// controller grants the tiles only after it sees the flow, which this
    /// call does not wait for.
    pub async fn establish(&self, batch: &OrderBatch) -> Result<PendingCall<'_, N>, ClaimError> {
        self.send(FlowOperation::Create, batch).await
    }

    /// [`establish`](Self::establish) for a plain list of orders. An empty
    /// list fails with [`ClaimError::EmptyBatch`] before anything is sent.
    pub async fn establish_orders(
        &self,
        orders: Vec<ClaimOrder>,
    ) -> Result<PendingCall<'_, N>, ClaimError> {
        let batch = OrderBatch::new(orders)?;
        self.establish(&batch).await
    }

    /// Re-submits a tile set against a running flow, at the same rate.
    ///
    /// Whether the controller adds these tiles to the existing claim or
    /// replaces it is up to the controller.
    pub async fn amend(&self, batch: &OrderBatch) -> Result<PendingCall<'_, N>, ClaimError> {
        self.send(FlowOperation::Update, batch).await
    }

    /// Deletes the flow, releasing every tile it backed.
    ///
    /// A flow that is already gone counts as released, so this is safe to
    /// call speculatively.
    pub async fn terminate(&self) -> Result<Release<'_, N>, ClaimError> {
        let call = self.agreement_call(FlowOperation::Delete, self.release_spec());

        match self.network.submit(&call).await {
            Ok(tx_hash) => {
                info!(?tx_hash, payer = ?call.flow.payer, "flow deletion submitted");
                Ok(Release {
                    pending: Some(PendingCall::new(&self.network, FlowOperation::Delete, tx_hash)),
                })
            }
            Err(NetworkError::Rejected { reason, data })
                if agreement::is_flow_absent(&reason, data.as_ref()) =>
            {
                warn!(%reason, "no flow to delete, treating as released");
                Ok(Release { pending: None })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn send(
        &self,
        operation: FlowOperation,
        batch: &OrderBatch,
    ) -> Result<PendingCall<'_, N>, ClaimError> {
        let flow = self.flow_spec(batch);
        debug!(
            %operation,
            orders = batch.len(),
            payload_bytes = flow.extra_data.len(),
            rate = %flow.rate,
            "encoded claim"
        );

        let call = self.agreement_call(operation, flow);
        let tx_hash = self.network.submit(&call).await?;
        info!(%operation, ?tx_hash, orders = batch.len(), "flow call submitted");

        Ok(PendingCall::new(&self.network, operation, tx_hash))
    }
}

/// A call the network accepted but that may not be mined yet.
#[derive(Debug)]
pub struct PendingCall<'a, N> {
    network: &'a N,
    operation: FlowOperation,
    tx_hash: H256,
}

impl<'a, N: Network> PendingCall<'a, N> {
    fn new(network: &'a N, operation: FlowOperation, tx_hash: H256) -> Self {
        Self {
            network,
            operation,
            tx_hash,
        }
    }

    pub fn tx_hash(&self) -> H256 {
        self.tx_hash
    }

    pub fn operation(&self) -> FlowOperation {
        self.operation
    }

    /// Waits for the transaction to be mined. A reverted transaction is a
    /// [`ClaimError::CallRejected`].
    pub async fn confirm(self) -> Result<Receipt, ClaimError> {
        let receipt = self.network.confirm(self.tx_hash).await?;

        if !receipt.success {
            return Err(ClaimError::CallRejected {
                reason: format!(
                    "{} transaction {:?} reverted in block {:?}",
                    self.operation, self.tx_hash, receipt.block_number
                ),
                data: None,
            });
        }

        debug!(tx_hash = ?self.tx_hash, block = ?receipt.block_number, "flow call confirmed");
        Ok(receipt)
    }
}

/// Outcome of [`FlowClient::terminate`]. Identical whether a flow was
/// deleted or there was none to delete.
#[derive(Debug)]
pub struct Release<'a, N> {
    pending: Option<PendingCall<'a, N>>,
}

impl<'a, N: Network> Release<'a, N> {
    /// Hash of the deletion transaction, `None` when there was no flow and
    /// nothing was sent.
    pub fn tx_hash(&self) -> Option<H256> {
        self.pending.as_ref().map(|pending| pending.tx_hash())
    }

    /// Waits for the deletion to be mined, if one was sent.
    pub async fn confirm(self) -> Result<(), ClaimError> {
        match self.pending {
            Some(pending) => pending.confirm().await.map(|_| ()),
            None => Ok(()),
        }
    }
}
