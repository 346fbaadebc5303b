use std::collections::VecDeque;

use async_trait::async_trait;
use ethers::types::{Address, H256, U64};
use tokio::sync::Mutex;

use super::{Network, Receipt};
use crate::types::{AgreementCall, FlowOperation, NetworkError};

/// In-memory stand-in for the host, tracking a single flow the way the
/// agreement does: create fails on an existing flow, delete fails on a
/// missing one.
#[derive(Debug)]
pub(crate) struct MockNetwork {
    sender: Address,
    pub(crate) calls: Mutex<Vec<AgreementCall>>,
    pub(crate) flow_active: Mutex<bool>,
    /// Errors returned (in order) by the next submissions, before any
    /// flow bookkeeping happens.
    pub(crate) failures: Mutex<VecDeque<NetworkError>>,
    pub(crate) revert_on_confirm: Mutex<bool>,
}

impl MockNetwork {
    pub(crate) fn new(sender: Address) -> Self {
        Self {
            sender,
            calls: Mutex::new(Vec::new()),
            flow_active: Mutex::new(false),
            failures: Mutex::new(VecDeque::new()),
            revert_on_confirm: Mutex::new(false),
        }
    }

    pub(crate) async fn fail_next(&self, error: NetworkError) {
        self.failures.lock().await.push_back(error);
    }

    pub(crate) async fn submitted(&self) -> Vec<AgreementCall> {
        self.calls.lock().await.clone()
    }

    fn reverted(reason: &str) -> NetworkError {
        NetworkError::Rejected {
            reason: format!("execution reverted: {reason}"),
            data: None,
        }
    }
}

#[async_trait]
impl Network for MockNetwork {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn submit(&self, call: &AgreementCall) -> Result<H256, NetworkError> {
        if let Some(error) = self.failures.lock().await.pop_front() {
            return Err(error);
        }

        let mut active = self.flow_active.lock().await;
        match call.operation {
            FlowOperation::Create if *active => return Err(Self::reverted("CFA: flow already exist")),
            FlowOperation::Update | FlowOperation::Delete if !*active => {
                return Err(Self::reverted("CFA: flow does not exist"))
            }
            FlowOperation::Create | FlowOperation::Update => *active = true,
            FlowOperation::Delete => *active = false,
        }

        let mut calls = self.calls.lock().await;
        calls.push(call.clone());
        Ok(H256::from_low_u64_be(calls.len() as u64))
    }

    async fn confirm(&self, tx_hash: H256) -> Result<Receipt, NetworkError> {
        Ok(Receipt {
            tx_hash,
            block_number: Some(U64::from(tx_hash.to_low_u64_be())),
            success: !*self.revert_on_confirm.lock().await,
        })
    }
}
