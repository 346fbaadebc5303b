use std::fmt;

use ethers::types::{Address, Bytes};

use crate::types::ClaimError;

/// Price per second for each tile, in token wei.
pub const DEFAULT_FLOW_RATE: i128 = 385_802_469_135;

const INT96_MAX: i128 = (1i128 << 95) - 1;

/// A per-second flow rate. Strictly positive and within the agreement's
/// `int96` range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlowRate(i128);

impl FlowRate {
    pub fn new(wei_per_second: i128) -> Result<Self, ClaimError> {
        if wei_per_second <= 0 {
            return Err(ClaimError::Configuration(format!(
                "flow rate must be positive, got {wei_per_second}"
            )));
        }
        if wei_per_second > INT96_MAX {
            return Err(ClaimError::Configuration(format!(
                "flow rate {wei_per_second} exceeds int96"
            )));
        }
        Ok(Self(wei_per_second))
    }

    pub fn from_dec_str(value: &str) -> Result<Self, ClaimError> {
        let rate = value
            .trim()
            .parse::<i128>()
            .map_err(|e| ClaimError::Configuration(format!("flow rate {value:?}: {e}")))?;
        Self::new(rate)
    }

    pub fn wei_per_second(&self) -> i128 {
        self.0
    }
}

impl Default for FlowRate {
    fn default() -> Self {
        Self(DEFAULT_FLOW_RATE)
    }
}

impl TryFrom<i128> for FlowRate {
    type Error = ClaimError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for FlowRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei/s", self.0)
    }
}

/// Describes the payer -> controller flow a call creates, updates or removes.
///
/// Never stored: the live flow state belongs to the payment network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowSpec {
    pub payer: Address,
    pub payee: Address,
    pub token: Address,
    pub rate: FlowRate,
    /// Encoded orders for create/update, empty for delete.
    pub extra_data: Bytes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOperation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for FlowOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowOperation::Create => "createFlow",
            FlowOperation::Update => "updateFlow",
            FlowOperation::Delete => "deleteFlow",
        };
        f.write_str(name)
    }
}

/// A fully encoded `callAgreement` invocation, ready to be signed and sent
/// to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgreementCall {
    pub host: Address,
    pub agreement: Address,
    pub operation: FlowOperation,
    /// Inner agreement call (`createFlow` / `updateFlow` / `deleteFlow`).
    pub call_data: Bytes,
    /// Passed through to the controller, the encoded orders.
    pub user_data: Bytes,
    /// Transaction input for the host.
    pub input: Bytes,
    pub flow: FlowSpec,
}
