//! Deployment addresses and the flow price.
//!
//! Loaded once and passed to [`FlowClient::new`](crate::client::FlowClient::new);
//! nothing reads it from global state.

use std::path::Path;

use ethers::types::{Address, H160};
use serde::Deserialize;

use crate::types::{parse_address, ClaimError, FlowRate, DEFAULT_FLOW_RATE};

// 0xEB796bdb90fFA0f28255275e16936D25d3418603
const MUMBAI_HOST: Address = H160([
    0xeb, 0x79, 0x6b, 0xdb, 0x90, 0xff, 0xa0, 0xf2, 0x82, 0x55, 0x27, 0x5e, 0x16, 0x93, 0x6d, 0x25,
    0xd3, 0x41, 0x86, 0x03,
]);
// 0x49e565Ed1bdc17F3d220f72DF0857C26FA83F873
const MUMBAI_CFA: Address = H160([
    0x49, 0xe5, 0x65, 0xed, 0x1b, 0xdc, 0x17, 0xf3, 0xd2, 0x20, 0xf7, 0x2d, 0xf0, 0x85, 0x7c, 0x26,
    0xfa, 0x83, 0xf8, 0x73,
]);
// 0xf2cef2CF8ddc8b8e0E16d7995A58F8aAf435FF24
const MUMBAI_MISSION: Address = H160([
    0xf2, 0xce, 0xf2, 0xcf, 0x8d, 0xdc, 0x8b, 0x8e, 0x0e, 0x16, 0xd7, 0x99, 0x5a, 0x58, 0xf8, 0xaa,
    0xf4, 0x35, 0xff, 0x24,
]);
// 0x934aedA8514B6d3f1Aa8B0B9f7d050907B6d6EAD
const MUMBAI_SUPER_TOKEN: Address = H160([
    0x93, 0x4a, 0xed, 0xa8, 0x51, 0x4b, 0x6d, 0x3f, 0x1a, 0xa8, 0xb0, 0xb9, 0xf7, 0xd0, 0x50, 0x90,
    0x7b, 0x6d, 0x6e, 0xad,
]);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Host exposing `callAgreement`.
    pub host: Address,
    /// Constant flow agreement the host dispatches to.
    pub agreement: Address,
    /// Token the flow is denominated in.
    pub token: Address,
    /// Resource controller receiving the flow.
    pub controller: Address,
    pub flow_rate: FlowRate,
}

/// On-disk shape: addresses as hex, the rate as a decimal string since it
/// does not fit every JSON number parser.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    host: String,
    agreement: String,
    token: String,
    controller: String,
    #[serde(default)]
    flow_rate: Option<String>,
}

impl ClientConfig {
    /// The original Mumbai testnet deployment.
    pub fn mumbai() -> Self {
        Self {
            host: MUMBAI_HOST,
            agreement: MUMBAI_CFA,
            token: MUMBAI_SUPER_TOKEN,
            controller: MUMBAI_MISSION,
            flow_rate: FlowRate::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ClaimError> {
        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| ClaimError::Configuration(format!("config json: {e}")))?;
        Self::try_from(raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClaimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ClaimError::Configuration(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::mumbai()
    }
}

impl TryFrom<RawConfig> for ClientConfig {
    type Error = ClaimError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let flow_rate = match raw.flow_rate {
            Some(rate) => FlowRate::from_dec_str(&rate)?,
            None => FlowRate::new(DEFAULT_FLOW_RATE)?,
        };

        Ok(Self {
            host: config_address("host", &raw.host)?,
            agreement: config_address("agreement", &raw.agreement)?,
            token: config_address("token", &raw.token)?,
            controller: config_address("controller", &raw.controller)?,
            flow_rate,
        })
    }
}

fn config_address(field: &str, value: &str) -> Result<Address, ClaimError> {
    parse_address(value).map_err(|e| ClaimError::Configuration(format!("{field}: {e}")))
}
