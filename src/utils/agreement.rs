use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Bytes, I256};
use ethers::utils::id;

use crate::types::FlowRate;

pub const CREATE_FLOW: &str = "createFlow(address,address,int96,bytes)";
pub const UPDATE_FLOW: &str = "updateFlow(address,address,int96,bytes)";
pub const DELETE_FLOW: &str = "deleteFlow(address,address,address,bytes)";
pub const CALL_AGREEMENT: &str = "callAgreement(address,bytes,bytes)";

/// Custom error raised by newer constant flow agreement deployments.
pub const FLOW_DOES_NOT_EXIST_ERROR: &str = "CFA_FLOW_DOES_NOT_EXIST()";
/// Revert string raised by older deployments.
const FLOW_DOES_NOT_EXIST_REASON: &str = "flow does not exist";

const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

fn encode_call(signature: &str, args: &[Token]) -> Bytes {
    let mut data = id(signature).to_vec();
    data.extend(abi::encode(args));
    data.into()
}

fn rate_token(rate: FlowRate) -> Token {
    Token::Int(I256::from(rate.wei_per_second()).into_raw())
}

// The ctx argument is filled in by the host, callers always pass it empty.
fn empty_ctx() -> Token {
    Token::Bytes(Vec::new())
}

pub fn create_flow_call(token: Address, receiver: Address, rate: FlowRate) -> Bytes {
    encode_call(
        CREATE_FLOW,
        &[Token::Address(token), Token::Address(receiver), rate_token(rate), empty_ctx()],
    )
}

pub fn update_flow_call(token: Address, receiver: Address, rate: FlowRate) -> Bytes {
    encode_call(
        UPDATE_FLOW,
        &[Token::Address(token), Token::Address(receiver), rate_token(rate), empty_ctx()],
    )
}

pub fn delete_flow_call(token: Address, sender: Address, receiver: Address) -> Bytes {
    encode_call(
        DELETE_FLOW,
        &[
            Token::Address(token),
            Token::Address(sender),
            Token::Address(receiver),
            empty_ctx(),
        ],
    )
}

/// Input for the host's `callAgreement`, which forwards `call_data` to the
/// agreement and `user_data` to the receiving app.
pub fn call_agreement_data(agreement: Address, call_data: &Bytes, user_data: &Bytes) -> Bytes {
    encode_call(
        CALL_AGREEMENT,
        &[
            Token::Address(agreement),
            Token::Bytes(call_data.to_vec()),
            Token::Bytes(user_data.to_vec()),
        ],
    )
}

/// Recognises the agreement's "flow does not exist" rejection, either as a
/// custom error selector, an `Error(string)` payload or a node message.
pub fn is_flow_absent(reason: &str, data: Option<&Bytes>) -> bool {
    if mentions_absent_flow(reason) {
        return true;
    }

    let Some(data) = data else {
        return false;
    };
    if data.len() < 4 {
        return false;
    }

    let (selector, body) = data.split_at(4);
    if selector == id(FLOW_DOES_NOT_EXIST_ERROR) {
        return true;
    }

    selector == ERROR_STRING_SELECTOR
        && matches!(
            abi::decode(&[ParamType::String], body).as_deref(),
            Ok([Token::String(message)]) if mentions_absent_flow(message)
        )
}

fn mentions_absent_flow(text: &str) -> bool {
    text.to_ascii_lowercase().contains(FLOW_DOES_NOT_EXIST_REASON)
        || text.contains("CFA_FLOW_DOES_NOT_EXIST")
}
