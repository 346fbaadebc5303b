//! Claim order payload: `tuple(int256,int256,int256,uint256,address)[]`.
//!
//! The payload carries no version tag; a controller expecting a different
//! tuple layout will simply fail to decode it.

use ethers::abi::{self, ParamType, Token};
use ethers::types::{Bytes, I256};

use crate::types::{ClaimError, ClaimOrder, OrderBatch, Position};

fn order_param() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::Int(256),
        ParamType::Int(256),
        ParamType::Int(256),
        ParamType::Uint(256),
        ParamType::Address,
    ])
}

fn batch_params() -> [ParamType; 1] {
    [ParamType::Array(Box::new(order_param()))]
}

fn order_token(order: &ClaimOrder) -> Token {
    Token::Tuple(vec![
        Token::Int(order.position.x.into_raw()),
        Token::Int(order.position.y.into_raw()),
        Token::Int(order.position.z.into_raw()),
        Token::Uint(order.resource_id),
        Token::Address(order.resource_owner),
    ])
}

/// ABI-encodes the batch as a single dynamic array, preserving order.
pub fn encode_orders(batch: &OrderBatch) -> Bytes {
    let orders = batch.iter().map(order_token).collect();
    abi::encode(&[Token::Array(orders)]).into()
}

/// Encodes one order, still wrapped in a one-element list.
pub fn encode_order(order: &ClaimOrder) -> Bytes {
    encode_orders(&OrderBatch::single(*order))
}

/// Strict inverse of [`encode_orders`]: non-zero padding and trailing bytes
/// are rejected, as the controller's decoder would.
pub fn decode_orders(payload: &[u8]) -> Result<OrderBatch, ClaimError> {
    let mut tokens = abi::decode_whole(&batch_params(), payload)
        .map_err(|e| ClaimError::Decode(e.to_string()))?;

    let items = match tokens.pop() {
        Some(Token::Array(items)) => items,
        other => return Err(ClaimError::Decode(format!("expected order array, got {other:?}"))),
    };

    let orders = items
        .into_iter()
        .map(order_from_token)
        .collect::<Result<Vec<_>, _>>()?;

    OrderBatch::new(orders)
}

fn order_from_token(token: Token) -> Result<ClaimOrder, ClaimError> {
    let fields = match token {
        Token::Tuple(fields) => fields,
        other => return Err(ClaimError::Decode(format!("expected order tuple, got {other:?}"))),
    };

    match fields.as_slice() {
        [Token::Int(x), Token::Int(y), Token::Int(z), Token::Uint(id), Token::Address(owner)] => {
            Ok(ClaimOrder {
                position: Position::new(I256::from_raw(*x), I256::from_raw(*y), I256::from_raw(*z)),
                resource_id: *id,
                resource_owner: *owner,
            })
        }
        _ => Err(ClaimError::Decode(format!(
            "order tuple has unexpected shape: {fields:?}"
        ))),
    }
}
