use ethers::types::{Address, I256, U256};

use crate::types::ClaimError;

/// Grid coordinates of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: I256,
    pub y: I256,
    pub z: I256,
}

impl Position {
    pub fn new(x: I256, y: I256, z: I256) -> Self {
        Self { x, y, z }
    }
}

impl From<(i64, i64, i64)> for Position {
    fn from((x, y, z): (i64, i64, i64)) -> Self {
        Self::new(I256::from(x), I256::from(y), I256::from(z))
    }
}

/// A request to associate one tile with the payer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClaimOrder {
    pub position: Position,
    pub resource_id: U256,
    pub resource_owner: Address,
}

impl ClaimOrder {
    pub fn new(position: impl Into<Position>, resource_id: U256, resource_owner: Address) -> Self {
        Self {
            position: position.into(),
            resource_id,
            resource_owner,
        }
    }

    /// Builds an order from decimal coordinates, a decimal resource id and a
    /// `0x`-prefixed hex owner address.
    ///
    /// Every field is range checked here so that encoding never sees a value
    /// it cannot represent.
    pub fn parse(
        x: &str,
        y: &str,
        z: &str,
        resource_id: &str,
        resource_owner: &str,
    ) -> Result<Self, ClaimError> {
        let position = Position::new(
            parse_coordinate("x", x)?,
            parse_coordinate("y", y)?,
            parse_coordinate("z", z)?,
        );
        let resource_id = non_blank("resource id", resource_id)?;
        let resource_id = U256::from_dec_str(resource_id).map_err(|e| {
            ClaimError::EncodingRange(format!("resource id {resource_id:?}: {e}"))
        })?;

        Ok(Self {
            position,
            resource_id,
            resource_owner: parse_address(resource_owner)?,
        })
    }
}

// The decimal parsers read "" as zero.
fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, ClaimError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClaimError::EncodingRange(format!("{field} is blank")));
    }
    Ok(trimmed)
}

fn parse_coordinate(axis: &str, value: &str) -> Result<I256, ClaimError> {
    I256::from_dec_str(non_blank(axis, value)?)
        .map_err(|e| ClaimError::EncodingRange(format!("coordinate {axis}={value:?}: {e}")))
}

/// Strict 20-byte address parsing: `0x` followed by exactly 40 hex digits.
pub fn parse_address(value: &str) -> Result<Address, ClaimError> {
    let digits = value
        .trim()
        .strip_prefix("0x")
        .or_else(|| value.trim().strip_prefix("0X"))
        .ok_or_else(|| ClaimError::EncodingRange(format!("address {value:?} lacks 0x prefix")))?;

    let bytes = hex::decode(digits)
        .map_err(|e| ClaimError::EncodingRange(format!("address {value:?}: {e}")))?;

    if bytes.len() != Address::len_bytes() {
        return Err(ClaimError::EncodingRange(format!(
            "address {value:?} is {} bytes, expected 20",
            bytes.len()
        )));
    }

    Ok(Address::from_slice(&bytes))
}

/// A non-empty, ordered list of claim orders submitted in one call.
///
/// The controller processes orders in list order, so the order given by the
/// caller is kept as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBatch {
    orders: Vec<ClaimOrder>,
}

impl OrderBatch {
    pub fn new(orders: Vec<ClaimOrder>) -> Result<Self, ClaimError> {
        if orders.is_empty() {
            return Err(ClaimError::EmptyBatch);
        }
        Ok(Self { orders })
    }

    pub fn single(order: ClaimOrder) -> Self {
        Self {
            orders: vec![order],
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    // Always false, kept for the len/is_empty pairing.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClaimOrder> {
        self.orders.iter()
    }

    pub fn as_slice(&self) -> &[ClaimOrder] {
        &self.orders
    }

    pub fn into_inner(self) -> Vec<ClaimOrder> {
        self.orders
    }
}

impl TryFrom<Vec<ClaimOrder>> for OrderBatch {
    type Error = ClaimError;

    fn try_from(orders: Vec<ClaimOrder>) -> Result<Self, Self::Error> {
        Self::new(orders)
    }
}

impl<'a> IntoIterator for &'a OrderBatch {
    type Item = &'a ClaimOrder;
    type IntoIter = std::slice::Iter<'a, ClaimOrder>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    #[test]
    fn test_parse_valid_order() {
        let order = ClaimOrder::parse("3", "-1", "0", "42", OWNER).unwrap();

        assert_eq!(order.position, Position::from((3, -1, 0)));
        assert_eq!(order.resource_id, U256::from(42));
        assert_eq!(order.resource_owner, Address::repeat_byte(0xaa));
    }

    #[test]
    fn test_parse_coordinate_bounds() {
        // 2^255 - 1 and -2^255 are the int256 limits
        let max = "57896044618658097711785492504343953926634992332820282019728792003956564819967";
        let min = "-57896044618658097711785492504343953926634992332820282019728792003956564819968";
        let over = "57896044618658097711785492504343953926634992332820282019728792003956564819968";
        let under = "-57896044618658097711785492504343953926634992332820282019728792003956564819969";

        let order = ClaimOrder::parse(max, min, "0", "1", OWNER).unwrap();
        assert_eq!(order.position.x, I256::MAX);
        assert_eq!(order.position.y, I256::MIN);

        for (x, y) in [(over, "0"), ("0", under), ("", "0"), ("0", "  ")] {
            let err = ClaimOrder::parse(x, y, "0", "1", OWNER).unwrap_err();
            assert!(matches!(err, ClaimError::EncodingRange(_)), "{x} {y}: {err:?}");
            assert!(err.is_encoding());
        }
    }

    #[test]
    fn test_parse_resource_id_bounds() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let over = "115792089237316195423570985008687907853269984665640564039457584007913129639936";

        let order = ClaimOrder::parse("0", "0", "0", max, OWNER).unwrap();
        assert_eq!(order.resource_id, U256::MAX);

        let err = ClaimOrder::parse("0", "0", "0", over, OWNER).unwrap_err();
        assert!(matches!(err, ClaimError::EncodingRange(_)));

        for id in ["-1", "", " "] {
            let err = ClaimOrder::parse("0", "0", "0", id, OWNER).unwrap_err();
            assert!(matches!(err, ClaimError::EncodingRange(_)), "{id:?}");
        }
    }

    #[test]
    fn test_parse_all_blank_fields() {
        let err = ClaimOrder::parse("", "", "", "", OWNER).unwrap_err();
        assert!(matches!(err, ClaimError::EncodingRange(_)));
    }

    #[test]
    fn test_parse_malformed_address() {
        let bad = [
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "0xaaaa",
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "0xzzaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "",
        ];
        for owner in bad {
            let err = ClaimOrder::parse("0", "0", "0", "1", owner).unwrap_err();
            assert!(matches!(err, ClaimError::EncodingRange(_)), "{owner:?}");
        }
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert_eq!(OrderBatch::new(vec![]), Err(ClaimError::EmptyBatch));
        assert!(ClaimError::EmptyBatch.is_encoding());
    }

    #[test]
    fn test_batch_preserves_order() {
        let orders: Vec<ClaimOrder> = (0..5)
            .map(|i| ClaimOrder::new((i, -i, 0), U256::from(i as u64), Address::repeat_byte(i as u8)))
            .collect();

        let batch = OrderBatch::try_from(orders.clone()).unwrap();
        assert_eq!(batch.len(), 5);
        assert_eq!(batch.as_slice(), orders.as_slice());
        assert_eq!(batch.into_inner(), orders);
    }
}
