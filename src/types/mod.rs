pub mod error;
pub mod flow;
pub mod order;

pub use error::{ClaimError, NetworkError};
pub use flow::{AgreementCall, FlowOperation, FlowRate, FlowSpec, DEFAULT_FLOW_RATE};
pub use order::{parse_address, ClaimOrder, OrderBatch, Position};
