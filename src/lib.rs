//! Client for claiming grid tiles by streaming a fixed per-second payment to
//! a resource controller, and releasing them by deleting that stream.
//!
//! Orders are encoded by [`utils::codec`] and carried as user data on the
//! payment host's `callAgreement`; [`FlowClient`] drives the create, update
//! and delete transitions through a [`Network`].

pub mod client;
pub mod config;
pub mod network;
pub mod types;
pub mod utils;

pub use client::{FlowClient, PendingCall, Release};
pub use config::ClientConfig;
pub use network::{EthersNetwork, Network, Receipt, SignerClient};
pub use types::{
    AgreementCall, ClaimError, ClaimOrder, FlowOperation, FlowRate, FlowSpec, NetworkError,
    OrderBatch, Position,
};
pub use utils::codec::{decode_orders, encode_order, encode_orders};
