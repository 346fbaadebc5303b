pub mod flow;

pub use flow::{FlowClient, PendingCall, Release};
