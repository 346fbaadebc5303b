pub mod agreement;
pub mod codec;
