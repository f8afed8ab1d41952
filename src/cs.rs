pub mod ecc;
pub mod error;

pub use ecc::hamming::{Classification, SecdedCodec};
