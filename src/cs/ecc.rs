//! Error correction code implementations.
//!
//! Error correction codes are used to detect and correct errors in data
//! transmission and storage, making digital communications more reliable.
//!
//! Currently implemented:
//! - Extended Hamming(8,4) SECDED code
//!
//! # Examples
//!
//! ```rust
//! use hamming_secded::cs::ecc::{ErrorCorrection, hamming::SecdedCodec};
//!
//! let codec = SecdedCodec::new();
//! let mut encoded = ErrorCorrection::encode(&codec, b"ECC").unwrap();
//! encoded[1] ^= 0x08;
//! assert_eq!(ErrorCorrection::decode(&codec, &encoded).unwrap(), b"ECC");
//! ```

pub use crate::cs::error::Result;

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data with error correction symbols
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decode data and correct errors if possible
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Extended Hamming(8,4) single-error-correcting, double-error-detecting code
pub mod hamming;
pub use hamming::{
    create_secded, secded_decode, secded_encode, Codeword, LengthPolicy, MatchStrategy, Nibble,
    SecdedCodec,
};
