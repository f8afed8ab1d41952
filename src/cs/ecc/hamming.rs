//! Extended Hamming(8,4) SECDED code.
//!
//! Every 4-bit nibble is carried in an 8-bit codeword holding three Hamming
//! check bits and one overall parity bit. The decoder corrects any single
//! flipped bit per codeword and detects, but refuses to guess at, any two
//! flipped bits. A single unrepairable codeword rejects the whole message.
//!
//! Bit strings are `bitvec` slices in `Msb0` order, so bytes enter and leave
//! the codec most significant bit first.
//!
//! # Examples
//!
//! ```
//! use hamming_secded::cs::ecc::hamming::{parse_bit_text, to_bit_text, SecdedCodec};
//!
//! let codec = SecdedCodec::new();
//! let encoded = codec.encode(&parse_bit_text("0110").unwrap()).unwrap();
//! assert_eq!(to_bit_text(&encoded), "11001100");
//!
//! let decoded = codec.decode_to_bytes(&codec.encode_bytes(b"Hi")).unwrap();
//! assert_eq!(decoded, b"Hi");
//! ```

pub mod bits;
pub mod codebook;
pub mod decoder;
pub mod encoder;
pub mod noise;

pub use bits::{
    bits_to_byte, bits_to_bytes, byte_to_bits, bytes_to_bits, parse_bit_text, to_bit_text,
    BitString, Bits,
};
pub use codebook::{Codebook, Codeword, Nibble, CODEBOOK, CODEBOOK_SIZE};
pub use decoder::{classify, Classification};
pub use encoder::{encode_nibble, parity};
pub use noise::{flip_bits, inject_double_error, inject_errors, inject_single_error, NoiseProfile};

use bitvec::{order::Msb0, view::BitView};

use crate::cs::ecc::{ErrorCorrection, Result};
use crate::cs::error::Error;

/// Data bits per codeword
pub const NIBBLE_BITS: usize = 4;

/// Bits per codeword
pub const CODEWORD_BITS: usize = 8;

/// Codewords carrying one source byte
pub const BYTE_CODEWORDS: usize = 2;

/// How a received word is matched against the codebook.
///
/// For this code both strategies classify every 8-bit word identically: the
/// codewords are at least 4 apart, so a word within distance 1 of one entry
/// is at least 3 from all others, and a word whose closest entry is at
/// distance 2 has no entry closer. They differ only in work done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Scan the table in order and stop at the first entry within distance 2
    #[default]
    FirstMatch,
    /// Measure every entry and take the closest, lowest index on ties
    Nearest,
}

/// What to do with bits left over after the last complete chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Reject the input with [`Error::MalformedInput`]
    #[default]
    Strict,
    /// Silently drop the trailing fragment
    Truncate,
}

impl LengthPolicy {
    /// Number of leading bits to process for an input of `len` bits.
    pub fn usable_len(&self, len: usize, chunk: usize) -> Result<usize> {
        let remainder = len % chunk;
        match self {
            LengthPolicy::Strict if remainder != 0 => Err(Error::MalformedInput { len, chunk }),
            _ => Ok(len - remainder),
        }
    }
}

/// SECDED codec configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecdedCodec {
    /// Codebook matching strategy used by the decoder
    strategy: MatchStrategy,
    /// Handling of inputs that do not fill the last chunk
    length_policy: LengthPolicy,
}

impl SecdedCodec {
    /// Creates a codec with first-match decoding and strict length checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the decoder's matching strategy
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the trailing-fragment policy
    pub fn with_length_policy(mut self, policy: LengthPolicy) -> Self {
        self.length_policy = policy;
        self
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    pub fn length_policy(&self) -> LengthPolicy {
        self.length_policy
    }

    /// Encodes a bit string whose length is a multiple of 4.
    pub fn encode(&self, bits: &Bits) -> Result<BitString> {
        encoder::encode_bits(bits, self.length_policy)
    }

    /// Encodes bytes, high nibble of each byte first. Never fails.
    pub fn encode_bytes(&self, data: &[u8]) -> BitString {
        let mut encoded = BitString::with_capacity(data.len() * 2 * CODEWORD_BITS);
        for &byte in data {
            for nibble in [byte >> 4, byte & 0x0F] {
                let codeword = encode_nibble(Nibble::from_low_bits(nibble));
                bits::push_msb_first(&mut encoded, codeword.value(), CODEWORD_BITS);
            }
        }
        encoded
    }

    /// Decodes a codeword stream whose length is a multiple of 8.
    pub fn decode(&self, bits: &Bits) -> Result<BitString> {
        decoder::decode_bits(bits, self.strategy, self.length_policy, |_, _| {})
    }

    /// Decodes and reports every classification to `observer`.
    pub fn decode_with_observer<F>(&self, bits: &Bits, observer: F) -> Result<BitString>
    where
        F: FnMut(usize, &Classification),
    {
        decoder::decode_bits(bits, self.strategy, self.length_policy, observer)
    }

    /// Decodes with codewords classified in parallel.
    pub fn par_decode(&self, bits: &Bits) -> Result<BitString> {
        decoder::par_decode_bits(bits, self.strategy, self.length_policy)
    }

    /// Decodes and regroups the recovered bits into bytes. Every byte takes
    /// two codewords, so the input length must be a multiple of 16.
    pub fn decode_to_bytes(&self, bits: &Bits) -> Result<Vec<u8>> {
        let usable = self
            .length_policy
            .usable_len(bits.len(), BYTE_CODEWORDS * CODEWORD_BITS)?;
        let decoded = self.decode(&bits[..usable])?;
        bits_to_bytes(&decoded)
    }

    /// Classifies a single received word.
    pub fn classify(&self, candidate: Codeword) -> Classification {
        classify(candidate, self.strategy)
    }
}

impl ErrorCorrection for SecdedCodec {
    /// Each input byte becomes two codeword bytes.
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.encode_bytes(data).into_vec())
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode_to_bytes(data.view_bits::<Msb0>())
    }
}

/// Creates a codec with the default configuration
pub fn create_secded() -> SecdedCodec {
    SecdedCodec::new()
}

/// Encodes a bit string with the default configuration
pub fn secded_encode(bits: &Bits) -> Result<BitString> {
    create_secded().encode(bits)
}

/// Decodes a codeword stream with the default configuration
pub fn secded_decode(bits: &Bits) -> Result<BitString> {
    create_secded().decode(bits)
}
