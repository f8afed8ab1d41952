//! Nibble to codeword encoding.
//!
//! For a nibble `d1 d2 d3 d4` the check bits are
//!
//! - `p1 = d1 ^ d2 ^ d4`
//! - `p2 = d1 ^ d3 ^ d4`
//! - `p3 = d2 ^ d3 ^ d4`
//!
//! placed at positions 1, 2 and 4 (1-indexed) of the classic (7,4) word
//! `p1 p2 d1 p3 d2 d3 d4`, so that the syndrome of a single flipped bit
//! spells out its position. The trailing bit `p` is the parity of those 7
//! bits and lets the decoder tell one flipped bit from two.

use super::bits::{load_msb_first, push_msb_first, BitString, Bits};
use super::codebook::{Codeword, Nibble};
use super::{LengthPolicy, CODEWORD_BITS, NIBBLE_BITS};
use crate::cs::error::Result;

// Data bit masks within a nibble: d1 = 0b1000 .. d4 = 0b0001
const P1_COVERAGE: u8 = 0b1101;
const P2_COVERAGE: u8 = 0b1011;
const P3_COVERAGE: u8 = 0b0111;

/// Even parity of the set bits in `bits`.
pub const fn parity(bits: u8) -> u8 {
    (bits.count_ones() % 2) as u8
}

/// Encodes the low 4 bits of `nibble` into a raw codeword.
pub const fn encode_value(nibble: u8) -> u8 {
    let d1 = (nibble >> 3) & 1;
    let d2 = (nibble >> 2) & 1;
    let d3 = (nibble >> 1) & 1;
    let d4 = nibble & 1;

    let p1 = parity(nibble & P1_COVERAGE);
    let p2 = parity(nibble & P2_COVERAGE);
    let p3 = parity(nibble & P3_COVERAGE);

    let hamming_7_4 = (p1 << 6) | (p2 << 5) | (d1 << 4) | (p3 << 3) | (d2 << 2) | (d3 << 1) | d4;

    (hamming_7_4 << 1) | parity(hamming_7_4)
}

/// Encodes a single nibble.
pub fn encode_nibble(nibble: Nibble) -> Codeword {
    Codeword::new(encode_value(nibble.value()))
}

/// Encodes a bit string 4 bits at a time, emitting 8 bits per nibble.
pub fn encode_bits(bits: &Bits, policy: LengthPolicy) -> Result<BitString> {
    let usable = policy.usable_len(bits.len(), NIBBLE_BITS)?;
    if usable < bits.len() {
        log::debug!(
            "dropping {} trailing bits that do not fill a nibble",
            bits.len() - usable
        );
    }

    let mut encoded = BitString::with_capacity(usable * 2);
    for chunk in bits[..usable].chunks_exact(NIBBLE_BITS) {
        let codeword = encode_value(load_msb_first(chunk));
        push_msb_first(&mut encoded, codeword, CODEWORD_BITS);
    }

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::ecc::hamming::bits::{parse_bit_text, to_bit_text};
    use crate::cs::ecc::hamming::codebook::CODEBOOK;
    use crate::cs::error::Error;

    #[test]
    fn test_parity() {
        assert_eq!(parity(0), 0);
        assert_eq!(parity(0b0001), 1);
        assert_eq!(parity(0b1011), 1);
        assert_eq!(parity(0b1111_1111), 0);
    }

    #[test]
    fn test_encode_0110() {
        let codeword = encode_nibble(Nibble::from_low_bits(0b0110));
        assert_eq!(codeword.to_string(), "11001100");
    }

    #[test]
    fn test_encoder_reproduces_codebook() {
        for (nibble, entry) in CODEBOOK.iter() {
            assert_eq!(encode_nibble(nibble), entry);
        }
    }

    #[test]
    fn test_encode_bits() {
        let bits = parse_bit_text("01100001").unwrap();
        let encoded = encode_bits(&bits, LengthPolicy::Strict).unwrap();
        assert_eq!(to_bit_text(&encoded), "1100110011010010");
    }

    #[test]
    fn test_empty_input() {
        let encoded = encode_bits(&BitString::new(), LengthPolicy::Strict).unwrap();
        assert!(encoded.is_empty());
    }

    #[test]
    fn test_trailing_fragment() {
        let bits = parse_bit_text("011010").unwrap();

        assert_eq!(
            encode_bits(&bits, LengthPolicy::Strict),
            Err(Error::MalformedInput { len: 6, chunk: 4 })
        );

        let encoded = encode_bits(&bits, LengthPolicy::Truncate).unwrap();
        assert_eq!(to_bit_text(&encoded), "11001100");
    }
}
