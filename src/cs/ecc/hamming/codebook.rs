//! Nibble and codeword values, and the fixed table of the 16 valid codewords.
//!
//! Codeword bit positions are numbered 0..8 from the most significant bit:
//!
//! ```text
//! position:  0   1   2   3   4   5   6   7
//! bit:       p1  p2  d1  p3  d2  d3  d4  p
//! ```

use std::fmt;

use super::bits::{load_msb_first, Bits};
use super::encoder::encode_value;
use super::CODEWORD_BITS;
use crate::cs::error::{Error, Result};

/// Number of entries in the codebook, one per 4-bit value
pub const CODEBOOK_SIZE: usize = 16;

/// The 4 data bits `d1 d2 d3 d4`, with `d1` as the most significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nibble(u8);

impl Nibble {
    /// Creates a nibble, rejecting values above 15.
    pub fn new(value: u8) -> Result<Self> {
        if value > 0x0F {
            return Err(Error::InvalidInput(format!(
                "Nibble value {} does not fit in 4 bits",
                value
            )));
        }
        Ok(Nibble(value))
    }

    /// Keeps only the low 4 bits of `value`.
    pub const fn from_low_bits(value: u8) -> Self {
        Nibble(value & 0x0F)
    }

    /// Get the raw value of this nibble
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// All 16 nibbles in ascending order
    pub fn all() -> impl Iterator<Item = Nibble> {
        (0..CODEBOOK_SIZE as u8).map(Nibble)
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04b}", self.0)
    }
}

/// An 8-bit word laid out as `p1 p2 d1 p3 d2 d3 d4 p`.
///
/// Any byte is a valid `Codeword` value; whether it belongs to the code is
/// decided by the decoder against [`CODEBOOK`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codeword(u8);

impl Codeword {
    /// Wraps a raw 8-bit word
    pub const fn new(value: u8) -> Self {
        Codeword(value)
    }

    /// Reads exactly 8 bits, most significant first.
    pub fn from_bits(bits: &Bits) -> Result<Self> {
        if bits.len() != CODEWORD_BITS {
            return Err(Error::InvalidInput(format!(
                "Expected {} bits for a codeword, got {}",
                CODEWORD_BITS,
                bits.len()
            )));
        }
        Ok(Codeword(load_msb_first(bits)))
    }

    /// Get the raw value of this codeword
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Bit at `position`, where position 0 is `p1`. Positions past the
    /// last bit read as `false`.
    pub fn bit(&self, position: usize) -> bool {
        position < CODEWORD_BITS && self.0 & (0x80 >> position) != 0
    }

    /// Returns a copy with the bit at `position` inverted. Positions past
    /// the last bit leave the word unchanged.
    pub fn flipped(&self, position: usize) -> Self {
        if position >= CODEWORD_BITS {
            return *self;
        }
        Codeword(self.0 ^ (0x80 >> position))
    }

    /// The data bits stored at positions 2, 4, 5 and 6.
    pub const fn data(&self) -> Nibble {
        let d1 = (self.0 >> 5) & 1;
        let d2 = (self.0 >> 3) & 1;
        let d3 = (self.0 >> 2) & 1;
        let d4 = (self.0 >> 1) & 1;
        Nibble((d1 << 3) | (d2 << 2) | (d3 << 1) | d4)
    }

    /// Number of bit positions at which the two words differ
    pub const fn distance(&self, other: Codeword) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

/// The valid codewords of the extended Hamming(8,4) code, indexed by the
/// nibble they encode.
#[derive(Debug)]
pub struct Codebook {
    entries: [Codeword; CODEBOOK_SIZE],
}

/// Process-wide codebook, computed at compile time from the parity rules
pub static CODEBOOK: Codebook = Codebook::build();

impl Codebook {
    const fn build() -> Self {
        let mut entries = [Codeword(0); CODEBOOK_SIZE];
        let mut i = 0;
        while i < CODEBOOK_SIZE {
            entries[i] = Codeword(encode_value(i as u8));
            i += 1;
        }
        Codebook { entries }
    }

    /// Codeword for `nibble`
    pub fn get(&self, nibble: Nibble) -> Codeword {
        self.entries[nibble.value() as usize]
    }

    /// Entries in table order
    pub fn entries(&self) -> &[Codeword; CODEBOOK_SIZE] {
        &self.entries
    }

    /// `(nibble, codeword)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (Nibble, Codeword)> + '_ {
        Nibble::all().zip(self.entries.iter().copied())
    }

    /// Nibble encoded by `codeword`, if it is a valid codeword.
    pub fn position(&self, codeword: Codeword) -> Option<Nibble> {
        self.iter()
            .find(|&(_, entry)| entry == codeword)
            .map(|(nibble, _)| nibble)
    }

    pub const fn len(&self) -> usize {
        CODEBOOK_SIZE
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_TABLE: [&str; 16] = [
        "00000000", "11010010", "01010101", "10000111", "10011001", "01001011", "11001100",
        "00011110", "11100001", "00110011", "10110100", "01100110", "01111000", "10101010",
        "00101101", "11111111",
    ];

    #[test]
    fn test_codebook_matches_known_table() {
        assert_eq!(CODEBOOK.len(), 16);
        for (entry, expected) in CODEBOOK.entries().iter().zip(KNOWN_TABLE) {
            assert_eq!(entry.to_string(), expected);
        }
    }

    #[test]
    fn test_codebook_entries_carry_their_index() {
        for (nibble, codeword) in CODEBOOK.iter() {
            assert_eq!(codeword.data(), nibble);
            assert_eq!(CODEBOOK.get(nibble), codeword);
            assert_eq!(CODEBOOK.position(codeword), Some(nibble));
        }
        assert_eq!(CODEBOOK.position(Codeword::new(0b0000_0001)), None);
    }

    #[test]
    fn test_minimum_distance_is_four() {
        let entries = CODEBOOK.entries();
        for i in 0..entries.len() {
            for j in i + 1..entries.len() {
                assert!(entries[i].distance(entries[j]) >= 4);
            }
        }
    }

    #[test]
    fn test_nibble_bounds() {
        assert_eq!(Nibble::new(15).unwrap().value(), 15);
        assert!(Nibble::new(16).is_err());
        assert_eq!(Nibble::from_low_bits(0xF6).value(), 6);
        assert_eq!(Nibble::from_low_bits(6).to_string(), "0110");
        assert_eq!(Nibble::all().count(), 16);
    }

    #[test]
    fn test_codeword_bits() {
        let codeword = Codeword::new(0b1100_1100);
        assert!(codeword.bit(0));
        assert!(!codeword.bit(2));
        assert!(!codeword.bit(8));
        assert_eq!(codeword.flipped(7), Codeword::new(0b1100_1101));
        assert_eq!(codeword.flipped(9), codeword);
        assert_eq!(codeword.data(), Nibble::from_low_bits(0b0110));
        assert_eq!(codeword.distance(Codeword::new(0)), 4);

        let bits = crate::cs::ecc::hamming::bits::parse_bit_text("11001100").unwrap();
        assert_eq!(Codeword::from_bits(&bits).unwrap(), codeword);
        assert!(Codeword::from_bits(&bits[..7]).is_err());
    }
}
