//! Conversions between bytes, bit strings and the `'0'`/`'1'` text form
//! used for persisted encoded streams.
//!
//! All conversions are most-significant-bit first: the byte `0x41` becomes
//! the bit string `01000001`.

use bitvec::prelude::*;

use crate::cs::error::{Error, Result};

/// Owned bit string, most significant bit of each storage byte first
pub type BitString = BitVec<u8, Msb0>;

/// Borrowed view of a [`BitString`]
pub type Bits = BitSlice<u8, Msb0>;

/// Converts a byte into its 8 bits, most significant first.
pub fn byte_to_bits(byte: u8) -> [bool; 8] {
    let mut bits = [false; 8];
    let mut mask: u8 = 1 << 7;
    let mut i = 0;

    while mask > 0 {
        bits[i] = byte & mask != 0;
        mask >>= 1;
        i += 1;
    }

    bits
}

/// Converts exactly 8 bits (most significant first) back into a byte.
pub fn bits_to_byte(bits: &Bits) -> Result<u8> {
    if bits.len() != 8 {
        return Err(Error::InvalidInput(format!(
            "Expected 8 bits for a byte, got {}",
            bits.len()
        )));
    }
    Ok(load_msb_first(bits))
}

/// Concatenates the bits of every byte in order.
pub fn bytes_to_bits(data: &[u8]) -> BitString {
    let mut bits = BitString::with_capacity(data.len() * 8);
    for &byte in data {
        bits.extend(byte_to_bits(byte));
    }
    bits
}

/// Regroups a bit string into bytes. The length must be a multiple of 8.
pub fn bits_to_bytes(bits: &Bits) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(Error::MalformedInput {
            len: bits.len(),
            chunk: 8,
        });
    }
    Ok(bits.chunks_exact(8).map(load_msb_first).collect())
}

/// Parses a string of `'0'` and `'1'` characters. ASCII whitespace is skipped
/// so that files ending in a newline are accepted.
pub fn parse_bit_text(text: &str) -> Result<BitString> {
    let mut bits = BitString::with_capacity(text.len());

    for (pos, c) in text.char_indices() {
        match c {
            '0' => bits.push(false),
            '1' => bits.push(true),
            c if c.is_ascii_whitespace() => continue,
            other => {
                return Err(Error::InvalidInput(format!(
                    "Unexpected character {:?} at offset {} in bit text",
                    other, pos
                )))
            }
        }
    }

    Ok(bits)
}

/// Renders a bit string as `'0'`/`'1'` characters.
pub fn to_bit_text(bits: &Bits) -> String {
    bits.iter()
        .by_vals()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}

/// Reads up to 8 bits as an unsigned value, first bit most significant.
pub(crate) fn load_msb_first(bits: &Bits) -> u8 {
    bits.iter()
        .by_vals()
        .fold(0u8, |acc, bit| (acc << 1) | u8::from(bit))
}

/// Appends the lowest `width` bits of `value`, most significant first.
pub(crate) fn push_msb_first(out: &mut BitString, value: u8, width: usize) {
    for shift in (0..width).rev() {
        out.push((value >> shift) & 1 == 1);
    }
}
