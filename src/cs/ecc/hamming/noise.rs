//! Channel noise simulation for exercising the decoder.
//!
//! Bits are flipped inside fixed-size chunks of an encoded stream. The
//! random source is always passed in, so a seeded generator reproduces the
//! same damage on every run.

use rand::seq::index;
use rand::Rng;

use super::bits::{BitString, Bits};
use super::CODEWORD_BITS;
use crate::cs::error::{Error, Result};

/// Preset noise patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseProfile {
    /// One flip per 16 bits, i.e. per encoded source byte. Some codewords
    /// stay clean and all damage is repairable.
    SingleBitPerByte,
    /// One flip in every codeword; every word is repairable.
    SingleBitPerCodeword,
    /// Two distinct flips in every codeword; no word is repairable.
    DoubleBitPerCodeword,
}

impl NoiseProfile {
    /// Chunk width the flips are spread over
    pub fn chunk_size(&self) -> usize {
        match self {
            NoiseProfile::SingleBitPerByte => 2 * CODEWORD_BITS,
            NoiseProfile::SingleBitPerCodeword | NoiseProfile::DoubleBitPerCodeword => {
                CODEWORD_BITS
            }
        }
    }

    /// Distinct flips per chunk
    pub fn flips(&self) -> usize {
        match self {
            NoiseProfile::DoubleBitPerCodeword => 2,
            _ => 1,
        }
    }

    /// Applies this profile to `bits`.
    pub fn apply<R: Rng + ?Sized>(&self, bits: &Bits, rng: &mut R) -> Result<BitString> {
        inject_errors(bits, self.chunk_size(), self.flips(), rng)
    }
}

/// Flips `flips` distinct, uniformly chosen bits in every complete chunk of
/// `chunk_size` bits. A trailing partial chunk is copied unchanged.
pub fn inject_errors<R: Rng + ?Sized>(
    bits: &Bits,
    chunk_size: usize,
    flips: usize,
    rng: &mut R,
) -> Result<BitString> {
    if chunk_size == 0 {
        return Err(Error::InvalidInput(
            "Chunk size must be positive".to_string(),
        ));
    }
    if flips > chunk_size {
        return Err(Error::InvalidInput(format!(
            "Cannot flip {} distinct bits in a chunk of {}",
            flips, chunk_size
        )));
    }

    let mut spoiled = bits.to_bitvec();
    for chunk in spoiled.chunks_exact_mut(chunk_size) {
        for position in index::sample(rng, chunk_size, flips).iter() {
            let bit = chunk[position];
            chunk.set(position, !bit);
        }
    }

    Ok(spoiled)
}

/// One random flip per chunk.
pub fn inject_single_error<R: Rng + ?Sized>(
    bits: &Bits,
    chunk_size: usize,
    rng: &mut R,
) -> Result<BitString> {
    inject_errors(bits, chunk_size, 1, rng)
}

/// Two distinct random flips per chunk.
pub fn inject_double_error<R: Rng + ?Sized>(
    bits: &Bits,
    chunk_size: usize,
    rng: &mut R,
) -> Result<BitString> {
    inject_errors(bits, chunk_size, 2, rng)
}

/// Flips the bits at the given absolute positions. A position listed twice
/// is flipped twice.
pub fn flip_bits(bits: &Bits, positions: &[usize]) -> Result<BitString> {
    let mut flipped = bits.to_bitvec();
    for &position in positions {
        if position >= flipped.len() {
            return Err(Error::InvalidInput(format!(
                "Bit position {} is out of range for {} bits",
                position,
                flipped.len()
            )));
        }
        let bit = flipped[position];
        flipped.set(position, !bit);
    }
    Ok(flipped)
}
