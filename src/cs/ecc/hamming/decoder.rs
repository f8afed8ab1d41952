//! Codeword classification and decoding.
//!
//! Each received 8-bit word is compared against [`CODEBOOK`] by Hamming
//! distance. Distance 0 is clean, distance 1 is repaired from the matching
//! entry, distance 2 is detected but cannot be repaired, and anything further
//! is reported as three or more errors. One unrepairable word rejects the
//! whole message.

use rayon::prelude::*;

use super::bits::{load_msb_first, push_msb_first, BitString, Bits};
use super::codebook::{Codeword, Nibble, CODEBOOK};
use super::{LengthPolicy, MatchStrategy, CODEWORD_BITS, NIBBLE_BITS};
use crate::cs::error::{Error, Result, UncorrectableKind};

/// Outcome of checking one received word against the codebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The word is a valid codeword
    Clean(Nibble),
    /// One bit was flipped at `position` (0 = `p1`); `nibble` comes from the
    /// repaired codeword
    Corrected { nibble: Nibble, position: usize },
    /// Two bits differ from the closest codeword
    DoubleError,
    /// No codeword lies within two bit flips
    TripleOrMoreError,
}

impl Classification {
    /// Recovered data, if the word was clean or repairable
    pub fn nibble(&self) -> Option<Nibble> {
        match *self {
            Classification::Clean(nibble) | Classification::Corrected { nibble, .. } => {
                Some(nibble)
            }
            _ => None,
        }
    }

    /// The kind of damage, if the word cannot be repaired
    pub fn uncorrectable(&self) -> Option<UncorrectableKind> {
        match self {
            Classification::DoubleError => Some(UncorrectableKind::DoubleError),
            Classification::TripleOrMoreError => Some(UncorrectableKind::TripleOrMoreError),
            _ => None,
        }
    }

    fn resolve(&self, index: usize) -> Result<Nibble> {
        match *self {
            Classification::Clean(nibble) | Classification::Corrected { nibble, .. } => Ok(nibble),
            Classification::DoubleError => Err(Error::Uncorrectable {
                index,
                kind: UncorrectableKind::DoubleError,
            }),
            Classification::TripleOrMoreError => Err(Error::Uncorrectable {
                index,
                kind: UncorrectableKind::TripleOrMoreError,
            }),
        }
    }
}

/// Classifies a received word with the given strategy.
pub fn classify(candidate: Codeword, strategy: MatchStrategy) -> Classification {
    match strategy {
        MatchStrategy::FirstMatch => classify_first_match(candidate),
        MatchStrategy::Nearest => classify_nearest(candidate),
    }
}

/// Stops at the first table entry within distance 2.
fn classify_first_match(candidate: Codeword) -> Classification {
    for &entry in CODEBOOK.entries() {
        match candidate.distance(entry) {
            0 => return Classification::Clean(candidate.data()),
            1 => return corrected(candidate, entry),
            2 => return Classification::DoubleError,
            _ => {}
        }
    }
    Classification::TripleOrMoreError
}

/// Picks the closest table entry; ties go to the lowest index.
fn classify_nearest(candidate: Codeword) -> Classification {
    let closest = CODEBOOK
        .entries()
        .iter()
        .map(|&entry| (entry, candidate.distance(entry)))
        .min_by_key(|&(_, distance)| distance);

    match closest {
        Some((_, 0)) => Classification::Clean(candidate.data()),
        Some((entry, 1)) => corrected(candidate, entry),
        Some((_, 2)) => Classification::DoubleError,
        _ => Classification::TripleOrMoreError,
    }
}

fn corrected(candidate: Codeword, entry: Codeword) -> Classification {
    let position = (candidate.value() ^ entry.value()).leading_zeros() as usize;
    Classification::Corrected {
        nibble: entry.data(),
        position,
    }
}

fn report(index: usize, candidate: Codeword, classification: &Classification) {
    if let Classification::Corrected { nibble, position } = classification {
        log::warn!(
            "codeword {} ({}): 1 bit error at position {}, corrected to data {}",
            index,
            candidate,
            position,
            nibble
        );
    } else if let Some(kind) = classification.uncorrectable() {
        log::warn!("codeword {} ({}): {}, cannot correct", index, candidate, kind);
    }
}

/// Decodes a codeword stream, calling `observer` with every classification.
///
/// Fails on the first word that cannot be repaired; no partial output is
/// returned in that case.
pub fn decode_bits<F>(
    bits: &Bits,
    strategy: MatchStrategy,
    policy: LengthPolicy,
    mut observer: F,
) -> Result<BitString>
where
    F: FnMut(usize, &Classification),
{
    let usable = policy.usable_len(bits.len(), CODEWORD_BITS)?;
    let mut decoded = BitString::with_capacity(usable / 2);
    let mut corrections = 0usize;

    for (index, chunk) in bits[..usable].chunks_exact(CODEWORD_BITS).enumerate() {
        let candidate = Codeword::new(load_msb_first(chunk));
        let classification = classify(candidate, strategy);

        report(index, candidate, &classification);
        observer(index, &classification);

        if matches!(classification, Classification::Corrected { .. }) {
            corrections += 1;
        }
        let nibble = classification.resolve(index)?;
        push_msb_first(&mut decoded, nibble.value(), NIBBLE_BITS);
    }

    log::debug!(
        "decoded {} codewords, {} corrected",
        usable / CODEWORD_BITS,
        corrections
    );
    Ok(decoded)
}

/// Same result as [`decode_bits`], with the codewords classified on the
/// rayon thread pool. Every word is classified before the earliest failure,
/// if any, is reported.
pub fn par_decode_bits(
    bits: &Bits,
    strategy: MatchStrategy,
    policy: LengthPolicy,
) -> Result<BitString> {
    let usable = policy.usable_len(bits.len(), CODEWORD_BITS)?;
    let candidates: Vec<Codeword> = bits[..usable]
        .chunks_exact(CODEWORD_BITS)
        .map(|chunk| Codeword::new(load_msb_first(chunk)))
        .collect();

    let classifications: Vec<Classification> = candidates
        .par_iter()
        .map(|&candidate| classify(candidate, strategy))
        .collect();

    let mut decoded = BitString::with_capacity(usable / 2);
    let mut corrections = 0usize;
    for (index, (candidate, classification)) in
        candidates.iter().zip(&classifications).enumerate()
    {
        report(index, *candidate, classification);
        if matches!(classification, Classification::Corrected { .. }) {
            corrections += 1;
        }
        let nibble = classification.resolve(index)?;
        push_msb_first(&mut decoded, nibble.value(), NIBBLE_BITS);
    }

    log::debug!(
        "decoded {} codewords, {} corrected",
        candidates.len(),
        corrections
    );
    Ok(decoded)
}
