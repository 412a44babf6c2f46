// Sequence buffer - One track's nucleotide string and its derived statistics
// Input is filtered to A/C/G/T, capped at MAX_BASES, and GC content is kept in sync

use super::codon::Codon;
use crate::error::{Result, SequencerError};
use std::fmt;

/// Hard cap on stored bases per track
pub const MAX_BASES: usize = 600;

/// Smallest sequence that can be installed (one full codon)
pub const MIN_BASES: usize = 3;

/// One nucleotide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parse a symbol, case-insensitive. Anything outside A/C/G/T is rejected.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' => Some(Base::T),
            _ => None,
        }
    }

    /// Uppercase ASCII symbol
    pub fn symbol(&self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }

    /// Next base in the mutation cycle A -> C -> G -> T -> A
    pub fn next(&self) -> Self {
        match self {
            Base::A => Base::C,
            Base::C => Base::G,
            Base::G => Base::T,
            Base::T => Base::A,
        }
    }

    pub fn is_gc(&self) -> bool {
        matches!(self, Base::G | Base::C)
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Validated base string for a single track
///
/// Every stored byte is one of `A`, `C`, `G`, `T`. The GC percentage is
/// recomputed on every change so readers never see a stale value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceBuffer {
    bases: String,
    gc_content: f64,
}

impl SequenceBuffer {
    /// Build a buffer from raw text.
    ///
    /// Non-nucleotide symbols are dropped, lowercase is normalised and the
    /// result is truncated to the first [`MAX_BASES`] bases. Fails with
    /// [`SequencerError::InvalidSequence`] when fewer than [`MIN_BASES`] remain.
    pub fn load(raw_text: &str) -> Result<Self> {
        let bases: String = raw_text
            .chars()
            .filter_map(Base::from_symbol)
            .take(MAX_BASES)
            .map(|base| base.symbol())
            .collect();

        if bases.len() < MIN_BASES {
            return Err(SequencerError::InvalidSequence { found: bases.len() });
        }

        let gc_content = compute_gc_content(&bases);
        Ok(Self { bases, gc_content })
    }

    /// Base string (uppercase A/C/G/T only)
    pub fn bases(&self) -> &str {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Base at `index`, if any
    pub fn base_at(&self, index: usize) -> Option<Base> {
        self.bases
            .as_bytes()
            .get(index)
            .and_then(|&byte| Base::from_symbol(byte as char))
    }

    /// GC percentage, rounded to one decimal (0 for an empty buffer)
    pub fn gc_content(&self) -> f64 {
        self.gc_content
    }

    /// Replace the base at `index`, returning the previous base
    pub fn mutate_at(&mut self, index: usize, new_base: Base) -> Result<Base> {
        let previous = self.base_at(index).ok_or(SequencerError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        let mut symbol = [0u8; 4];
        self.bases
            .replace_range(index..index + 1, new_base.symbol().encode_utf8(&mut symbol));
        self.gc_content = compute_gc_content(&self.bases);

        Ok(previous)
    }

    /// Advance the base at `index` one step through A -> C -> G -> T -> A.
    /// Returns the new base.
    pub fn cycle_base_at(&mut self, index: usize) -> Result<Base> {
        let current = self.base_at(index).ok_or(SequencerError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        let next = current.next();
        self.mutate_at(index, next)?;
        Ok(next)
    }

    /// Codon starting at `offset`, or None when fewer than 3 bases follow it
    pub fn codon_at(&self, offset: usize) -> Option<Codon> {
        let bytes = self.bases.as_bytes().get(offset..offset.checked_add(3)?)?;
        Codon::from_bytes(bytes)
    }

    /// Iterate over complete codons from the start of the buffer
    pub fn codons(&self) -> impl Iterator<Item = Codon> + '_ {
        self.bases.as_bytes().chunks_exact(3).filter_map(Codon::from_bytes)
    }

    /// Protein translation over complete codons (display only)
    pub fn translate(&self) -> String {
        self.codons()
            .map(|codon| codon.amino_acid().unwrap_or('-'))
            .collect()
    }
}

impl fmt::Display for SequenceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bases)
    }
}

/// GC percentage of an A/C/G/T string, rounded to one decimal
pub fn compute_gc_content(bases: &str) -> f64 {
    if bases.is_empty() {
        return 0.0;
    }

    let gc_count = bases
        .chars()
        .filter_map(Base::from_symbol)
        .filter(Base::is_gc)
        .count();

    let percent = gc_count as f64 / bases.len() as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}
