//! Fixed symbol alphabets.
//!
//! The alphabet is chosen at compile time through a type parameter. Every
//! automaton node carries one transition slot per symbol, so small alphabets
//! keep the node arena compact.

use crate::error::{Error, Result};

/// A fixed, dense alphabet of at most 256 symbols.
///
/// Implementations map raw bytes to symbol indices in `0..SIZE` and back.
/// `index(symbol(i)) == Some(i)` must hold for every `i < SIZE`.
pub trait Alphabet: 'static {
    /// Number of symbols; also the per-node transition fan-out.
    const SIZE: usize;
    /// Human-readable name used in error messages.
    const NAME: &'static str;

    /// Symbol index of `byte`, or `None` if it is not part of the alphabet.
    fn index(byte: u8) -> Option<u8>;

    /// Byte for the symbol at `index`.
    fn symbol(index: u8) -> u8;
}

/// The 26 lowercase ASCII letters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lowercase;

impl Alphabet for Lowercase {
    const SIZE: usize = 26;
    const NAME: &'static str = "lowercase";

    #[inline]
    fn index(byte: u8) -> Option<u8> {
        byte.is_ascii_lowercase().then(|| byte - b'a')
    }

    #[inline]
    fn symbol(index: u8) -> u8 {
        debug_assert!((index as usize) < Self::SIZE);
        b'a' + index
    }
}

/// Nucleotide bases `A`, `C`, `G`, `T` (uppercase only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dna;

impl Alphabet for Dna {
    const SIZE: usize = 4;
    const NAME: &'static str = "dna";

    #[inline]
    fn index(byte: u8) -> Option<u8> {
        match byte {
            b'A' => Some(0),
            b'C' => Some(1),
            b'G' => Some(2),
            b'T' => Some(3),
            _ => None,
        }
    }

    #[inline]
    fn symbol(index: u8) -> u8 {
        const BASES: [u8; 4] = *b"ACGT";
        BASES[index as usize]
    }
}

/// Map `bytes` to symbol indices, rejecting the first byte outside `A`.
pub fn encode<A: Alphabet>(bytes: &[u8]) -> Result<Vec<u8>> {
    bytes
        .iter()
        .enumerate()
        .map(|(position, &byte)| {
            A::index(byte).ok_or(Error::InvalidSymbol {
                byte,
                position,
                alphabet: A::NAME,
            })
        })
        .collect()
}

/// Inverse of [`encode`].
pub fn decode<A: Alphabet>(symbols: &[u8]) -> Vec<u8> {
    symbols.iter().map(|&s| A::symbol(s)).collect()
}
