//! # dynaho
//!
//! Insertion-only multi-pattern substring counting.
//!
//! Patterns are kept in a sequence of Aho-Corasick automata whose sizes are
//! distinct powers of two, mirroring the set bits of a binary counter. Adding
//! a pattern rebuilds only the layers involved in the carry, so inserting `N`
//! patterns of total length `L` costs `O(L log N)` symbol insertions overall,
//! and counting over a text of length `T` costs `O(T log N)`.
//!
//! ## Example
//!
//! ```rust
//! use dynaho::DynamicIndex;
//!
//! let mut index: DynamicIndex = DynamicIndex::new();
//! index.add(b"he").unwrap();
//! index.add(b"she").unwrap();
//! index.add(b"hers").unwrap();
//!
//! // "she", "he" and "hers" all occur in "ushers"
//! assert_eq!(index.count(b"ushers").unwrap(), 3);
//!
//! // Out-of-alphabet input is rejected, not skipped.
//! assert!(index.count(b"USHERS").is_err());
//! ```
//!
//! The index is not synchronized: `add` takes `&mut self` and `count` takes
//! `&self`, so sharing one across threads needs an external lock.

pub mod alphabet;
pub mod automaton;
pub mod difference;
pub mod error;
pub mod index;

pub use alphabet::{Alphabet, Dna, Lowercase};
pub use automaton::{Automaton, Match, PatternId, StateId};
pub use difference::DifferenceIndex;
pub use error::{Error, Result};
pub use index::{DynamicIndex, IndexStats, LayerView};


#[cfg(test)]
mod proptests;
