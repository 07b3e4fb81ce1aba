//! Pattern sets with removal, built from two insertion-only indexes.
//!
//! Removed patterns go into a second [`DynamicIndex`] and their counts are
//! subtracted at query time. Nothing is ever deleted from either side.

use crate::alphabet::{Alphabet, Lowercase};
use crate::error::Result;
use crate::index::DynamicIndex;

/// Counts occurrences of inserted minus removed patterns.
///
/// Removing a pattern that was never inserted is not detected; it simply
/// subtracts its occurrences, so counts can go negative.
///
/// # Example
///
/// ```rust
/// use dynaho::DifferenceIndex;
///
/// let mut set: DifferenceIndex = DifferenceIndex::new();
/// set.insert(b"ab").unwrap();
/// set.insert(b"b").unwrap();
/// assert_eq!(set.count(b"abab").unwrap(), 4);
///
/// set.remove(b"b").unwrap();
/// assert_eq!(set.count(b"abab").unwrap(), 2);
/// ```
pub struct DifferenceIndex<A: Alphabet = Lowercase> {
    added: DynamicIndex<A>,
    removed: DynamicIndex<A>,
}

impl<A: Alphabet> DifferenceIndex<A> {
    pub fn new() -> Self {
        Self {
            added: DynamicIndex::new(),
            removed: DynamicIndex::new(),
        }
    }

    pub fn insert(&mut self, pattern: &[u8]) -> Result<()> {
        self.added.add(pattern)
    }

    pub fn remove(&mut self, pattern: &[u8]) -> Result<()> {
        self.removed.add(pattern)
    }

    /// Occurrences of inserted patterns minus occurrences of removed ones.
    ///
    /// Both sides are `u64`, so the difference always fits in `i128`.
    pub fn count(&self, text: &[u8]) -> Result<i128> {
        let added = self.added.count(text)?;
        let removed = self.removed.count(text)?;
        Ok(signed_difference(added, removed))
    }

    #[inline]
    pub fn added(&self) -> &DynamicIndex<A> {
        &self.added
    }

    #[inline]
    pub fn removed(&self) -> &DynamicIndex<A> {
        &self.removed
    }

    /// Net number of live patterns.
    pub fn len(&self) -> isize {
        self.added.len() as isize - self.removed.len() as isize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn signed_difference(added: u64, removed: u64) -> i128 {
    i128::from(added) - i128::from(removed)
}

impl<A: Alphabet> Default for DifferenceIndex<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alphabet> Clone for DifferenceIndex<A> {
    fn clone(&self) -> Self {
        Self {
            added: self.added.clone(),
            removed: self.removed.clone(),
        }
    }
}

impl<A: Alphabet> std::fmt::Debug for DifferenceIndex<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DifferenceIndex")
            .field("added", &self.added)
            .field("removed", &self.removed)
            .finish()
    }
}
