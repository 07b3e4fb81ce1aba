//! Insertion-only pattern index built from power-of-two automaton layers.
//!
//! Layer `i` is either empty or holds exactly `2^i` patterns compiled into one
//! [`Automaton`]. Adding a pattern works like incrementing a binary counter:
//! the new pattern and every pattern from the run of non-empty layers starting
//! at layer 0 are merged into the first empty layer, whose automaton is built
//! from scratch. A pattern only ever moves upward, so over `N` insertions it is
//! compiled into at most `floor(log2 N) + 1` automata.
//!
//! Queries run the text through every non-empty layer independently and sum
//! the per-layer counts.

use std::fmt;

use tracing::{debug, trace};

use crate::alphabet::{self, Alphabet, Lowercase};
use crate::automaton::Automaton;
use crate::error::Result;

/// One slot of the binary counter.
struct Layer<A: Alphabet> {
    /// Encoded patterns. Empty iff `automaton` is `None`.
    patterns: Vec<Box<[u8]>>,
    automaton: Option<Automaton<A>>,
}

impl<A: Alphabet> Layer<A> {
    fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            automaton: None,
        }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.automaton.is_none()
    }

    /// Take this layer's patterns, dropping its automaton.
    fn drain(&mut self) -> Vec<Box<[u8]>> {
        self.automaton = None;
        std::mem::take(&mut self.patterns)
    }
}

impl<A: Alphabet> Clone for Layer<A> {
    fn clone(&self) -> Self {
        Self {
            patterns: self.patterns.clone(),
            automaton: self.automaton.clone(),
        }
    }
}

/// Read-only view of one layer, returned by [`DynamicIndex::layers`].
pub struct LayerView<'a, A: Alphabet> {
    level: usize,
    layer: &'a Layer<A>,
}

impl<'a, A: Alphabet> LayerView<'a, A> {
    /// Position in the layer sequence; a non-empty layer holds `2^level` patterns.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layer.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layer.is_empty()
    }

    /// Automaton state count, 0 for an empty layer.
    pub fn states(&self) -> usize {
        self.layer
            .automaton
            .as_ref()
            .map_or(0, Automaton::state_count)
    }

    pub fn automaton(&self) -> Option<&'a Automaton<A>> {
        self.layer.automaton.as_ref()
    }

    /// Patterns held by this layer, in merge order.
    pub fn patterns(&self) -> impl Iterator<Item = Vec<u8>> + 'a {
        self.layer.patterns.iter().map(|p| alphabet::decode::<A>(p))
    }
}

/// Size and cost counters for a [`DynamicIndex`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Patterns added, duplicates included.
    pub patterns: usize,
    /// Layer slots allocated, empty ones included.
    pub layers: usize,
    /// Layers currently holding an automaton.
    pub built_layers: usize,
    /// Automaton states across all built layers.
    pub states: usize,
    /// Pattern symbols fed into automata by every rebuild so far.
    pub rebuild_symbols: u64,
}

/// Multi-pattern substring counter supporting pattern insertion.
///
/// # Example
///
/// ```rust
/// use dynaho::DynamicIndex;
///
/// let mut index: DynamicIndex = DynamicIndex::new();
/// index.add(b"a").unwrap();
/// index.add(b"b").unwrap();
/// assert_eq!(index.count(b"ab").unwrap(), 2);
///
/// index.add(b"ab").unwrap();
/// assert_eq!(index.count(b"ab").unwrap(), 3);
/// ```
pub struct DynamicIndex<A: Alphabet = Lowercase> {
    layers: Vec<Layer<A>>,
    count: usize,
    rebuild_symbols: u64,
}

impl<A: Alphabet> DynamicIndex<A> {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            count: 0,
            rebuild_symbols: 0,
        }
    }

    /// Number of patterns added, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of layer slots, empty ones included.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Add `pattern`. Adding a pattern again counts it again.
    ///
    /// The index is unchanged if the pattern is rejected.
    pub fn add(&mut self, pattern: &[u8]) -> Result<()> {
        let symbols = Self::encode_pattern(pattern)?;
        self.insert_encoded(symbols);
        Ok(())
    }

    /// Add every pattern of `patterns`, or none of them if any is rejected.
    pub fn extend_patterns<I, P>(&mut self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let encoded = patterns
            .into_iter()
            .map(|p| Self::encode_pattern(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        for symbols in encoded {
            self.insert_encoded(symbols);
        }
        Ok(())
    }

    /// Total occurrences of all added patterns as substrings of `text`,
    /// summed over start positions and patterns.
    pub fn count(&self, text: &[u8]) -> Result<u64> {
        let symbols = alphabet::encode::<A>(text)?;
        let mut layers = 0usize;
        let mut total = 0u64;
        for automaton in self.layers.iter().filter_map(|l| l.automaton.as_ref()) {
            total += automaton.count_symbols(&symbols);
            layers += 1;
        }
        trace!(text_len = text.len(), layers, matches = total, "count");
        Ok(total)
    }

    /// Every layer slot, least significant first.
    pub fn layers(&self) -> impl Iterator<Item = LayerView<'_, A>> + '_ {
        self.layers
            .iter()
            .enumerate()
            .map(|(level, layer)| LayerView { level, layer })
    }

    /// Every added pattern, grouped by layer.
    pub fn patterns(&self) -> impl Iterator<Item = Vec<u8>> + '_ {
        self.layers
            .iter()
            .flat_map(|l| l.patterns.iter())
            .map(|p| alphabet::decode::<A>(p))
    }

    pub fn stats(&self) -> IndexStats {
        let built = self.layers.iter().filter_map(|l| l.automaton.as_ref());
        IndexStats {
            patterns: self.count,
            layers: self.layers.len(),
            built_layers: built.clone().count(),
            states: built.map(Automaton::state_count).sum(),
            rebuild_symbols: self.rebuild_symbols,
        }
    }

    pub fn memory_usage(&self) -> usize {
        self.layers
            .iter()
            .map(|l| {
                l.patterns.iter().map(|p| p.len()).sum::<usize>()
                    + l.patterns.capacity() * std::mem::size_of::<Box<[u8]>>()
                    + l.automaton.as_ref().map_or(0, Automaton::memory_usage)
            })
            .sum()
    }

    /// Drop every layer and reset all counters.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.count = 0;
        self.rebuild_symbols = 0;
    }

    fn encode_pattern(pattern: &[u8]) -> Result<Box<[u8]>> {
        Ok(alphabet::encode::<A>(pattern)?.into_boxed_slice())
    }

    /// Carry `symbols` up through the non-empty layers and build the first
    /// empty one.
    fn insert_encoded(&mut self, symbols: Box<[u8]>) {
        let mut carry = vec![symbols];
        let mut level = 0usize;
        while level < self.layers.len() && !self.layers[level].is_empty() {
            carry.append(&mut self.layers[level].drain());
            level += 1;
        }
        if level == self.layers.len() {
            self.layers.push(Layer::empty());
        }
        debug_assert_eq!(carry.len(), 1 << level);

        let mut automaton = Automaton::new();
        for p in &carry {
            automaton.insert_symbols(p, None);
            self.rebuild_symbols += p.len() as u64;
        }
        automaton.build();

        debug!(
            layer = level,
            patterns = carry.len(),
            states = automaton.state_count(),
            merged_layers = level,
            "layer rebuilt"
        );

        let layer = &mut self.layers[level];
        layer.patterns = carry;
        layer.automaton = Some(automaton);
        self.count += 1;
    }
}

impl<A: Alphabet> Default for DynamicIndex<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alphabet> Clone for DynamicIndex<A> {
    fn clone(&self) -> Self {
        Self {
            layers: self.layers.clone(),
            count: self.count,
            rebuild_symbols: self.rebuild_symbols,
        }
    }
}

impl<A: Alphabet> fmt::Debug for DynamicIndex<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<usize> = self.layers.iter().map(|l| l.patterns.len()).collect();
        f.debug_struct("DynamicIndex")
            .field("alphabet", &A::NAME)
            .field("patterns", &self.count)
            .field("layers", &sizes)
            .finish()
    }
}
