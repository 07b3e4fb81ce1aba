//! Aho-Corasick automaton over a fixed alphabet.
//!
//! An automaton has two phases. While building, patterns are inserted into a
//! trie. [`Automaton::build`] then computes suffix links, up-links and the
//! full goto function in one breadth-first pass, after which the automaton is
//! read-only and only answers transition and match-count queries.
//!
//! # Layout
//!
//! All states live in one arena and refer to each other by index:
//! - `nodes`: per-state links and counters
//! - `children`: trie edges, `A::SIZE` slots per state, `NO_STATE` if absent
//! - `transitions`: goto function, `A::SIZE` slots per state, filled by `build`

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use crate::alphabet::{self, Alphabet, Lowercase};
use crate::error::{Error, Result};

/// Caller-chosen identifier of an inserted pattern.
pub type PatternId = u32;

const NO_STATE: u32 = u32::MAX;

/// Index of an automaton state.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateId(u32);

impl StateId {
    /// The root state (empty prefix).
    pub const ROOT: StateId = StateId(0);

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node {
    suffix_link: u32,
    /// Nearest terminal state strictly below on the suffix chain, root if none.
    up_link: u32,
    /// Patterns ending exactly here.
    terminal: u32,
    /// Patterns ending here or at any state on the suffix chain. Equal to
    /// `terminal` until `build` runs.
    matches: u64,
    pattern_id: Option<PatternId>,
}

impl Node {
    fn new() -> Self {
        Self {
            suffix_link: 0,
            up_link: 0,
            terminal: 0,
            matches: 0,
            pattern_id: None,
        }
    }
}

/// A pattern occurrence reported by [`Automaton::find_all`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Match {
    /// Exclusive end offset of the occurrence in the text.
    pub end: usize,
    /// Identifier recorded for the pattern ending at the matched state.
    pub pattern: Option<PatternId>,
    /// State the pattern ends at; its depth is the pattern length.
    pub state: StateId,
}

/// Aho-Corasick automaton for counting pattern occurrences.
pub struct Automaton<A: Alphabet = Lowercase> {
    nodes: Vec<Node>,
    children: Vec<u32>,
    transitions: Vec<u32>,
    depths: Vec<u32>,
    patterns: usize,
    built: bool,
    _alphabet: PhantomData<A>,
}

impl<A: Alphabet> Automaton<A> {
    /// Empty automaton holding only the root, ready for [`add_pattern`](Self::add_pattern).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            children: vec![NO_STATE; A::SIZE],
            transitions: Vec::new(),
            depths: vec![0],
            patterns: 0,
            built: false,
            _alphabet: PhantomData,
        }
    }

    /// Build an automaton over `patterns`, numbering them from 0 in order.
    pub fn from_patterns<I, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut automaton = Self::new();
        for (id, pattern) in patterns.into_iter().enumerate() {
            automaton.add_pattern(pattern.as_ref(), id as PatternId)?;
        }
        automaton.build();
        Ok(automaton)
    }

    /// Insert `pattern` into the trie and record `id` at its final state.
    ///
    /// Inserting the same pattern twice counts it twice; the later `id`
    /// replaces the earlier one.
    ///
    /// # Panics
    ///
    /// If the automaton has already been built.
    pub fn add_pattern(&mut self, pattern: &[u8], id: PatternId) -> Result<()> {
        assert!(
            !self.built,
            "Automaton::add_pattern called after build(); built automata are read-only"
        );
        let symbols = alphabet::encode::<A>(pattern)?;
        self.insert_symbols(&symbols, Some(id));
        Ok(())
    }

    /// Insert an already encoded pattern. The empty pattern ends at the root
    /// and matches once per text symbol.
    pub(crate) fn insert_symbols(&mut self, symbols: &[u8], id: Option<PatternId>) {
        debug_assert!(!self.built);

        let mut v = 0usize;
        for &s in symbols {
            let slot = v * A::SIZE + s as usize;
            let next = self.children[slot];
            v = if next == NO_STATE {
                let new = self.nodes.len();
                self.nodes.push(Node::new());
                self.children.resize(self.children.len() + A::SIZE, NO_STATE);
                self.depths.push(self.depths[v] + 1);
                self.children[slot] = new as u32;
                new
            } else {
                next as usize
            };
        }

        let node = &mut self.nodes[v];
        node.terminal += 1;
        node.matches += 1;
        if id.is_some() {
            node.pattern_id = id;
        }
        self.patterns += 1;
    }

    /// Compute suffix links, up-links, cumulative match counts and the goto
    /// function. States are processed in breadth-first order so that a
    /// state's suffix link target is final before the state itself is visited.
    ///
    /// # Panics
    ///
    /// If called twice.
    pub fn build(&mut self) {
        assert!(!self.built, "Automaton::build called twice");

        let n = A::SIZE;
        self.transitions = vec![0; self.nodes.len() * n];
        let mut queue = VecDeque::new();

        // Depth-1 states link to the root; missing root edges loop back to it.
        for c in 0..n {
            let child = self.children[c];
            if child != NO_STATE {
                self.transitions[c] = child;
                self.nodes[child as usize].suffix_link = 0;
                queue.push_back(child as usize);
            }
        }

        while let Some(v) = queue.pop_front() {
            let u = self.nodes[v].suffix_link as usize;

            // Own terminal count, not the cumulative one: up-links must land on
            // states where a pattern ends.
            self.nodes[v].up_link = if self.nodes[u].terminal > 0 {
                u as u32
            } else {
                self.nodes[u].up_link
            };
            self.nodes[v].matches += self.nodes[u].matches;

            for c in 0..n {
                let inherited = self.transitions[u * n + c];
                let child = self.children[v * n + c];
                if child != NO_STATE {
                    self.transitions[v * n + c] = child;
                    self.nodes[child as usize].suffix_link = inherited;
                    queue.push_back(child as usize);
                } else {
                    self.transitions[v * n + c] = inherited;
                }
            }
        }

        self.built = true;
        trace!(
            states = self.nodes.len(),
            patterns = self.patterns,
            "automaton built"
        );
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[inline]
    pub fn root(&self) -> StateId {
        StateId::ROOT
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of inserted patterns, duplicates included.
    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.patterns
    }

    /// Length of the trie path leading to `state`.
    #[inline]
    pub fn depth(&self, state: StateId) -> usize {
        self.depths[state.as_usize()] as usize
    }

    /// Follow the goto function from `state` on symbol index `symbol`.
    ///
    /// # Panics
    ///
    /// If the automaton is not built, or `symbol >= A::SIZE`.
    #[inline]
    pub fn step(&self, state: StateId, symbol: u8) -> StateId {
        self.assert_built("step");
        assert!((symbol as usize) < A::SIZE, "symbol index out of range");
        StateId(self.transitions[state.as_usize() * A::SIZE + symbol as usize])
    }

    /// Number of pattern occurrences ending when the automaton enters `state`.
    ///
    /// # Panics
    ///
    /// If the automaton is not built.
    #[inline]
    pub fn matches_ending_here(&self, state: StateId) -> u64 {
        self.assert_built("matches_ending_here");
        self.nodes[state.as_usize()].matches
    }

    /// # Panics
    ///
    /// If the automaton is not built.
    #[inline]
    pub fn suffix_link(&self, state: StateId) -> StateId {
        self.assert_built("suffix_link");
        StateId(self.nodes[state.as_usize()].suffix_link)
    }

    /// Nearest terminal state on the suffix chain of `state`, excluding
    /// `state` itself. The root stands for "none" unless the empty pattern
    /// was inserted.
    ///
    /// # Panics
    ///
    /// If the automaton is not built.
    #[inline]
    pub fn up_link(&self, state: StateId) -> StateId {
        self.assert_built("up_link");
        StateId(self.nodes[state.as_usize()].up_link)
    }

    #[inline]
    pub fn pattern_id(&self, state: StateId) -> Option<PatternId> {
        self.nodes[state.as_usize()].pattern_id
    }

    /// Patterns ending exactly at `state`, not counting suffixes.
    #[inline]
    pub fn terminal_count(&self, state: StateId) -> u32 {
        self.nodes[state.as_usize()].terminal
    }

    /// Terminal states on the suffix chain of `state`, longest first.
    ///
    /// # Panics
    ///
    /// If the automaton is not built.
    pub fn terminals(&self, state: StateId) -> Terminals<'_, A> {
        self.assert_built("terminals");
        let node = &self.nodes[state.as_usize()];
        let next = if node.terminal > 0 {
            Some(state.0)
        } else if state != StateId::ROOT {
            self.terminal_or_none(node.up_link)
        } else {
            None
        };
        Terminals {
            automaton: self,
            next,
        }
    }

    /// `up` unless it is the root and no empty pattern ends there.
    #[inline]
    fn terminal_or_none(&self, up: u32) -> Option<u32> {
        (up != 0 || self.nodes[0].terminal > 0).then_some(up)
    }

    /// Total occurrences of all patterns in `text`, with multiplicity.
    ///
    /// # Panics
    ///
    /// If the automaton is not built.
    pub fn count(&self, text: &[u8]) -> Result<u64> {
        self.assert_built("count");
        let mut state = StateId::ROOT;
        let mut total = 0u64;
        for (position, &byte) in text.iter().enumerate() {
            let symbol = A::index(byte).ok_or(Error::InvalidSymbol {
                byte,
                position,
                alphabet: A::NAME,
            })?;
            state = self.step(state, symbol);
            total += self.matches_ending_here(state);
        }
        Ok(total)
    }

    /// Count over an already encoded text.
    pub(crate) fn count_symbols(&self, symbols: &[u8]) -> u64 {
        let n = A::SIZE;
        let mut v = 0usize;
        let mut total = 0u64;
        for &s in symbols {
            v = self.transitions[v * n + s as usize] as usize;
            total += self.nodes[v].matches;
        }
        total
    }

    /// Every occurrence in `text`, one entry per terminal state reached.
    ///
    /// Duplicate insertions of a pattern share a state and are reported once
    /// per position; use [`terminal_count`](Self::terminal_count) for their
    /// multiplicity.
    ///
    /// # Panics
    ///
    /// If the automaton is not built.
    pub fn find_all(&self, text: &[u8]) -> Result<Vec<Match>> {
        self.assert_built("find_all");
        let symbols = alphabet::encode::<A>(text)?;
        let mut out = Vec::new();
        let mut state = StateId::ROOT;
        for (i, &s) in symbols.iter().enumerate() {
            state = self.step(state, s);
            out.extend(self.terminals(state).map(|t| Match {
                end: i + 1,
                pattern: self.pattern_id(t),
                state: t,
            }));
        }
        Ok(out)
    }

    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
            + self.children.capacity() * 4
            + self.transitions.capacity() * 4
            + self.depths.capacity() * 4
    }

    #[inline]
    fn assert_built(&self, op: &str) {
        assert!(
            self.built,
            "Automaton::{op} called before build(); the goto function is not computed yet"
        );
    }
}

impl<A: Alphabet> Default for Automaton<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alphabet> Clone for Automaton<A> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            children: self.children.clone(),
            transitions: self.transitions.clone(),
            depths: self.depths.clone(),
            patterns: self.patterns,
            built: self.built,
            _alphabet: PhantomData,
        }
    }
}

impl<A: Alphabet> fmt::Debug for Automaton<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("alphabet", &A::NAME)
            .field("states", &self.nodes.len())
            .field("patterns", &self.patterns)
            .field("built", &self.built)
            .finish()
    }
}

/// Iterator returned by [`Automaton::terminals`].
pub struct Terminals<'a, A: Alphabet> {
    automaton: &'a Automaton<A>,
    next: Option<u32>,
}

impl<A: Alphabet> Iterator for Terminals<'_, A> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.next?;
        self.next = if current == 0 {
            None
        } else {
            let up = self.automaton.nodes[current as usize].up_link;
            self.automaton.terminal_or_none(up)
        };
        Some(StateId(current))
    }
}
