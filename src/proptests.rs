use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

fn naive_count(patterns: &[Vec<u8>], text: &[u8]) -> u64 {
    let mut total = 0u64;
    for p in patterns {
        for start in 0..text.len() {
            if text[start..].starts_with(p) {
                total += 1;
            }
        }
    }
    total
}

/// Layer `i` is empty or holds `2^i` patterns, and together the layers hold
/// exactly the added multiset.
fn validate_index(index: &DynamicIndex, added: &[Vec<u8>]) {
    let mut held: Vec<Vec<u8>> = Vec::new();
    for layer in index.layers() {
        if layer.is_empty() {
            assert_eq!(layer.len(), 0, "empty layer {} holds patterns", layer.level());
            assert!(layer.automaton().is_none());
            continue;
        }
        assert_eq!(
            layer.len(),
            1 << layer.level(),
            "layer {} must hold 2^{} patterns",
            layer.level(),
            layer.level()
        );
        let automaton = layer.automaton().expect("non-empty layer has an automaton");
        assert!(automaton.is_built());
        assert_eq!(automaton.pattern_count(), layer.len());
        held.extend(layer.patterns());
    }
    assert!(
        index.layers().last().map_or(true, |l| !l.is_empty()),
        "topmost layer must be built"
    );

    let mut expected = added.to_vec();
    held.sort();
    expected.sort();
    assert_eq!(held, expected, "layers must hold exactly the added patterns");
    assert_eq!(index.len(), added.len());
}

fn word(symbols: u8, max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(b'a'..b'a' + symbols, 0..=max_len)
}

fn text(symbols: u8) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(b'a'..b'a' + symbols, 0..=12)
}

fn op_word() -> impl Strategy<Value = Vec<u8>> {
    word(3, 4)
}

fn op_text() -> impl Strategy<Value = Vec<u8>> {
    text(3)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 2)]
    Add(#[proptest(strategy = "op_word()")] Vec<u8>),
    Count(#[proptest(strategy = "op_text()")] Vec<u8>),
}

/// Alphabet size, pattern set and text over `a..a+k` for `k` in `2..=4`.
fn case_strategy() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<u8>)> {
    (2u8..=4).prop_flat_map(|k| (prop::collection::vec(word(k, 12), 0..=20), text(k)))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_count_matches_naive((patterns, text) in case_strategy()) {
        let mut index: DynamicIndex = DynamicIndex::new();
        for p in &patterns {
            index.add(p).unwrap();
        }
        validate_index(&index, &patterns);
        prop_assert_eq!(index.count(&text).unwrap(), naive_count(&patterns, &text));
    }

    #[test]
    fn prop_equivalence_ops(ops in prop::collection::vec(any::<Op>(), 0..=200)) {
        let mut index: DynamicIndex = DynamicIndex::new();
        let mut added: Vec<Vec<u8>> = Vec::new();

        for op in ops {
            match op {
                Op::Add(p) => {
                    index.add(&p).unwrap();
                    added.push(p);
                }
                Op::Count(t) => {
                    let got = index.count(&t).unwrap();
                    prop_assert_eq!(got, naive_count(&added, &t));
                    // querying leaves no trace
                    prop_assert_eq!(index.count(&t).unwrap(), got);
                }
            }
        }

        validate_index(&index, &added);
    }

    #[test]
    fn prop_count_monotone_in_adds(
        patterns in prop::collection::vec(op_word(), 0..=40),
        text in op_text(),
    ) {
        let mut index: DynamicIndex = DynamicIndex::new();
        let mut prev = index.count(&text).unwrap();
        for p in &patterns {
            index.add(p).unwrap();
            let now = index.count(&text).unwrap();
            prop_assert!(now >= prev, "count dropped from {} to {}", prev, now);
            prev = now;
        }
    }

    #[test]
    fn prop_rebuild_cost_is_logarithmic(patterns in prop::collection::vec(word(4, 12), 1..=200)) {
        let mut index: DynamicIndex = DynamicIndex::new();
        index.extend_patterns(&patterns).unwrap();

        let n = patterns.len();
        let total: u64 = patterns.iter().map(|p| p.len() as u64).sum();
        // A pattern climbs at most to layer floor(log2 n).
        let levels = u64::from(usize::BITS - n.leading_zeros());
        let spent = index.stats().rebuild_symbols;
        prop_assert!(spent >= total);
        prop_assert!(spent <= total * levels, "spent {} > {} * {}", spent, total, levels);
    }

    #[test]
    fn prop_difference_matches_naive(
        inserted in prop::collection::vec(op_word(), 0..=30),
        removed_mask in prop::collection::vec(any::<bool>(), 30),
        text in op_text(),
    ) {
        let mut set: DifferenceIndex = DifferenceIndex::new();
        let mut live = Vec::new();
        for (p, &drop) in inserted.iter().zip(&removed_mask) {
            set.insert(p).unwrap();
            if drop {
                set.remove(p).unwrap();
            } else {
                live.push(p.clone());
            }
        }
        prop_assert_eq!(set.count(&text).unwrap(), i128::from(naive_count(&live, &text)));
    }
}

#[test]
fn exhaustive_small_pattern_sets() {
    // every pattern over {a, b} of length 1..=3
    let mut words: Vec<Vec<u8>> = Vec::new();
    for len in 1..=3u32 {
        for bits in 0..(1u32 << len) {
            words.push((0..len).map(|i| b'a' + ((bits >> i) & 1) as u8).collect());
        }
    }

    let texts: [&[u8]; 4] = [b"", b"abba", b"aaabbb", b"babababa"];
    let mut index: DynamicIndex = DynamicIndex::new();
    for (i, w) in words.iter().enumerate() {
        index.add(w).unwrap();
        validate_index(&index, &words[..=i]);
        for t in texts {
            assert_eq!(index.count(t).unwrap(), naive_count(&words[..=i], t));
        }
    }
}
