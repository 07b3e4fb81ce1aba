use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dynaho::{Automaton, DynamicIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_words(rng: &mut StdRng, n: usize, max_len: usize) -> Vec<Vec<u8>> {
    (0..n)
        .map(|_| {
            let len = rng.gen_range(1..=max_len);
            (0..len).map(|_| rng.gen_range(b'a'..=b'z')).collect()
        })
        .collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    let mut rng = StdRng::seed_from_u64(42);

    for n in [1_000usize, 10_000, 50_000] {
        let words = random_words(&mut rng, n, 16);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("dynamic", n), &words, |b, words| {
            b.iter(|| {
                let mut index: DynamicIndex = DynamicIndex::new();
                for w in words {
                    index.add(black_box(w)).unwrap();
                }
                index
            })
        });
    }
    group.finish();
}

fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count");
    let mut rng = StdRng::seed_from_u64(7);
    let text: Vec<u8> = (0..100_000).map(|_| rng.gen_range(b'a'..=b'z')).collect();
    group.throughput(Throughput::Bytes(text.len() as u64));

    for n in [1_000usize, 10_000] {
        let words = random_words(&mut rng, n, 8);

        let mut index: DynamicIndex = DynamicIndex::new();
        index.extend_patterns(&words).unwrap();
        group.bench_with_input(BenchmarkId::new("dynamic", n), &text, |b, text| {
            b.iter(|| index.count(black_box(text)).unwrap())
        });

        // single automaton over the same patterns, for the cost of layering
        let automaton: Automaton = Automaton::from_patterns(&words).unwrap();
        group.bench_with_input(BenchmarkId::new("static", n), &text, |b, text| {
            b.iter(|| automaton.count(black_box(text)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add, bench_count);
criterion_main!(benches);
