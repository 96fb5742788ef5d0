//! Build and pack benchmarks over a generated word list.
//!
//! Run with: `cargo bench --bench packing`
//! Save baseline: `cargo bench -- --save-baseline main`
//! Compare: `cargo bench -- --baseline main`

#[path = "../tests/fixtures/words.rs"]
mod words;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use packtrie::index::{PackConfig, Trie};
use packtrie::utils::extract_words;

fn bench_extract_words(c: &mut Criterion) {
    let text = words::generated_words().join("\n");

    c.bench_function("extract_words", |b| {
        b.iter(|| extract_words(black_box(&text)))
    });
}

fn bench_build(c: &mut Criterion) {
    let all = words::generated_words();

    let mut group = c.benchmark_group("build");
    group.sample_size(20);
    for size in [1_000, 10_000, all.len()] {
        let sample = &all[..size.min(all.len())];
        group.bench_with_input(BenchmarkId::new("insert_optimize", size), sample, |b, s| {
            b.iter(|| {
                let mut trie = Trie::from_words(black_box(s));
                trie.optimize();
                trie
            })
        });
    }
    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let all = words::generated_words();
    let mut trie = Trie::from_words(&all);
    trie.optimize();

    let mut group = c.benchmark_group("pack");
    group.sample_size(20);

    group.bench_function("with_symbols", |b| {
        let config = PackConfig::default();
        b.iter(|| trie.clone().pack_with_config(black_box(&config)))
    });

    group.bench_function("relative_only", |b| {
        let config = PackConfig::relative_only();
        b.iter(|| trie.clone().pack_with_config(black_box(&config)))
    });

    group.finish();
}

criterion_group!(benches, bench_extract_words, bench_build, bench_pack);
criterion_main!(benches);
