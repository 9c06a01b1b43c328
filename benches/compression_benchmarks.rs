//! Throughput of each estimator on compressible and noisy text.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lossless_metrics::lzw::LzwCostModel;
use lossless_metrics::{arithmetic, huffman, lzw, run_length, Analyzer, Input};

fn make_pattern(len: usize) -> Vec<char> {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn make_random(len: usize, mut seed: u32) -> Vec<char> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
        out.push(char::from(b' ' + ((seed >> 16) % 95) as u8));
    }
    out
}

fn bench_codecs(c: &mut Criterion) {
    let inputs = [
        ("pattern", make_pattern(4096)),
        ("random", make_random(4096, 0x1234_5678)),
    ];

    let mut group = c.benchmark_group("codecs");
    for (name, symbols) in &inputs {
        group.throughput(Throughput::Elements(symbols.len() as u64));
        group.bench_with_input(BenchmarkId::new("run_length", name), symbols, |b, s| {
            b.iter(|| run_length::encode(black_box(s)))
        });
        group.bench_with_input(BenchmarkId::new("huffman", name), symbols, |b, s| {
            b.iter(|| huffman::encode(black_box(s)))
        });
        group.bench_with_input(BenchmarkId::new("lzw", name), symbols, |b, s| {
            b.iter(|| lzw::encode(black_box(s), LzwCostModel::VariableWidth))
        });
    }
    group.finish();
}

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    for len in [64usize, 2048, 65_536] {
        let symbols = make_random(len, 0x9e37_79b9);
        group.bench_with_input(BenchmarkId::new("encode", len), &symbols, |b, s| {
            b.iter(|| arithmetic::encode(black_box(s)))
        });
        if let Ok(enc) = arithmetic::encode(&symbols) {
            group.bench_with_input(BenchmarkId::new("decode", len), &enc, |b, e| {
                b.iter(|| arithmetic::decode(black_box(&e.tag), len, &e.table))
            });
        }
    }
    group.finish();
}

fn bench_analyzer(c: &mut Criterion) {
    let analyzer = Analyzer::default();
    let input = Input::Text(make_pattern(1024).into_iter().collect());
    c.bench_function("analyze_1k", |b| b.iter(|| analyzer.analyze(black_box(&input))));
}

criterion_group!(benches, bench_codecs, bench_arithmetic, bench_analyzer);
criterion_main!(benches);
