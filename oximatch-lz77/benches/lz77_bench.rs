//! Benchmarks for LZ77 parsing and match search performance.
//!
//! - Full parses at fast, middle and best levels over random, repeated and
//!   text-like inputs
//! - The parse driver with each available comparator

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oximatch_lz77::{Comparator, Lz77Parser, Lz77Token};
use std::hint::black_box;

fn generate_random(size: usize) -> Vec<u8> {
    // Simple LCG random number generator
    let mut data = Vec::with_capacity(size);
    let mut seed = 12345u32;
    for _ in 0..size {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((seed >> 16) as u8);
    }
    data
}

fn generate_repeated(size: usize) -> Vec<u8> {
    // Highly compressible repeated pattern
    let pattern = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

fn generate_text_like(size: usize) -> Vec<u8> {
    // Word salad from a small vocabulary
    let words: &[&[u8]] = &[
        b"the", b"quick", b"brown", b"fox", b"jumps", b"over", b"lazy", b"dog", b"and", b"runs",
        b"through", b"forest", b"near", b"river", b"under", b"blue", b"sky", b"with", b"wind",
        b"blowing",
    ];
    let mut data = Vec::with_capacity(size);
    let mut seed = 42u32;

    while data.len() < size {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        let word_idx = (seed as usize) % words.len();
        data.extend_from_slice(words[word_idx]);
        data.push(b' ');
    }
    data.truncate(size);
    data
}

/// Bytes described by a token stream; guards against a broken parse being
/// benchmarked.
fn covered(tokens: &[Lz77Token]) -> usize {
    tokens
        .iter()
        .map(|t| match t {
            Lz77Token::Literal(_) => 1,
            Lz77Token::Match { length, .. } => *length as usize,
        })
        .sum()
}

/// Benchmark full parses per input shape and level
fn bench_parse_levels(c: &mut Criterion) {
    let inputs = [
        ("random", generate_random(64 * 1024)),
        ("repeated", generate_repeated(64 * 1024)),
        ("text", generate_text_like(64 * 1024)),
    ];

    for (name, data) in &inputs {
        let mut group = c.benchmark_group(format!("parse_{}", name));
        group.throughput(Throughput::Bytes(data.len() as u64));

        for level in [1u8, 5, 9] {
            group.bench_with_input(BenchmarkId::from_parameter(level), data, |b, data| {
                b.iter(|| {
                    let tokens = Lz77Parser::parse_all(black_box(data), level);
                    assert_eq!(covered(&tokens), data.len());
                    black_box(tokens);
                });
            });
        }

        group.finish();
    }
}

/// Benchmark the parse driver with each comparator
fn bench_parse_comparators(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_comparator");
    let data = generate_text_like(256 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for kind in Comparator::available() {
        let Ok(comparator) = Comparator::new(kind) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::from_parameter(kind), &data, |b, data| {
            b.iter(|| {
                let mut parser = Lz77Parser::with_level(6).with_comparator(comparator);
                black_box(parser.parse(black_box(data)));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_levels, bench_parse_comparators);
criterion_main!(benches);
