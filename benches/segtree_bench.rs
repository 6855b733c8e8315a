//! Benchmarks for the lazy segment tree.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use segment_tree::LazySegmentTree;
use std::hint::black_box;

/// Deterministic pseudo-random ranges (xorshift), so runs are comparable.
fn ranges(n: usize, count: usize) -> Vec<(usize, usize)> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state as usize % n
    };
    (0..count)
        .map(|_| {
            let (a, b) = (next(), next());
            (a.min(b), a.max(b) + 1)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("segtree/build");

    for n in [1_000, 100_000] {
        let values: Vec<i64> = (0..n as i64).collect();
        group.bench_with_input(BenchmarkId::new("eager", n), &values, |b, values| {
            b.iter(|| LazySegmentTree::build(black_box(values)).unwrap())
        });
    }

    group.finish();
}

fn bench_mixed_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("segtree/mixed");

    for n in [1_000, 100_000] {
        let ops = ranges(n, 1_000);
        let values: Vec<i64> = (0..n as i64).collect();

        group.bench_with_input(BenchmarkId::new("built", n), &ops, |b, ops| {
            b.iter(|| {
                let mut tree = LazySegmentTree::build(&values).unwrap();
                for (i, &(l, r)) in ops.iter().enumerate() {
                    match i % 3 {
                        0 => tree.set_range(l, r, i as i64).unwrap(),
                        1 => tree.add_range(l, r, 1).unwrap(),
                        _ => {
                            black_box(tree.query(l, r).unwrap());
                        }
                    }
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("filled", n), &ops, |b, ops| {
            b.iter(|| {
                let mut tree = LazySegmentTree::filled(n, 0).unwrap();
                for (i, &(l, r)) in ops.iter().enumerate() {
                    match i % 3 {
                        0 => tree.set_range(l, r, i as i64).unwrap(),
                        1 => tree.add_range(l, r, 1).unwrap(),
                        _ => {
                            black_box(tree.query(l, r).unwrap());
                        }
                    }
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_mixed_ops);
criterion_main!(benches);
