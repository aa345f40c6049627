//! Capacity lifecycle benchmarks: mixed workloads, bulk construction,
//! and the reserve/shrink round trip.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use coffer_array::DynArray;
use coffer_bench::{filled_array, mixed_ops, replay};

/// Replay a 100K-step push-heavy tape, crossing many growth generations.
fn bench_mixed_replay(c: &mut Criterion) {
    let ops = mixed_ops(100_000, 17);
    c.bench_function("dynarray_mixed_replay_100k", |b| {
        b.iter(|| black_box(replay(black_box(&ops)).len()))
    });
}

/// Reserve the full footprint up front, then fill without reallocating.
fn bench_reserve_then_fill(c: &mut Criterion) {
    c.bench_function("dynarray_reserve_then_fill_64k", |b| {
        b.iter(|| {
            let mut array = DynArray::new();
            array.reserve(65_536).expect("reserve failed");
            for value in 0..65_536u64 {
                array.push(black_box(value)).expect("push failed");
            }
            black_box(array.capacity())
        })
    });
}

/// Grow to 64K, truncate to 1K, and release the slack.
fn bench_truncate_shrink(c: &mut Criterion) {
    c.bench_function("dynarray_truncate_shrink_64k_to_1k", |b| {
        b.iter(|| {
            let mut array = filled_array(65_536);
            array.truncate(1024);
            array.shrink_to_fit().expect("shrink failed");
            black_box(array.capacity())
        })
    });
}

/// Build a 64K array in one shot from a borrowed slice.
fn bench_from_slice(c: &mut Criterion) {
    let source: Vec<u64> = (0..65_536).collect();
    c.bench_function("dynarray_from_slice_64k", |b| {
        b.iter(|| black_box(DynArray::from_slice(black_box(&source)).expect("copy failed").len()))
    });
}

criterion_group!(
    benches,
    bench_mixed_replay,
    bench_reserve_then_fill,
    bench_truncate_shrink,
    bench_from_slice
);
criterion_main!(benches);
