//! Benchmark workloads and helpers for the Coffer containers.
//!
//! Provides deterministic workload builders shared by the benches and
//! examples:
//!
//! - [`shuffled_indices`]: a seeded permutation for random-access sweeps
//! - [`mixed_ops`]: a seeded, push-heavy op tape for lifecycle runs
//! - [`filled_array`]: an array pre-filled with a counting pattern

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use coffer_array::DynArray;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a deterministic container workout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayOp {
    /// Append the value.
    Push(u64),
    /// Remove the last element.
    Pop,
}

/// A seeded permutation of `0..len` for random-access sweeps.
pub fn shuffled_indices(len: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices
}

/// A seeded op tape with roughly three pushes per pop.
///
/// Push-heavy so a replay trends upward through several reallocation
/// generations instead of hovering near empty.
pub fn mixed_ops(count: usize, seed: u64) -> Vec<ArrayOp> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            if rng.random_range(0..4u8) == 0 {
                ArrayOp::Pop
            } else {
                ArrayOp::Push(rng.random())
            }
        })
        .collect()
}

/// Replay an op tape against a fresh array, returning the final state.
pub fn replay(ops: &[ArrayOp]) -> DynArray<u64> {
    let mut array = DynArray::new();
    for op in ops {
        match op {
            ArrayOp::Push(value) => array.push(*value).expect("workload push failed"),
            ArrayOp::Pop => {
                array.pop();
            }
        }
    }
    array
}

/// An array holding `0..len` for read-side benchmarks.
pub fn filled_array(len: usize) -> DynArray<u64> {
    DynArray::from_iter_exact((0..len).map(|i| i as u64)).expect("workload allocation failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workloads_are_deterministic() {
        assert_eq!(shuffled_indices(500, 42), shuffled_indices(500, 42));
        assert_eq!(mixed_ops(500, 42), mixed_ops(500, 42));
        assert_ne!(shuffled_indices(500, 42), shuffled_indices(500, 43));
    }

    #[test]
    fn shuffled_indices_is_a_permutation() {
        let mut indices = shuffled_indices(1000, 7);
        indices.sort_unstable();
        let expected: Vec<usize> = (0..1000).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn mixed_ops_is_push_biased() {
        let ops = mixed_ops(10_000, 11);
        let pushes = ops
            .iter()
            .filter(|op| matches!(op, ArrayOp::Push(_)))
            .count();
        assert!(pushes > ops.len() / 2, "only {pushes} pushes in 10k ops");
    }

    #[test]
    fn replay_matches_a_vec_model() {
        let ops = mixed_ops(2000, 3);
        let array = replay(&ops);
        let mut model = Vec::new();
        for op in &ops {
            match op {
                ArrayOp::Push(value) => model.push(*value),
                ArrayOp::Pop => {
                    model.pop();
                }
            }
        }
        assert_eq!(array.as_slice(), model.as_slice());
    }

    #[test]
    fn filled_array_counts_upward() {
        let array = filled_array(64);
        assert_eq!(array.len(), 64);
        assert_eq!(array[0], 0);
        assert_eq!(array[63], 63);
    }
}
