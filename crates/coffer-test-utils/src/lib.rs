//! Test fixtures for Coffer development.
//!
//! Provides instrumented element types ([`Tracked`], [`FlakyClone`]) for
//! observing construction, destruction, and mid-copy panics, plus the
//! allocator fixtures in [`fixtures`] for failure injection and
//! instance-identity tests.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared construction/destruction ledger for [`Tracked`] values.
///
/// Clones of a tally observe the same counters. Every value minted with
/// [`make`](DropTally::make) and every clone of such a value counts as a
/// construction; every drop counts as a destruction. Leak checks compare
/// [`live`](DropTally::live) against the expected survivor count.
#[derive(Clone, Default)]
pub struct DropTally {
    counts: Arc<TallyCounts>,
}

#[derive(Default)]
struct TallyCounts {
    created: AtomicUsize,
    dropped: AtomicUsize,
}

impl DropTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a tracked value carrying `id`.
    pub fn make(&self, id: u32) -> Tracked {
        self.counts.created.fetch_add(1, Ordering::Relaxed);
        Tracked {
            counts: Arc::clone(&self.counts),
            id,
        }
    }

    /// Constructions so far, clones included.
    pub fn created(&self) -> usize {
        self.counts.created.load(Ordering::Relaxed)
    }

    /// Destructions so far.
    pub fn dropped(&self) -> usize {
        self.counts.dropped.load(Ordering::Relaxed)
    }

    /// Values currently alive.
    pub fn live(&self) -> usize {
        self.created() - self.dropped()
    }
}

/// Value whose lifecycle is counted by a [`DropTally`].
pub struct Tracked {
    counts: Arc<TallyCounts>,
    pub id: u32,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.counts.created.fetch_add(1, Ordering::Relaxed);
        Self {
            counts: Arc::clone(&self.counts),
            id: self.id,
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counts.dropped.fetch_add(1, Ordering::Relaxed);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tracked {}

impl std::fmt::Debug for Tracked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tracked({})", self.id)
    }
}

/// Factory for [`FlakyClone`] values drawing on one shared clone budget.
///
/// Useful for testing cleanup when an element copy panics partway
/// through a bulk operation. Uses `AtomicUsize` for the counter so
/// fixtures satisfy `Send`.
pub struct CloneFuse {
    succeed_count: usize,
    clone_count: Arc<AtomicUsize>,
}

impl CloneFuse {
    /// Allow `succeed_count` clones across all descendants, then panic.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            clone_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wrap `payload` in a value drawing on this fuse's budget.
    pub fn make(&self, payload: Tracked) -> FlakyClone {
        FlakyClone {
            succeed_count: self.succeed_count,
            clone_count: Arc::clone(&self.clone_count),
            payload,
        }
    }

    /// How many clones have been attempted.
    pub fn clones(&self) -> usize {
        self.clone_count.load(Ordering::Relaxed)
    }
}

/// Clones successfully a fixed number of times, then panics.
///
/// The payload is cloned only after the budget check, so a panicking
/// clone constructs nothing and the payload tally stays balanced.
pub struct FlakyClone {
    succeed_count: usize,
    clone_count: Arc<AtomicUsize>,
    pub payload: Tracked,
}

impl Clone for FlakyClone {
    fn clone(&self) -> Self {
        let n = self.clone_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            panic!(
                "deliberate clone failure after {} successful clones",
                self.succeed_count
            );
        }
        Self {
            succeed_count: self.succeed_count,
            clone_count: Arc::clone(&self.clone_count),
            payload: self.payload.clone(),
        }
    }
}
