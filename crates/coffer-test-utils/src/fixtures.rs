//! Reusable allocator fixtures.
//!
//! Two standard strategies for container validation:
//!
//! - [`QuotaAlloc`] — system-backed, fails deterministically after N grants.
//! - [`TrackingAlloc`] — records every outstanding block, with
//!   identity-based interchangeability and configurable propagation.

use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use coffer_alloc::{ArrayAlloc, SystemAlloc};
use coffer_core::{AllocError, Propagation};
use indexmap::IndexMap;

/// Grants a fixed number of allocations, then fails every request.
///
/// The grant counter is shared across clones and forks, so a container
/// and its copies draw on one budget. Useful for steering growth and
/// copy paths into their failure branches at a chosen allocation.
#[derive(Clone)]
pub struct QuotaAlloc {
    quota: usize,
    requests: Arc<AtomicUsize>,
}

impl QuotaAlloc {
    /// Succeed for the first `quota` requests, fail afterwards.
    pub fn new(quota: usize) -> Self {
        Self {
            quota,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many allocation requests have been made.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

impl ArrayAlloc for QuotaAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let n = self.requests.fetch_add(1, Ordering::Relaxed);
        if n >= self.quota {
            return Err(AllocError::Exhausted { layout });
        }
        SystemAlloc.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: every block this strategy grants comes from the shared
        // system allocator; the caller passes the granting layout.
        unsafe { SystemAlloc.deallocate(ptr, layout) }
    }

    fn fork_for_copy(&self) -> Self {
        self.clone()
    }
}

/// Records every outstanding block in a shared ledger.
///
/// Clones and forks share the ledger, interchangeability is ledger
/// identity, and the propagation flags are whatever the constructor was
/// given. This is the fixture for copy-assign and swap policy tests, and
/// its release path asserts that blocks return to the ledger they came
/// from with the layout they were granted with.
#[derive(Clone, Default)]
pub struct TrackingAlloc {
    ledger: Arc<Mutex<Ledger>>,
    policy: Propagation,
}

#[derive(Default)]
struct Ledger {
    live: IndexMap<usize, Layout>,
    allocated: usize,
    released: usize,
}

impl TrackingAlloc {
    /// A tracking strategy with the non-propagating default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracking strategy advertising the given propagation flags.
    pub fn with_policy(policy: Propagation) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::default())),
            policy,
        }
    }

    /// Blocks currently outstanding.
    pub fn live_blocks(&self) -> usize {
        self.lock().live.len()
    }

    /// Bytes currently outstanding.
    pub fn live_bytes(&self) -> usize {
        self.lock().live.values().map(|layout| layout.size()).sum()
    }

    /// Total blocks granted over the fixture's lifetime.
    pub fn allocated(&self) -> usize {
        self.lock().allocated
    }

    /// Total blocks returned over the fixture's lifetime.
    pub fn released(&self) -> usize {
        self.lock().released
    }

    /// Whether `other` writes to the same ledger.
    pub fn shares_ledger(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ledger, &other.ledger)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("allocation ledger poisoned")
    }
}

impl ArrayAlloc for TrackingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = SystemAlloc.allocate(layout)?;
        let mut ledger = self.lock();
        ledger.live.insert(ptr.as_ptr() as usize, layout);
        ledger.allocated += 1;
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        {
            let mut ledger = self.lock();
            let recorded = ledger.live.swap_remove(&(ptr.as_ptr() as usize));
            assert_eq!(
                recorded,
                Some(layout),
                "released a block this ledger does not own, or with the wrong layout"
            );
            ledger.released += 1;
        }
        // SAFETY: ledger membership established that the block came from
        // the system allocator with exactly this layout.
        unsafe { SystemAlloc.deallocate(ptr, layout) }
    }

    fn fork_for_copy(&self) -> Self {
        self.clone()
    }

    fn propagation(&self) -> Propagation {
        self.policy
    }

    fn interchangeable(&self, other: &Self) -> bool {
        self.shares_ledger(other)
    }
}
