//! Raw buffer ownership.
//!
//! [`RawBuf`] pairs one allocation with the strategy that produced it and
//! nothing else: it tracks the block address and slot count, performs the
//! allocate-copy-free-install reallocation sequence, and releases the block
//! on drop. It never constructs or destroys elements; the container layered
//! on top owns the live range and tears it down first.
#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cmp;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use coffer_alloc::ArrayAlloc;
use coffer_core::AllocError;

/// An owned, possibly empty block of uninitialized `T` slots.
///
/// `ptr` is dangling while `cap == 0` and otherwise points at a live block
/// of exactly `cap` slots obtained from `alloc`. Zero-sized element types
/// never allocate: `cap` stays 0 and the reported capacity is `usize::MAX`.
pub(crate) struct RawBuf<T, A: ArrayAlloc> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

impl<T, A: ArrayAlloc> RawBuf<T, A> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An empty buffer bound to `alloc`. Never allocates.
    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// A buffer with at least `cap` slots bound to `alloc`.
    pub(crate) fn with_capacity_in(cap: usize, alloc: A) -> Result<Self, AllocError> {
        let mut buf = Self::new_in(alloc);
        buf.realloc_to(cap, 0)?;
        Ok(buf)
    }

    /// Base address of the block. Dangling (but aligned) while unallocated.
    pub(crate) fn ptr(&self) -> NonNull<T> {
        self.ptr
    }

    /// Reported capacity in slots: `usize::MAX` for zero-sized `T`.
    pub(crate) fn capacity(&self) -> usize {
        if Self::IS_ZST {
            usize::MAX
        } else {
            self.cap
        }
    }

    /// Physical slot count of the current block. 0 for zero-sized `T`.
    pub(crate) fn allocated_slots(&self) -> usize {
        self.cap
    }

    /// Whether no block is currently held.
    pub(crate) fn is_unallocated(&self) -> bool {
        !Self::IS_ZST && self.cap == 0
    }

    /// The allocation strategy this buffer is bound to.
    pub(crate) fn alloc(&self) -> &A {
        &self.alloc
    }

    /// Largest representable slot count: the tighter of the address-space
    /// bound and the strategy's byte ceiling.
    pub(crate) fn max_len(&self) -> usize {
        if Self::IS_ZST {
            return usize::MAX;
        }
        let address_bound = isize::MAX as usize / mem::size_of::<T>();
        let strategy_bound = self.alloc.max_bytes() / mem::size_of::<T>();
        cmp::min(address_bound, strategy_bound)
    }

    /// Resize the block to exactly `new_cap` slots, carrying the first
    /// `live` elements across bitwise.
    ///
    /// On failure the buffer is untouched. A `new_cap` of 0 releases the
    /// block. The caller must not count slots beyond `new_cap` as live
    /// afterwards.
    pub(crate) fn realloc_to(&mut self, new_cap: usize, live: usize) -> Result<(), AllocError> {
        debug_assert!(live <= new_cap || new_cap == 0);
        if Self::IS_ZST || new_cap == self.cap {
            return Ok(());
        }
        if new_cap == 0 {
            self.free();
            return Ok(());
        }
        if new_cap > self.max_len() {
            return Err(AllocError::CapacityOverflow { requested: new_cap });
        }
        let new_ptr = self.allocate_block(new_cap)?;
        // SAFETY: both blocks are distinct and hold at least `live` slots;
        // the first `live` slots of the old block are initialized.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), live);
        }
        self.free();
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Release the current block, if any, and return to the empty state.
    ///
    /// Does not touch element contents; the caller destroys live elements
    /// first.
    pub(crate) fn free(&mut self) {
        if Self::IS_ZST || self.cap == 0 {
            return;
        }
        let layout =
            Layout::array::<T>(self.cap).expect("layout was validated when the block was allocated");
        // SAFETY: `ptr` came from `alloc.allocate` with this exact layout
        // and has not been released since.
        unsafe {
            self.alloc.deallocate(self.ptr.cast(), layout);
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }

    /// Exchange blocks with `other`, leaving both allocators in place.
    pub(crate) fn swap_storage(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.cap, &mut other.cap);
    }

    /// Exchange allocation strategies with `other`.
    pub(crate) fn swap_alloc(&mut self, other: &mut Self) {
        mem::swap(&mut self.alloc, &mut other.alloc);
    }

    /// Replace the bound strategy.
    ///
    /// Only sound while unallocated, or when the incoming strategy can
    /// release blocks of the current one.
    pub(crate) fn adopt_alloc(&mut self, alloc: A) {
        debug_assert!(
            self.cap == 0 || self.alloc.interchangeable(&alloc),
            "adopting a non-interchangeable allocator while a block is held"
        );
        self.alloc = alloc;
    }

    fn allocate_block(&self, cap: usize) -> Result<NonNull<T>, AllocError> {
        let layout = Layout::array::<T>(cap)
            .map_err(|_| AllocError::CapacityOverflow { requested: cap })?;
        Ok(self.alloc.allocate(layout)?.cast::<T>())
    }
}

impl<T, A: ArrayAlloc> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        self.free();
    }
}

// SAFETY: RawBuf owns its block exclusively; transferring or sharing it
// transfers or shares exactly the `T` slots and the `A` instance.
unsafe impl<T: Send, A: ArrayAlloc + Send> Send for RawBuf<T, A> {}
// SAFETY: see the Send impl; shared access hands out nothing beyond what
// `&T` and `&A` allow.
unsafe impl<T: Sync, A: ArrayAlloc + Sync> Sync for RawBuf<T, A> {}
