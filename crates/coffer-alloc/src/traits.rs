//! The allocation strategy trait.
//!
//! Declares the one `unsafe` method of the workspace's allocation layer;
//! implementations opt in module by module.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use coffer_core::{AllocError, Propagation};

/// Raw storage strategy injected into a container at construction.
///
/// An implementation hands out untyped memory blocks and answers the
/// identity questions that arise when containers holding it are copied,
/// assigned, or swapped. Element construction and destruction are *not*
/// part of this trait: the container writes values into acquired blocks
/// with `ptr::write` and destroys them with `ptr::drop_in_place`.
///
/// # Block ownership
///
/// A block returned by [`allocate`](ArrayAlloc::allocate) must be released
/// by [`deallocate`](ArrayAlloc::deallocate) on the same instance, or on an
/// instance for which [`interchangeable`](ArrayAlloc::interchangeable)
/// returns true. Containers uphold this by carrying their allocator for
/// the lifetime of the buffer and consulting [`Propagation`] before any
/// operation that could separate the two.
pub trait ArrayAlloc {
    /// Acquire a block of at least `layout.size()` bytes with
    /// `layout.align()` alignment.
    ///
    /// `layout.size()` is never zero — containers special-case empty and
    /// zero-sized-element storage and do not call the allocator for it.
    ///
    /// Returns [`AllocError::Exhausted`] if the request cannot be
    /// satisfied. Must not unwind.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this instance (or an
    /// interchangeable one) with this exact `layout`, and must not be used
    /// after this call.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Select the allocator instance a copy-constructed container starts
    /// with.
    ///
    /// Stateless strategies return an equivalent instance. Stateful ones
    /// choose between sharing state with the source and starting fresh;
    /// whatever is returned becomes the copy's allocator before any of its
    /// storage is acquired.
    fn fork_for_copy(&self) -> Self
    where
        Self: Sized;

    /// Propagation flags consulted on copy assignment and swap.
    ///
    /// The default policy keeps allocators where they are, which is
    /// correct whenever all instances are interchangeable.
    fn propagation(&self) -> Propagation {
        Propagation::NEVER
    }

    /// Whether `self` may release blocks acquired from `other`.
    ///
    /// Stateless strategies are always interchangeable; stateful ones
    /// should compare identity. Containers assert this (in debug builds)
    /// before any operation that would hand one instance's block to the
    /// other.
    fn interchangeable(&self, _other: &Self) -> bool
    where
        Self: Sized,
    {
        true
    }

    /// Upper bound, in bytes, on any single block this strategy can hand
    /// out.
    ///
    /// Feeds the container's `max_len`. The default is the address-space
    /// bound shared by all Rust allocations.
    fn max_bytes(&self) -> usize {
        isize::MAX as usize
    }
}
