//! The process-global system allocator strategy.

#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

use coffer_core::AllocError;

use crate::traits::ArrayAlloc;

/// Allocation strategy backed by `std::alloc`.
///
/// Zero-sized and stateless: every instance is interchangeable with every
/// other, copies fork to an identical instance, and the default
/// (non-propagating) policy applies. This is the default strategy for all
/// containers in the workspace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemAlloc;

impl ArrayAlloc for SystemAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() > 0, "zero-sized allocation request");
        // SAFETY: layout has non-zero size per the trait contract, which
        // the debug assertion above checks on the caller's behalf.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::Exhausted { layout })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller guarantees `ptr` came from `allocate` with
        // this exact layout; all SystemAlloc instances share the global
        // allocator, so any instance may free it.
        unsafe { dealloc(ptr.as_ptr(), layout) }
    }

    fn fork_for_copy(&self) -> Self {
        SystemAlloc
    }
}
