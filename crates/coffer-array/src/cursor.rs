//! Bounds-unchecked random-access cursors.
//!
//! A [`RawCursor`] is a single element address inside (or one past the end
//! of) a contiguous buffer. It is the trusted-caller boundary of the crate:
//! arithmetic and dereference are O(1) with no bounds checks, and staying
//! inside a live allocation is entirely the caller's responsibility. The
//! safe iterators in [`crate::iter`] are thin lifetime-branded wrappers
//! over cursor pairs.

#![allow(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;

/// An unchecked cursor over elements of type `T`.
///
/// Plain value type: `Copy`, address-ordered, trivially destructible, and
/// without any ownership of the buffer it points into. Cursors compare by
/// raw address, so ordering is only meaningful between cursors derived
/// from the same buffer.
///
/// # Validity
///
/// A cursor is valid while the buffer it was derived from is neither
/// reallocated nor destroyed. Every `unsafe` operation below additionally
/// requires the result (and, for dereference, the operand) to lie inside
/// the buffer — or one past its end for pure arithmetic. Violating either
/// rule is undefined behaviour, not a recoverable error.
///
/// For zero-sized `T` every address carries zero bytes of stride, so all
/// cursors into one buffer compare equal and distances are always zero.
pub struct RawCursor<T> {
    ptr: NonNull<T>,
}

// Manual impls: a cursor is address-semantic whatever `T` is, so none of
// these may pick up the `T:` bounds a derive would add.

impl<T> Clone for RawCursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RawCursor<T> {}

impl<T> fmt::Debug for RawCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawCursor").field(&self.ptr).finish()
    }
}

impl<T> PartialEq for RawCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for RawCursor<T> {}

impl<T> PartialOrd for RawCursor<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for RawCursor<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ptr.cmp(&other.ptr)
    }
}

impl<T> RawCursor<T> {
    /// Create a cursor at the given address.
    pub const fn new(ptr: NonNull<T>) -> Self {
        Self { ptr }
    }

    /// The aligned sentinel cursor used for empty ranges.
    pub const fn dangling() -> Self {
        Self {
            ptr: NonNull::dangling(),
        }
    }

    /// The raw address this cursor wraps.
    pub const fn as_ptr(self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Cursor advanced by `count` elements.
    ///
    /// # Safety
    ///
    /// The resulting address must lie within the same allocation as `self`,
    /// or one past its end.
    pub unsafe fn add(self, count: usize) -> Self {
        // SAFETY: in-allocation arithmetic cannot produce a null address.
        Self {
            ptr: unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(count)) },
        }
    }

    /// Cursor retreated by `count` elements.
    ///
    /// # Safety
    ///
    /// As [`add`](Self::add): the result must stay inside the same
    /// allocation, or one past its end.
    pub unsafe fn sub(self, count: usize) -> Self {
        // SAFETY: see `add`.
        Self {
            ptr: unsafe { NonNull::new_unchecked(self.ptr.as_ptr().sub(count)) },
        }
    }

    /// Cursor moved by a signed element offset.
    ///
    /// # Safety
    ///
    /// As [`add`](Self::add).
    pub unsafe fn offset(self, count: isize) -> Self {
        // SAFETY: see `add`.
        Self {
            ptr: unsafe { NonNull::new_unchecked(self.ptr.as_ptr().offset(count)) },
        }
    }

    /// Advance in place by one element.
    ///
    /// # Safety
    ///
    /// As [`add`](Self::add) with a count of 1.
    pub unsafe fn advance(&mut self) {
        // SAFETY: forwarded contract.
        *self = unsafe { self.add(1) };
    }

    /// Retreat in place by one element.
    ///
    /// # Safety
    ///
    /// As [`sub`](Self::sub) with a count of 1.
    pub unsafe fn retreat(&mut self) {
        // SAFETY: forwarded contract.
        *self = unsafe { self.sub(1) };
    }

    /// Shared reference to the pointed-at element.
    ///
    /// # Safety
    ///
    /// The cursor must point at a live, initialized element, and the
    /// reference must not outlive the buffer or overlap any mutable
    /// access to the element. The caller chooses the lifetime.
    pub unsafe fn as_ref<'a>(self) -> &'a T {
        // SAFETY: forwarded contract.
        unsafe { self.ptr.as_ref() }
    }

    /// Exclusive reference to the pointed-at element.
    ///
    /// # Safety
    ///
    /// As [`as_ref`](Self::as_ref), and additionally no other reference to
    /// the element may exist for the chosen lifetime.
    pub unsafe fn as_mut<'a>(mut self) -> &'a mut T {
        // SAFETY: forwarded contract.
        unsafe { self.ptr.as_mut() }
    }

    /// Shared reference to the element `count` slots ahead.
    ///
    /// # Safety
    ///
    /// Combines the contracts of [`add`](Self::add) and
    /// [`as_ref`](Self::as_ref).
    pub unsafe fn get<'a>(self, count: usize) -> &'a T {
        // SAFETY: forwarded contracts.
        unsafe { self.add(count).as_ref() }
    }

    /// Signed element distance from `origin` to `self`.
    ///
    /// Positive when `self` is ahead of `origin`.
    ///
    /// # Safety
    ///
    /// Both cursors must derive from the same allocation, and the distance
    /// in bytes must fit in `isize`.
    pub unsafe fn offset_from(self, origin: Self) -> isize {
        // SAFETY: forwarded contract.
        unsafe { self.ptr.as_ptr().offset_from(origin.ptr.as_ptr()) }
    }
}
