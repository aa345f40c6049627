//! The growable array container.

#![allow(unsafe_code)]

use std::cmp;
use std::fmt;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice;

use coffer_alloc::{ArrayAlloc, SystemAlloc};
use coffer_core::{AccessError, AllocError};

use crate::cursor::RawCursor;
use crate::iter::{IntoIter, Iter, IterMut};
use crate::raw::RawBuf;

/// A growable contiguous array with explicit capacity control and a
/// pluggable allocation strategy.
///
/// Elements occupy the first `len` slots of a single block whose slot
/// count is the capacity. Appending beyond capacity reallocates to double
/// the previous capacity (at least one slot, never past [`max_len`]);
/// every other operation leaves the block alone unless asked not to.
/// Reallocation acquires the new block before anything else happens, so a
/// failed growth leaves the array exactly as it was.
///
/// The strategy instance travels with the array for the lifetime of its
/// buffer. Copying, copy-assigning, and swapping consult the strategy's
/// [`Propagation`](coffer_core::Propagation) flags before deciding which
/// instance ends up where.
///
/// Zero-sized element types never allocate: the capacity reports
/// `usize::MAX` and growth is free.
///
/// # Examples
///
/// ```
/// use coffer_array::DynArray;
///
/// let mut names = DynArray::new();
/// names.push("ada")?;
/// names.push("grace")?;
/// assert_eq!(names.len(), 2);
/// assert_eq!(names[1], "grace");
/// # Ok::<(), coffer_array::AllocError>(())
/// ```
///
/// [`max_len`]: DynArray::max_len
pub struct DynArray<T, A: ArrayAlloc = SystemAlloc> {
    raw: RawBuf<T, A>,
    len: usize,
}

impl<T> DynArray<T> {
    /// An empty array on the system allocator. Never allocates.
    pub const fn new() -> Self {
        Self::new_in(SystemAlloc)
    }

    /// An empty array holding a block of at least `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::with_capacity_in(capacity, SystemAlloc)
    }

    /// An array of `len` clones of `value`.
    pub fn from_fill(len: usize, value: T) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::from_fill_in(len, value, SystemAlloc)
    }

    /// An array cloning the contents of `values`.
    pub fn from_slice(values: &[T]) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::from_slice_in(values, SystemAlloc)
    }

    /// An array taking ownership of the elements of `values`.
    pub fn from_array<const N: usize>(values: [T; N]) -> Result<Self, AllocError> {
        Self::from_array_in(values, SystemAlloc)
    }

    /// An array collecting a length-reporting iterator in one allocation.
    pub fn from_iter_exact<I>(values: I) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Self::from_iter_exact_in(values, SystemAlloc)
    }
}

impl<T, A: ArrayAlloc> DynArray<T, A> {
    /// An empty array bound to `alloc`. Never allocates.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            raw: RawBuf::new_in(alloc),
            len: 0,
        }
    }

    /// An empty array bound to `alloc`, holding a block of at least
    /// `capacity` slots.
    ///
    /// Fails with [`AllocError::CapacityOverflow`] when `capacity` exceeds
    /// [`max_len`](Self::max_len), or [`AllocError::Exhausted`] when the
    /// strategy cannot supply the block.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        Ok(Self {
            raw: RawBuf::with_capacity_in(capacity, alloc)?,
            len: 0,
        })
    }

    /// An array of `len` clones of `value`, bound to `alloc`.
    pub fn from_fill_in(len: usize, value: T, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_in(len, alloc)?;
        for _ in 0..len {
            // SAFETY: capacity for `len` elements was just reserved.
            unsafe { array.push_unchecked(value.clone()) };
        }
        Ok(array)
    }

    /// An array cloning the contents of `values`, bound to `alloc`.
    pub fn from_slice_in(values: &[T], alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_in(values.len(), alloc)?;
        for value in values {
            // SAFETY: capacity for the whole slice was just reserved.
            unsafe { array.push_unchecked(value.clone()) };
        }
        Ok(array)
    }

    /// An array taking ownership of the elements of `values`, bound to
    /// `alloc`.
    pub fn from_array_in<const N: usize>(values: [T; N], alloc: A) -> Result<Self, AllocError> {
        let mut array = Self::with_capacity_in(N, alloc)?;
        let values = ManuallyDrop::new(values);
        // SAFETY: N slots were just reserved, and the source is wrapped in
        // ManuallyDrop, so each element is moved exactly once.
        unsafe {
            ptr::copy_nonoverlapping(values.as_ptr(), array.as_mut_ptr(), N);
            array.len = N;
        }
        Ok(array)
    }

    /// An array collecting a length-reporting iterator in one allocation,
    /// bound to `alloc`.
    pub fn from_iter_exact_in<I>(values: I, alloc: A) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        let mut array = Self::with_capacity_in(values.len(), alloc)?;
        for value in values {
            // ExactSizeIterator is a safe trait; an iterator that yields
            // more than it reported falls back to checked growth.
            if array.len == array.raw.capacity() {
                array.push(value)?;
            } else {
                // SAFETY: a free slot exists below capacity.
                unsafe { array.push_unchecked(value) };
            }
        }
        Ok(array)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot count of the current block; `usize::MAX` for zero-sized
    /// element types.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Largest length this array can ever reach: the tighter of the
    /// address-space bound and the strategy's byte ceiling.
    pub fn max_len(&self) -> usize {
        self.raw.max_len()
    }

    /// The allocation strategy instance this array is bound to.
    pub fn allocator(&self) -> &A {
        self.raw.alloc()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are live; the base is aligned even
        // while dangling.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: see `as_slice`; `&mut self` grants exclusive access.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Base address of the block. Never null, but dangling while no block
    /// is held; valid for `len` reads regardless.
    pub fn as_ptr(&self) -> *const T {
        self.raw.ptr().as_ptr()
    }

    /// Mutable base address of the block. See [`as_ptr`](Self::as_ptr).
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.raw.ptr().as_ptr()
    }

    /// Base address of the block, or null when no block is held.
    ///
    /// Non-null exactly while `capacity() > 0`, which survives
    /// [`clear`](Self::clear) and outlives the last element. Zero-sized
    /// element types report a fixed dangling (non-null) address.
    pub fn data(&self) -> *const T {
        if self.raw.is_unallocated() {
            ptr::null()
        } else {
            self.raw.ptr().as_ptr()
        }
    }

    /// Mutable variant of [`data`](Self::data).
    pub fn data_mut(&mut self) -> *mut T {
        if self.raw.is_unallocated() {
            ptr::null_mut()
        } else {
            self.raw.ptr().as_ptr()
        }
    }

    /// Reference to the element at `index`, if it is in bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Mutable reference to the element at `index`, if it is in bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Reference to the element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        // SAFETY: the caller guarantees `index < len`.
        unsafe { &*self.as_ptr().add(index) }
    }

    /// Mutable reference to the element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        // SAFETY: the caller guarantees `index < len`.
        unsafe { &mut *self.as_mut_ptr().add(index) }
    }

    /// Checked indexed access.
    ///
    /// Fails with [`AccessError::OutOfRange`] instead of panicking.
    pub fn at(&self, index: usize) -> Result<&T, AccessError> {
        self.as_slice().get(index).ok_or(AccessError::OutOfRange {
            index,
            len: self.len,
        })
    }

    /// Checked mutable indexed access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, AccessError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(AccessError::OutOfRange { index, len })
    }

    /// The first element. Fails with [`AccessError::Empty`] on an empty
    /// array.
    pub fn front(&self) -> Result<&T, AccessError> {
        self.as_slice().first().ok_or(AccessError::Empty)
    }

    /// Mutable access to the first element.
    pub fn front_mut(&mut self) -> Result<&mut T, AccessError> {
        self.as_mut_slice().first_mut().ok_or(AccessError::Empty)
    }

    /// The last element. Fails with [`AccessError::Empty`] on an empty
    /// array.
    pub fn back(&self) -> Result<&T, AccessError> {
        self.as_slice().last().ok_or(AccessError::Empty)
    }

    /// Mutable access to the last element.
    pub fn back_mut(&mut self) -> Result<&mut T, AccessError> {
        self.as_mut_slice().last_mut().ok_or(AccessError::Empty)
    }

    /// Iterator over the live elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.cursor(), self.len)
    }

    /// Mutable iterator over the live elements.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.cursor(), self.len)
    }

    /// Raw cursor at the first slot.
    ///
    /// Valid until the block is reallocated or released. Pair it with
    /// [`cursor_end`](Self::cursor_end) for unchecked range traversal.
    pub fn cursor(&self) -> RawCursor<T> {
        RawCursor::new(self.raw.ptr())
    }

    /// Raw cursor one past the last live element.
    pub fn cursor_end(&self) -> RawCursor<T> {
        // SAFETY: one past the live range is within the block, or equals
        // the base while empty.
        unsafe { self.cursor().add(self.len) }
    }

    /// Append `value`, growing the block if the array is full.
    ///
    /// Growth doubles the capacity (at least one slot, clamped to
    /// [`max_len`](Self::max_len)). On failure the array is unchanged and
    /// `value` is dropped.
    pub fn push(&mut self, value: T) -> Result<(), AllocError> {
        if self.len == self.raw.capacity() {
            self.grow_for_push()?;
        }
        // SAFETY: a free slot now exists below capacity.
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// Remove and return the last element. Keeps the block.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the new length holds a live element that is
        // now outside the live range, so it is read exactly once.
        Some(unsafe { ptr::read(self.as_ptr().add(self.len)) })
    }

    /// Destroy all elements. Keeps the block.
    pub fn clear(&mut self) {
        // The length drops to zero before any destructor runs, so a
        // panicking Drop cannot expose an already-destroyed element.
        let live = ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len);
        self.len = 0;
        // SAFETY: `live` covered exactly the live range.
        unsafe { ptr::drop_in_place(live) };
    }

    /// Destroy elements beyond `len`. No-op when `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(
            // SAFETY: `len < self.len`, so the tail starts in bounds.
            unsafe { self.as_mut_ptr().add(len) },
            self.len - len,
        );
        self.len = len;
        // SAFETY: `tail` covered the live elements beyond the new length.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Grow to `new_len` with default values, or shrink by destroying the
    /// tail. Growth reserves capacity for `new_len` up front.
    pub fn resize(&mut self, new_len: usize) -> Result<(), AllocError>
    where
        T: Default,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve(new_len)?;
        while self.len < new_len {
            // SAFETY: capacity for `new_len` elements was reserved above.
            unsafe { self.push_unchecked(T::default()) };
        }
        Ok(())
    }

    /// Ensure the block holds at least `min_capacity` slots.
    ///
    /// `min_capacity` is a total, not an increment; anything at or below
    /// the current capacity is a no-op. On failure the array is unchanged.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), AllocError> {
        if min_capacity <= self.raw.capacity() {
            return Ok(());
        }
        self.raw.realloc_to(min_capacity, self.len)
    }

    /// Shrink the block to exactly [`len`](Self::len) slots, releasing it
    /// entirely at length zero. On failure the array is unchanged.
    pub fn shrink_to_fit(&mut self) -> Result<(), AllocError> {
        self.raw.realloc_to(self.len, self.len)
    }

    /// Replace the contents with `len` clones of `value`.
    ///
    /// Existing elements are destroyed first; the block is kept when large
    /// enough. A failed reallocation or a panicking clone leaves a valid
    /// array holding whatever was built so far.
    pub fn assign_fill(&mut self, len: usize, value: T) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.clear();
        self.reserve(len)?;
        for _ in 0..len {
            // SAFETY: capacity for `len` elements was reserved above.
            unsafe { self.push_unchecked(value.clone()) };
        }
        Ok(())
    }

    /// Replace the contents with clones of `values`.
    ///
    /// Same teardown-first contract as [`assign_fill`](Self::assign_fill).
    pub fn assign_from_slice(&mut self, values: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.clear();
        self.reserve(values.len())?;
        for value in values {
            // SAFETY: capacity for the whole slice was reserved above.
            unsafe { self.push_unchecked(value.clone()) };
        }
        Ok(())
    }

    /// Exchange contents, capacity, and length with `other` in O(1).
    ///
    /// Allocator instances travel only when the strategy's
    /// [`on_swap`](coffer_core::Propagation::on_swap) flag is set;
    /// otherwise both stay put, which requires them to be
    /// interchangeable (checked in debug builds).
    pub fn swap(&mut self, other: &mut Self) {
        if self.raw.alloc().propagation().on_swap {
            self.raw.swap_alloc(&mut other.raw);
        } else {
            debug_assert!(
                self.raw.alloc().interchangeable(other.raw.alloc()),
                "swapping arrays bound to non-interchangeable allocators without propagation"
            );
        }
        self.raw.swap_storage(&mut other.raw);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Move the contents out, leaving `self` empty and unallocated behind
    /// a fresh clone of its allocator.
    ///
    /// The returned array owns the original block; no element moves.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = RawBuf::new_in(self.raw.alloc().clone());
        let raw = mem::replace(&mut self.raw, empty);
        let len = mem::replace(&mut self.len, 0);
        Self { raw, len }
    }

    /// Duplicate the array behind the allocator chosen by
    /// [`fork_for_copy`](ArrayAlloc::fork_for_copy).
    ///
    /// The copy's block matches the source's capacity, not just its
    /// length. Failure leaves `self` untouched and returns the error; a
    /// partially built copy destroys itself.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let alloc = self.raw.alloc().fork_for_copy();
        let mut copy = Self::with_capacity_in(self.raw.allocated_slots(), alloc)?;
        for value in self.as_slice() {
            // SAFETY: the source's block is never smaller than its length,
            // and the copy reserved a block of the same size.
            unsafe { copy.push_unchecked(value.clone()) };
        }
        Ok(copy)
    }

    /// Replace the contents with clones of `source`, reusing the block
    /// when possible.
    ///
    /// Existing elements are destroyed up front, so a mid-copy failure
    /// leaves a valid array holding a prefix of `source`, not the old
    /// contents. When the destination allocator's
    /// [`on_copy_assign`](coffer_core::Propagation::on_copy_assign) flag
    /// is set, the source's allocator instance is adopted; a block the
    /// incoming instance could not release is freed by the outgoing one
    /// first.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), AllocError>
    where
        T: Clone,
        A: Clone,
    {
        self.clear();
        if self.raw.alloc().propagation().on_copy_assign {
            if !self.raw.alloc().interchangeable(source.raw.alloc()) {
                self.raw.free();
            }
            self.raw.adopt_alloc(source.raw.alloc().clone());
        }
        self.reserve(source.raw.allocated_slots())?;
        for value in source.as_slice() {
            // SAFETY: capacity for the source's length was reserved above.
            unsafe { self.push_unchecked(value.clone()) };
        }
        Ok(())
    }

    /// Append without the capacity check.
    ///
    /// # Safety
    ///
    /// `len` must be strictly below the physical capacity (always true
    /// for zero-sized `T`).
    unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < self.raw.capacity());
        // SAFETY: the caller guarantees a free slot at `len`.
        unsafe { ptr::write(self.as_mut_ptr().add(self.len), value) };
        self.len += 1;
    }

    fn grow_for_push(&mut self) -> Result<(), AllocError> {
        let required = self
            .len
            .checked_add(1)
            .ok_or(AllocError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        let max = self.raw.max_len();
        if required > max {
            return Err(AllocError::CapacityOverflow {
                requested: required,
            });
        }
        let doubled = self.raw.allocated_slots() * 2;
        let target = cmp::max(required, cmp::min(doubled, max));
        self.raw.realloc_to(target, self.len)
    }
}

impl<T, A: ArrayAlloc> Drop for DynArray<T, A> {
    fn drop(&mut self) {
        // SAFETY: the live range covers exactly `len` elements; the block
        // itself is released by the buffer's drop afterwards.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len));
        }
    }
}

impl<T, A: ArrayAlloc + Default> Default for DynArray<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: ArrayAlloc + Clone> Clone for DynArray<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.handle())
    }

    fn clone_from(&mut self, source: &Self) {
        self.try_clone_from(source).unwrap_or_else(|err| err.handle())
    }
}

impl<T: fmt::Debug, A: ArrayAlloc> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq, A: ArrayAlloc, B: ArrayAlloc> PartialEq<DynArray<T, B>> for DynArray<T, A> {
    fn eq(&self, other: &DynArray<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: ArrayAlloc> Eq for DynArray<T, A> {}

impl<T, A: ArrayAlloc, I: slice::SliceIndex<[T]>> Index<I> for DynArray<T, A> {
    type Output = I::Output;

    /// # Panics
    ///
    /// Panics when the index or range is out of bounds. Use
    /// [`DynArray::at`] for a checked element variant.
    fn index(&self, index: I) -> &I::Output {
        &self.as_slice()[index]
    }
}

impl<T, A: ArrayAlloc, I: slice::SliceIndex<[T]>> IndexMut<I> for DynArray<T, A> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<T, A: ArrayAlloc> Deref for DynArray<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: ArrayAlloc> DerefMut for DynArray<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: ArrayAlloc> IntoIterator for DynArray<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` suppresses the container's drop, so the buffer
        // and the live range move into the iterator exactly once.
        let raw = unsafe { ptr::read(&this.raw) };
        IntoIter::new(raw, this.len)
    }
}

impl<'a, T, A: ArrayAlloc> IntoIterator for &'a DynArray<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: ArrayAlloc> IntoIterator for &'a mut DynArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
