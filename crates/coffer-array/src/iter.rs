//! Safe iteration over array contents.
//!
//! [`Iter`] and [`IterMut`] brand a [`RawCursor`] with the borrow of the
//! array that produced it, turning unchecked cursor arithmetic into safe
//! `Iterator` implementations. [`IntoIter`] owns the buffer outright and
//! yields elements by value, destroying whatever was not consumed.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr;
use std::slice;

use coffer_alloc::ArrayAlloc;

use crate::cursor::RawCursor;
use crate::raw::RawBuf;

/// Immutable array iterator.
///
/// Double-ended, exact-size, fused, and freely clonable. Yielded
/// references live as long as the borrow of the source array.
pub struct Iter<'a, T> {
    head: RawCursor<T>,
    remaining: usize,
    _lives: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    /// `head` must address `remaining` consecutive live elements borrowed
    /// for `'a`.
    pub(crate) fn new(head: RawCursor<T>, remaining: usize) -> Self {
        Self {
            head,
            remaining,
            _lives: PhantomData,
        }
    }

    /// The elements not yet yielded, as a slice.
    pub fn as_slice(&self) -> &'a [T] {
        // SAFETY: construction guarantees `remaining` live elements at
        // `head`, borrowed for 'a.
        unsafe { slice::from_raw_parts(self.head.as_ptr(), self.remaining) }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: at least one un-yielded element lives at `head`.
        let item = unsafe { self.head.as_ref() };
        // SAFETY: moves at most one past the last live element.
        self.head = unsafe { self.head.add(1) };
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn count(self) -> usize {
        self.remaining
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: `remaining` now indexes the last un-yielded element.
        Some(unsafe { self.head.get(self.remaining) })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            remaining: self.remaining,
            _lives: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.as_slice()).finish()
    }
}

// SAFETY: Iter hands out nothing beyond `&T`.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
// SAFETY: see the Send impl.
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

/// Mutable array iterator.
///
/// Double-ended, exact-size, and fused. Yielded references are exclusive
/// and live as long as the mutable borrow of the source array.
pub struct IterMut<'a, T> {
    head: RawCursor<T>,
    remaining: usize,
    _lives: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    /// `head` must address `remaining` consecutive live elements borrowed
    /// exclusively for `'a`.
    pub(crate) fn new(head: RawCursor<T>, remaining: usize) -> Self {
        Self {
            head,
            remaining,
            _lives: PhantomData,
        }
    }

    /// The elements not yet yielded, as a shared slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: construction guarantees `remaining` live elements at
        // `head`; the shared view borrows `self`, pausing mutation.
        unsafe { slice::from_raw_parts(self.head.as_ptr(), self.remaining) }
    }

    /// Consume the iterator, returning the un-yielded tail as a mutable
    /// slice with the full source lifetime.
    pub fn into_slice(self) -> &'a mut [T] {
        // SAFETY: construction guarantees exclusive access to `remaining`
        // live elements at `head` for 'a; `self` is consumed.
        unsafe { slice::from_raw_parts_mut(self.head.as_ptr(), self.remaining) }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: at least one un-yielded element lives at `head`, and
        // the iterator never revisits it, so the exclusive borrow is
        // handed out exactly once.
        let item = unsafe { self.head.as_mut() };
        // SAFETY: moves at most one past the last live element.
        self.head = unsafe { self.head.add(1) };
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: `remaining` now indexes the last un-yielded element,
        // which is never revisited.
        Some(unsafe { self.head.add(self.remaining).as_mut() })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IterMut").field(&self.as_slice()).finish()
    }
}

// SAFETY: IterMut is an exclusive borrow of the elements; sending it
// sends `&mut T` access and nothing else.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
// SAFETY: a shared IterMut only exposes `&T` (via `as_slice`).
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

/// By-value iterator that owns the array's buffer.
///
/// Yields the remaining elements front to back (or back to front), then
/// destroys un-consumed elements and releases the buffer on drop.
pub struct IntoIter<T, A: ArrayAlloc> {
    buf: RawBuf<T, A>,
    front: usize,
    back: usize,
}

impl<T, A: ArrayAlloc> IntoIter<T, A> {
    /// The first `len` slots of `buf` must hold live elements whose
    /// ownership transfers to the iterator.
    pub(crate) fn new(buf: RawBuf<T, A>, len: usize) -> Self {
        Self {
            buf,
            front: 0,
            back: len,
        }
    }

    /// The elements not yet yielded, as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots front..back hold live elements.
        unsafe {
            slice::from_raw_parts(self.buf.ptr().as_ptr().add(self.front), self.back - self.front)
        }
    }
}

impl<T, A: ArrayAlloc> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let slot = self.front;
        self.front += 1;
        // SAFETY: slot held a live element and is now outside front..back,
        // so it is read exactly once and never dropped in place.
        Some(unsafe { ptr::read(self.buf.ptr().as_ptr().add(slot)) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: ArrayAlloc> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: see `next`; `back` now names the vacated slot.
        Some(unsafe { ptr::read(self.buf.ptr().as_ptr().add(self.back)) })
    }
}

impl<T, A: ArrayAlloc> ExactSizeIterator for IntoIter<T, A> {
    fn len(&self) -> usize {
        self.back - self.front
    }
}

impl<T, A: ArrayAlloc> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: ArrayAlloc> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: ArrayAlloc> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let remaining = self.back - self.front;
        // SAFETY: slots front..back still hold live elements; the buffer
        // itself is released by RawBuf's drop afterwards.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.ptr().as_ptr().add(self.front),
                remaining,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_alloc::SystemAlloc;
    use std::ptr::NonNull;

    fn iter_over<T>(slice: &[T]) -> Iter<'_, T> {
        let base = NonNull::new(slice.as_ptr().cast_mut()).unwrap_or(NonNull::dangling());
        Iter::new(RawCursor::new(base), slice.len())
    }

    fn iter_mut_over<T>(slice: &mut [T]) -> IterMut<'_, T> {
        let base = NonNull::new(slice.as_mut_ptr()).unwrap_or(NonNull::dangling());
        IterMut::new(RawCursor::new(base), slice.len())
    }

    #[test]
    fn forward_iteration_preserves_order() {
        let data = [1, 2, 3, 4];
        let collected: Vec<i32> = iter_over(&data).copied().collect();
        assert_eq!(collected, vec![1, 2, 3, 4]);
    }

    #[test]
    fn reverse_iteration_flips_order() {
        let data = [1, 2, 3];
        let collected: Vec<i32> = iter_over(&data).rev().copied().collect();
        assert_eq!(collected, vec![3, 2, 1]);
    }

    #[test]
    fn ends_meet_in_the_middle() {
        let data = [10, 20, 30, 40, 50];
        let mut it = iter_over(&data);
        assert_eq!(it.next(), Some(&10));
        assert_eq!(it.next_back(), Some(&50));
        assert_eq!(it.next(), Some(&20));
        assert_eq!(it.next_back(), Some(&40));
        assert_eq!(it.next(), Some(&30));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn exact_size_tracks_consumption() {
        let data = [0u8; 6];
        let mut it = iter_over(&data);
        assert_eq!(it.len(), 6);
        assert_eq!(it.size_hint(), (6, Some(6)));
        it.next();
        it.next_back();
        assert_eq!(it.len(), 4);
        assert_eq!(it.as_slice().len(), 4);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let data = [9];
        let mut it = iter_over(&data);
        assert_eq!(it.next(), Some(&9));
        for _ in 0..3 {
            assert_eq!(it.next(), None);
            assert_eq!(it.next_back(), None);
        }
    }

    #[test]
    fn cloned_iterator_advances_independently() {
        let data = [1, 2, 3];
        let mut a = iter_over(&data);
        a.next();
        let mut b = a.clone();
        assert_eq!(a.next(), Some(&2));
        assert_eq!(b.next(), Some(&2));
        assert_eq!(b.next(), Some(&3));
        assert_eq!(a.next(), Some(&3));
    }

    #[test]
    fn zero_sized_elements_iterate_by_count() {
        let data = [(), (), ()];
        assert_eq!(iter_over(&data).count(), 3);
        let mut it = iter_over(&data);
        it.next_back();
        assert_eq!(it.len(), 2);
    }

    #[test]
    fn iter_mut_writes_through() {
        let mut data = [1, 2, 3];
        for value in iter_mut_over(&mut data) {
            *value *= 10;
        }
        assert_eq!(data, [10, 20, 30]);
    }

    #[test]
    fn iter_mut_into_slice_returns_tail() {
        let mut data = [1, 2, 3, 4];
        let mut it = iter_mut_over(&mut data);
        it.next();
        let tail = it.into_slice();
        assert_eq!(tail, &mut [2, 3, 4]);
        tail[0] = 0;
        assert_eq!(data, [1, 0, 3, 4]);
    }

    #[test]
    fn into_iter_yields_and_drops_cleanly() {
        let buf = RawBuf::<String, _>::with_capacity_in(3, SystemAlloc).unwrap();
        for (i, text) in ["a", "b", "c"].into_iter().enumerate() {
            // SAFETY: slot i is within the three-slot block.
            unsafe { buf.ptr().as_ptr().add(i).write(String::from(text)) };
        }
        let mut it = IntoIter::new(buf, 3);
        assert_eq!(it.next().as_deref(), Some("a"));
        assert_eq!(it.next_back().as_deref(), Some("c"));
        assert_eq!(it.len(), 1);
        // "b" is destroyed by the iterator's drop.
    }

    #[test]
    fn debug_shows_remaining_elements() {
        let data = [1, 2, 3];
        let mut it = iter_over(&data);
        it.next();
        assert_eq!(format!("{it:?}"), "Iter([2, 3])");
    }
}
