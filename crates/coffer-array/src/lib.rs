//! Growable contiguous arrays with explicit capacity control.
//!
//! Provides [`DynArray`], a dynamic array that keeps length and capacity
//! as separate, observable quantities and takes its memory from a
//! pluggable [`ArrayAlloc`](coffer_alloc::ArrayAlloc) strategy. This
//! crate is one of two that may contain `unsafe` code (along with
//! `coffer-alloc`); every `unsafe` block carries a `// SAFETY:` comment.
//!
//! # Architecture
//!
//! ```text
//! DynArray<T, A> (length, growth policy, element lifecycle)
//! ├── RawBuf<T, A> (block ownership, allocate-copy-free-install)
//! │   └── A: ArrayAlloc (strategy + identity flags, coffer-alloc)
//! ├── RawCursor<T> (unchecked element addresses)
//! └── Iter / IterMut / IntoIter (safe views over cursor ranges)
//! ```
//!
//! # Failure model
//!
//! Everything that can allocate returns `Result<_, AllocError>` and
//! leaves the array untouched on failure; growth acquires the new block
//! before anything else happens. The panicking conveniences (`Clone`,
//! `Index`, [`dynarray!`]) sit on top of the fallible core.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod cursor;
pub mod iter;
mod raw;

// Public re-exports for the primary API surface.
pub use array::DynArray;
pub use coffer_core::{AccessError, AllocError};
pub use cursor::RawCursor;
pub use iter::{IntoIter, Iter, IterMut};

/// Build a [`DynArray`] on the system allocator, `vec!`-style.
///
/// Accepts an element list, a `value; len` repetition, or nothing.
/// Allocation failure is reported through
/// [`AllocError::handle`](coffer_core::AllocError::handle).
///
/// ```
/// use coffer_array::{dynarray, DynArray};
///
/// let primes = dynarray![2, 3, 5, 7];
/// assert_eq!(primes.as_slice(), &[2, 3, 5, 7]);
///
/// let zeros: DynArray<u8> = dynarray![0; 16];
/// assert_eq!(zeros.len(), 16);
///
/// let empty: DynArray<char> = dynarray![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! dynarray {
    () => {
        $crate::DynArray::new()
    };
    ($value:expr; $len:expr) => {
        match $crate::DynArray::from_fill($len, $value) {
            Ok(array) => array,
            Err(err) => err.handle(),
        }
    };
    ($($value:expr),+ $(,)?) => {
        match $crate::DynArray::from_array([$($value),+]) {
            Ok(array) => array,
            Err(err) => err.handle(),
        }
    };
}
