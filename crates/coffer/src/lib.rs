//! Coffer: growable arrays with explicit capacity control and pluggable
//! allocation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Coffer sub-crates. For most users, adding `coffer` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use coffer::prelude::*;
//!
//! // Collect squares with one up-front allocation.
//! let mut values = DynArray::with_capacity(10)?;
//! for i in 0..10u64 {
//!     values.push(i * i)?;
//! }
//! assert_eq!(values.capacity(), 10);
//! assert_eq!(values.back(), Ok(&81));
//!
//! // Trim the block once the working set is known.
//! values.truncate(4);
//! values.shrink_to_fit()?;
//! assert_eq!(values.as_slice(), &[0, 1, 4, 9]);
//! assert_eq!(values.capacity(), 4);
//! # Ok::<(), AllocError>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for items not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`array`] | `coffer-array` | `DynArray`, iterators, raw cursors, `dynarray!` |
//! | [`alloc`] | `coffer-alloc` | The `ArrayAlloc` strategy trait and `SystemAlloc` |
//! | [`types`] | `coffer-core` | Error taxonomy and the propagation policy flags |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Containers, iterators, and cursors (`coffer-array`).
///
/// Most users only need [`array::DynArray`] from this module; it is also
/// available in the [`prelude`]. The unchecked [`array::RawCursor`] lives
/// here too.
pub use coffer_array as array;

/// Allocation strategies (`coffer-alloc`).
///
/// The [`alloc::ArrayAlloc`] trait is the extension point for custom
/// memory sources; [`alloc::SystemAlloc`] is the default strategy.
pub use coffer_alloc as alloc;

/// Errors and policy flags (`coffer-core`).
///
/// [`types::AllocError`] and [`types::AccessError`] are the two failure
/// currencies of the workspace; [`types::Propagation`] steers allocator
/// identity across copy assignment and swap.
pub use coffer_core as types;

/// `vec!`-style construction macro, re-exported from `coffer-array`.
pub use coffer_array::dynarray;

/// Common imports for typical Coffer usage.
///
/// ```rust
/// use coffer::prelude::*;
/// ```
///
/// This imports the container, its iterators, the strategy trait, and the
/// error types.
pub mod prelude {
    // Containers and iterators
    pub use coffer_array::{DynArray, IntoIter, Iter, IterMut};

    // Allocation strategy
    pub use coffer_alloc::{ArrayAlloc, SystemAlloc};

    // Errors and policy
    pub use coffer_core::{AccessError, AllocError, Propagation};
}
