//! Pluggable allocation strategy for the Coffer containers.
//!
//! Containers never call `std::alloc` directly. They go through the
//! [`ArrayAlloc`] trait, which bundles raw storage acquisition with the
//! instance-identity questions a container has to answer when values are
//! copied or swapped: which allocator does the copy start with, do
//! allocators travel on assignment, and may one instance free what
//! another allocated.
//!
//! This crate is one of two in the workspace that may contain `unsafe`
//! code (along with `coffer-array`). Every `unsafe` block carries a
//! `// SAFETY:` comment.
//!
//! # Contract summary
//!
//! ```text
//! ArrayAlloc (strategy trait)
//! ├── allocate / deallocate      raw storage, Layout-based, fallible
//! ├── fork_for_copy              instance selection for copy construction
//! ├── propagation                explicit policy flags (coffer-core)
//! ├── interchangeable            may instances free each other's blocks?
//! └── max_bytes                  strategy-imposed size ceiling
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod system;
pub mod traits;

// Public re-exports for the primary API surface.
pub use system::SystemAlloc;
pub use traits::ArrayAlloc;
