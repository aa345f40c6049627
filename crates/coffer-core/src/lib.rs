//! Core types for the Coffer container workspace.
//!
//! This is the leaf crate with zero dependencies. It defines the error
//! taxonomy shared by the allocator and container crates, and the
//! [`Propagation`] policy that governs how an allocator instance travels
//! between containers during copy assignment and swap.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod policy;

// Public re-exports for the primary API surface.
pub use error::{AccessError, AllocError};
pub use policy::Propagation;
