//! Container-specific error types.
//!
//! Two small taxonomies: [`AccessError`] for checked element access and
//! [`AllocError`] for anything that goes wrong while acquiring storage.
//! Unchecked access (`get_unchecked`, raw cursor arithmetic) is a caller
//! contract and deliberately has no error representation.

use std::alloc::Layout;
use std::error::Error;
use std::fmt;

/// Errors from checked element access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// A checked index was at or past the live-element range.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The container length at the time of the call.
        len: usize,
    },
    /// `front`/`back` was called on a container with no elements.
    Empty,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::Empty => write!(f, "container is empty"),
        }
    }
}

impl Error for AccessError {}

/// Errors from acquiring or growing storage.
///
/// Every allocating container operation returns `Result<_, AllocError>`
/// rather than aborting, so callers can degrade gracefully when memory is
/// scarce. The panicking convenience surfaces (`Clone`, the `dynarray!`
/// macro) escalate through [`AllocError::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested element count exceeds what the address space or the
    /// allocator can ever represent; no allocation was attempted.
    CapacityOverflow {
        /// Number of elements requested.
        requested: usize,
    },
    /// The allocator declined a well-formed request.
    Exhausted {
        /// The layout that was refused.
        layout: Layout,
    },
}

impl AllocError {
    /// Escalate into the process-wide failure path.
    ///
    /// Capacity overflow is a logic-sized failure and panics; genuine
    /// exhaustion is routed through [`std::alloc::handle_alloc_error`],
    /// matching what the standard containers do when they cannot return
    /// an error. Only the infallible convenience surfaces call this.
    pub fn handle(self) -> ! {
        match self {
            Self::CapacityOverflow { requested } => {
                panic!("capacity overflow: requested {requested} elements")
            }
            Self::Exhausted { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: requested {requested} elements")
            }
            Self::Exhausted { layout } => {
                write!(
                    f,
                    "allocation of {} bytes (align {}) failed",
                    layout.size(),
                    layout.align()
                )
            }
        }
    }
}

impl Error for AllocError {}
