//! Allocator propagation policy.
//!
//! When a container is copy-assigned or swapped, its allocator instance may
//! either stay put or travel with the operation. Stateless allocators do
//! not care; stateful ones (arenas, pools, tracking wrappers) very much do.
//! [`Propagation`] makes the choice explicit configuration rather than
//! something inferred from the allocator type.
//!
//! Move construction and move assignment have no flag: a Rust move always
//! transfers the allocator, because it is a field of the moved value.
//! Copy *construction* is likewise not a flag — the allocator decides via
//! its `fork_for_copy` hook which instance the new container starts with.

/// Explicit propagation flags consulted by the container.
///
/// All values are plain data; the container reads them through the
/// allocator's `propagation()` hook at each relevant operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Propagation {
    /// Adopt the source's allocator during copy assignment.
    ///
    /// When false, the destination keeps its own allocator and the copied
    /// elements are placed in storage it acquires itself.
    pub on_copy_assign: bool,

    /// Exchange allocators during `swap`.
    ///
    /// When false, `swap` exchanges only buffers and lengths; the two
    /// allocators must then be interchangeable, since each ends up owning
    /// storage the other acquired. Debug builds assert this.
    pub on_swap: bool,
}

impl Propagation {
    /// Keep allocators where they are for every operation.
    ///
    /// The right choice for stateless allocators, and the default.
    pub const NEVER: Self = Self {
        on_copy_assign: false,
        on_swap: false,
    };

    /// Propagate the allocator on both copy assignment and swap.
    ///
    /// The safe choice for stateful allocators whose instances are not
    /// interchangeable.
    pub const ALWAYS: Self = Self {
        on_copy_assign: true,
        on_swap: true,
    };

    /// Create the default (non-propagating) policy.
    pub const fn new() -> Self {
        Self::NEVER
    }
}

impl Default for Propagation {
    fn default() -> Self {
        Self::NEVER
    }
}
