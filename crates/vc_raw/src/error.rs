use core::alloc::Layout;

use thiserror::Error;

// -----------------------------------------------------------------------------
// AllocError

/// The reason a [`RawMemory`](crate::RawMemory) block could not be acquired.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AllocError {
    /// `capacity * size_of::<T>()` overflows or exceeds `isize::MAX`.
    #[error("capacity overflow: {capacity} elements of {elem_size} bytes")]
    CapacityOverflow { capacity: usize, elem_size: usize },

    /// The global allocator returned null.
    #[error("allocator failed to provide {size} bytes (align {align})")]
    OutOfMemory { size: usize, align: usize },
}

impl AllocError {
    #[inline]
    pub(crate) const fn out_of_memory(layout: Layout) -> Self {
        Self::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// Diverges the way an infallible allocation would.
    ///
    /// Capacity overflow panics, allocator exhaustion is forwarded
    /// to [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
    #[cold]
    #[inline(never)]
    pub fn handle_error(self) -> ! {
        match self {
            Self::CapacityOverflow { .. } => panic!("{self}"),
            Self::OutOfMemory { size, align } => {
                // SAFETY: `size` and `align` were taken from a valid `Layout`.
                let layout = unsafe { Layout::from_size_align_unchecked(size, align) };
                alloc::alloc::handle_alloc_error(layout)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
