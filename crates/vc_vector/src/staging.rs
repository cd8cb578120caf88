use core::ops::Range;
use core::ptr;

use vc_raw::RawMemory;

// -----------------------------------------------------------------------------
// Staging

/// A block under construction during reallocation.
///
/// Tracks the contiguous range of slots that already hold live values.
/// If the reallocation unwinds before [`commit`](Self::commit), those values
/// are dropped and the block is released, leaving the old block untouched.
pub(crate) struct Staging<T> {
    block: RawMemory<T>,
    live: Range<usize>,
}

impl<T> Drop for Staging<T> {
    #[cold]
    fn drop(&mut self) {
        if self.live.is_empty() {
            return;
        }

        log::warn!(
            "reallocation of {} slots interrupted, dropping {} staged values",
            self.block.capacity(),
            self.live.len(),
        );

        // SAFETY: `live` only covers written slots of `block`.
        unsafe {
            let first = self.block.offset_mut(self.live.start);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, self.live.len()));
        }
    }
}

impl<T> Staging<T> {
    #[inline(always)]
    pub const fn new(block: RawMemory<T>) -> Self {
        Self { block, live: 0..0 }
    }

    /// Returns a pointer to slot `index` of the staged block.
    ///
    /// # Safety
    /// - `index` must be within `0..=capacity`
    #[inline(always)]
    pub unsafe fn slot(&mut self, index: usize) -> *mut T {
        unsafe { self.block.offset_mut(index) }
    }

    /// Writes `value` into the empty staging block at `index`.
    ///
    /// # Safety
    /// - `index` must be within `0..capacity`
    /// - No slot may be live yet
    #[inline]
    pub unsafe fn seed(&mut self, index: usize, value: T) {
        debug_assert!(self.live.is_empty());
        unsafe {
            self.slot(index).write(value);
        }
        self.live = index..index + 1;
    }

    /// Marks `count` more slots before the live range as initialized.
    ///
    /// # Safety
    /// - The `count` slots before `live.start` must have been written
    #[inline(always)]
    pub unsafe fn grow_front(&mut self, count: usize) {
        self.live.start -= count;
    }

    /// Marks `count` more slots after the live range as initialized.
    ///
    /// # Safety
    /// - The `count` slots from `live.end` must have been written
    #[inline(always)]
    pub unsafe fn grow_back(&mut self, count: usize) {
        self.live.end += count;
    }

    /// Hands out the finished block, the staged values become owned by the caller.
    #[inline]
    pub fn commit(mut self) -> RawMemory<T> {
        self.live = 0..0;
        self.block.take()
    }
}
