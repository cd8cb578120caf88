use alloc::alloc as malloc;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::panic::{RefUnwindSafe, UnwindSafe};
use core::ptr::NonNull;

use crate::{AllocError, array_layout, array_layout_unchecked};

// -----------------------------------------------------------------------------
// RawMemory

/// An owned, uninitialized block sized for exactly `capacity` values of `T`.
///
/// `RawMemory` only acquires and releases memory. Whether a slot holds a live
/// value is tracked by the owner, which must drop every value it placed in the
/// block before the block is released.
///
/// The empty state (capacity `0`) owns no allocation and its address is a
/// dangling, well-aligned pointer. Zero-sized types never allocate either,
/// but the requested capacity is still recorded.
///
/// Ownership moves like any Rust value; [`take`](Self::take) moves the block
/// out and leaves the empty state behind. Blocks cannot be cloned.
///
/// # Examples
///
/// ```
/// use vc_raw::RawMemory;
///
/// let mut block = RawMemory::<String>::with_capacity(2);
/// assert_eq!(block.capacity(), 2);
///
/// unsafe {
///     block.offset_mut(0).write(String::from("vc"));
///     assert_eq!(block.get(0), "vc");
///
///     // The block never drops values, so the owner does.
///     block.offset_mut(0).drop_in_place();
/// }
/// ```
pub struct RawMemory<T> {
    data: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: `RawMemory` uniquely owns its block, like `Box<[MaybeUninit<T>]>`.
unsafe impl<T: Send> Send for RawMemory<T> {}
// SAFETY: Shared access only hands out `&T` or raw pointers.
unsafe impl<T: Sync> Sync for RawMemory<T> {}
impl<T: UnwindSafe> UnwindSafe for RawMemory<T> {}
impl<T: RefUnwindSafe> RefUnwindSafe for RawMemory<T> {}

impl<T> Drop for RawMemory<T> {
    fn drop(&mut self) {
        if self.is_allocated() {
            // SAFETY: the block was allocated with this exact layout,
            // which was validated by `array_layout` at that time.
            unsafe {
                let layout = array_layout_unchecked::<T>(self.capacity);
                malloc::dealloc(self.data.as_ptr().cast(), layout);
            }
        }
    }
}

impl<T> Default for RawMemory<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RawMemory<T> {
    /// Returns `true` if values of `T` occupy no memory.
    #[inline(always)]
    const fn is_zst() -> bool {
        size_of::<T>() == 0
    }

    /// Creates the empty block without allocating.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            data: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates an uninitialized block for `capacity` values.
    ///
    /// # Panics
    /// Panics on capacity overflow. Allocator exhaustion is reported through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(block) => block,
            Err(e) => e.handle_error(),
        }
    }

    /// Allocates an uninitialized block for `capacity` values.
    ///
    /// Returns an error instead of diverging, no partial block is ever returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_raw::{AllocError, RawMemory};
    ///
    /// let block = RawMemory::<u64>::try_with_capacity(8).unwrap();
    /// assert_eq!(block.capacity(), 8);
    ///
    /// let err = RawMemory::<u64>::try_with_capacity(usize::MAX).unwrap_err();
    /// assert!(matches!(err, AllocError::CapacityOverflow { .. }));
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        if Self::is_zst() {
            return Ok(Self {
                data: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }

        let layout = array_layout::<T>(capacity)?;
        // SAFETY: `layout` has a non-zero size, `T` is not a ZST and `capacity > 0`.
        let ptr = unsafe { malloc::alloc(layout) };

        match NonNull::new(ptr) {
            Some(data) => Ok(Self {
                data: data.cast(),
                capacity,
                _marker: PhantomData,
            }),
            None => Err(AllocError::out_of_memory(layout)),
        }
    }

    /// Returns the number of slots in the block.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if this block owns an allocation.
    #[inline(always)]
    pub const fn is_allocated(&self) -> bool {
        self.capacity != 0 && !Self::is_zst()
    }

    /// Returns the address of the first slot.
    ///
    /// The pointer is dangling for the empty state.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Returns the mutable address of the first slot.
    ///
    /// The pointer is dangling for the empty state.
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    /// Returns a pointer to the slot at `offset`.
    ///
    /// `offset == capacity` yields the end-of-block pointer, which must not
    /// be dereferenced.
    ///
    /// # Safety
    /// - `offset` must be within `0..=capacity`
    #[cfg_attr(any(debug_assertions, feature = "debug"), track_caller)]
    #[inline(always)]
    pub unsafe fn offset(&self, offset: usize) -> *const T {
        #[cfg(any(debug_assertions, feature = "debug"))]
        assert!(
            offset <= self.capacity,
            "offset {offset} is past the end of a block of {} slots",
            self.capacity,
        );

        // SAFETY: `offset <= capacity` stays inside or one past the block.
        unsafe { self.data.as_ptr().add(offset) }
    }

    /// Returns a mutable pointer to the slot at `offset`.
    ///
    /// # Safety
    /// - `offset` must be within `0..=capacity`
    #[cfg_attr(any(debug_assertions, feature = "debug"), track_caller)]
    #[inline(always)]
    pub unsafe fn offset_mut(&mut self, offset: usize) -> *mut T {
        #[cfg(any(debug_assertions, feature = "debug"))]
        assert!(
            offset <= self.capacity,
            "offset {offset} is past the end of a block of {} slots",
            self.capacity,
        );

        // SAFETY: `offset <= capacity` stays inside or one past the block.
        unsafe { self.data.as_ptr().add(offset) }
    }

    /// Returns a shared reference to the value at `index`.
    ///
    /// # Safety
    /// - `index` must be within `0..capacity`
    /// - The slot at `index` must hold a live value
    #[cfg_attr(any(debug_assertions, feature = "debug"), track_caller)]
    #[inline(always)]
    pub unsafe fn get(&self, index: usize) -> &T {
        #[cfg(any(debug_assertions, feature = "debug"))]
        assert!(
            index < self.capacity,
            "index {index} is out of bounds of a block of {} slots",
            self.capacity,
        );

        unsafe { &*self.data.as_ptr().add(index) }
    }

    /// Returns a mutable reference to the value at `index`.
    ///
    /// # Safety
    /// - `index` must be within `0..capacity`
    /// - The slot at `index` must hold a live value
    #[cfg_attr(any(debug_assertions, feature = "debug"), track_caller)]
    #[inline(always)]
    pub unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        #[cfg(any(debug_assertions, feature = "debug"))]
        assert!(
            index < self.capacity,
            "index {index} is out of bounds of a block of {} slots",
            self.capacity,
        );

        unsafe { &mut *self.data.as_ptr().add(index) }
    }

    /// Exchanges the blocks owned by `self` and `other`.
    ///
    /// Constant time, never allocates.
    #[inline(always)]
    pub const fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the block out, leaving the empty state in `self`.
    #[inline(always)]
    pub const fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }
}

impl<T> fmt::Debug for RawMemory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMemory")
            .field("data", &self.data)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::RawMemory;
    use crate::AllocError;

    #[test]
    fn is_sync_send() {
        use core::panic::{RefUnwindSafe, UnwindSafe};

        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}
        fn is_unwindsafe<T: UnwindSafe>() {}
        fn is_refunwindsafe<T: RefUnwindSafe>() {}

        is_send::<RawMemory<i32>>();
        is_sync::<RawMemory<i32>>();
        is_unwindsafe::<RawMemory<i32>>();
        is_refunwindsafe::<RawMemory<i32>>();
    }

    #[test]
    fn empty() {
        let block = RawMemory::<u32>::new();
        assert_eq!(block.capacity(), 0);
        assert!(!block.is_allocated());
        assert_eq!(block.as_ptr(), core::ptr::NonNull::<u32>::dangling().as_ptr());

        let block = RawMemory::<u32>::with_capacity(0);
        assert_eq!(block.capacity(), 0);
        assert!(!block.is_allocated());
    }

    #[test]
    fn allocate_and_access() {
        let mut block = RawMemory::<u64>::with_capacity(4);
        assert_eq!(block.capacity(), 4);
        assert!(block.is_allocated());
        assert_eq!(block.as_ptr() as usize % align_of::<u64>(), 0);

        unsafe {
            for i in 0..4 {
                block.offset_mut(i).write(i as u64 * 10);
            }
            assert_eq!(*block.get(2), 20);
            *block.get_mut(3) += 1;
            assert_eq!(*block.get(3), 31);
            assert_eq!(block.offset(4), block.as_ptr().add(4));
        }
    }

    #[test]
    fn zero_sized() {
        let mut block = RawMemory::<()>::with_capacity(16);
        assert_eq!(block.capacity(), 16);
        assert!(!block.is_allocated());
        unsafe {
            block.offset_mut(15).write(());
            let () = *block.get(15);
        }
    }

    #[test]
    fn overflow() {
        let err = RawMemory::<u32>::try_with_capacity(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            AllocError::CapacityOverflow {
                capacity: usize::MAX,
                elem_size: 4,
            }
        );

        let err = RawMemory::<u8>::try_with_capacity(isize::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, AllocError::CapacityOverflow { .. }));
    }

    #[test]
    fn swap_and_take() {
        let mut a = RawMemory::<u8>::with_capacity(3);
        let mut b = RawMemory::<u8>::new();
        let addr = a.as_ptr();

        a.swap(&mut b);
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 3);
        assert_eq!(b.as_ptr(), addr);

        let c = b.take();
        assert_eq!(b.capacity(), 0);
        assert!(!b.is_allocated());
        assert_eq!(c.capacity(), 3);
        assert_eq!(c.as_ptr(), addr);
    }

    #[test]
    fn never_drops_values() {
        use alloc::rc::Rc;

        let shared = Rc::new(5);
        let mut block = RawMemory::<Rc<i32>>::with_capacity(2);
        unsafe {
            block.offset_mut(0).write(Rc::clone(&shared));
        }
        assert_eq!(Rc::strong_count(&shared), 2);

        // Releasing the block leaks the value instead of dropping it.
        drop(block);
        assert_eq!(Rc::strong_count(&shared), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "past the end")]
    fn offset_past_end() {
        let block = RawMemory::<u8>::with_capacity(2);
        let _ = unsafe { block.offset(3) };
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of bounds")]
    fn index_at_end() {
        let mut block = RawMemory::<u8>::with_capacity(2);
        unsafe {
            block.offset_mut(0).write(1);
            block.offset_mut(1).write(2);
            let _ = block.get(2);
        }
    }
}
