use core::marker::PhantomData;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

use vc_raw::{AllocError, RawMemory};

use crate::TryInsertError;
use crate::relocate::{Bitwise, Relocate, clone_into_uninit};
use crate::staging::Staging;

// -----------------------------------------------------------------------------
// Vector

/// A growable array built directly on a [`RawMemory`] block.
///
/// Slots `0..len` hold live values, slots `len..capacity` are uninitialized.
/// When an insertion finds the block full, a block of twice the capacity
/// (or one slot, for an empty vector) is allocated and the live values are
/// carried over with the relocation strategy `R`, see [`Relocate`].
///
/// Reallocation invalidates every outstanding pointer into the vector;
/// insertion and removal shift the values at or after the affected index.
/// The borrow checker already rejects references that outlive a mutation,
/// raw pointers obtained through [`as_ptr`](Self::as_ptr) must be refreshed.
///
/// # Examples
///
/// ```
/// use vc_vector::Vector;
///
/// let mut v = Vector::new();
/// v.push(1);
/// v.push(2);
/// v.push(3);
/// assert_eq!(v, [1, 2, 3]);
///
/// v.insert(1, 9);
/// assert_eq!(v, [1, 9, 2, 3]);
///
/// assert_eq!(v.remove(0), 1);
/// assert_eq!(v.pop(), Some(3));
/// assert_eq!(v, [9, 2]);
/// assert_eq!(v.capacity(), 4);
/// ```
pub struct Vector<T, R = Bitwise> {
    buf: RawMemory<T>,
    len: usize,
    _policy: PhantomData<fn() -> R>,
}

impl<T, R> Drop for Vector<T, R> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() {
            // SAFETY: `0..len` are live. The block is released by `RawMemory`.
            unsafe {
                ptr::drop_in_place(self.as_mut_slice());
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Default policy

impl<T> Vector<T> {
    /// Creates an empty vector without allocating.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::empty()
    }

    /// Creates an empty vector with room for exactly `capacity` values.
    ///
    /// # Panics
    /// Panics on capacity overflow.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, Bitwise)
    }

    /// Creates an empty vector with room for exactly `capacity` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_vector::{AllocError, Vector};
    ///
    /// let v = Vector::<u16>::try_with_capacity(8).unwrap();
    /// assert_eq!(v.capacity(), 8);
    ///
    /// let err = Vector::<u16>::try_with_capacity(usize::MAX).unwrap_err();
    /// assert!(matches!(err, AllocError::CapacityOverflow { .. }));
    /// ```
    #[inline]
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self::from_block(RawMemory::try_with_capacity(capacity)?))
    }

    /// Creates a vector of `len` default values, with capacity `len`.
    ///
    /// ```
    /// use vc_vector::Vector;
    ///
    /// let v = Vector::<f32>::with_len(5);
    /// assert_eq!(v, [0.0; 5]);
    /// assert_eq!(v.capacity(), 5);
    /// ```
    #[inline]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut vector = Self::with_capacity(len);
        vector.resize(len);
        vector
    }

    /// Creates a vector of `n` clones of `elem`.
    pub fn from_elem(elem: T, n: usize) -> Self
    where
        T: Clone,
    {
        let mut vector = Self::with_capacity(n);
        if n > 0 {
            vector.resize_with(n - 1, || elem.clone());
            vector.push(elem);
        }
        vector
    }
}

// -----------------------------------------------------------------------------
// Basic methods

impl<T, R> Vector<T, R> {
    #[inline(always)]
    pub(crate) const fn empty() -> Self {
        Self {
            buf: RawMemory::new(),
            len: 0,
            _policy: PhantomData,
        }
    }

    #[inline(always)]
    const fn from_block(buf: RawMemory<T>) -> Self {
        Self {
            buf,
            len: 0,
            _policy: PhantomData,
        }
    }

    /// Creates an empty vector using the relocation strategy `policy`.
    #[inline(always)]
    pub fn with_policy(_policy: R) -> Self
    where
        R: Relocate<T>,
    {
        Self::empty()
    }

    /// Creates an empty vector with room for exactly `capacity` values,
    /// using the relocation strategy `policy`.
    #[inline]
    pub fn with_capacity_and_policy(capacity: usize, _policy: R) -> Self
    where
        R: Relocate<T>,
    {
        Self::from_block(RawMemory::with_capacity(capacity))
    }

    /// Returns the number of live values.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds no value.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots of the current block.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns a raw pointer to the first slot.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Returns a raw mutable pointer to the first slot.
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// Returns the live values as a slice.
    #[inline(always)]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: `0..len` are live and the pointer is non-null and aligned.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// Returns the live values as a mutable slice.
    #[inline(always)]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `0..len` are live and the pointer is non-null and aligned.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Removes the last value and returns it, or `None` if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            // SAFETY: the slot was live and is now outside `0..len`.
            unsafe { Some(self.buf.offset(self.len).read()) }
        }
    }

    /// Removes the value at `index`, shifting the following values left.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// ```
    /// use vc_vector::vector;
    ///
    /// let mut v = vector![1, 2, 3];
    /// assert_eq!(v.remove(1), 2);
    /// assert_eq!(v, [1, 3]);
    /// ```
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[inline(never)]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }

        // SAFETY: `index < len`, the tail `index + 1..len` is live.
        unsafe {
            let slot = self.buf.offset_mut(index);
            let value = slot.read();
            ptr::copy(slot.add(1), slot, len - index - 1);
            self.len = len - 1;
            value
        }
    }

    /// Drops the values past `len`, keeping the capacity.
    ///
    /// Does nothing if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        // SAFETY: `len..self.len` are live. The length is updated first
        // so a panicking destructor cannot cause a double drop.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.buf.offset_mut(len), self.len - len);
            self.len = len;
            ptr::drop_in_place(tail);
        }
    }

    /// Drops all values, keeping the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges the contents of two vectors in constant time.
    #[inline]
    pub fn swap_with(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the block out, leaving `self` empty with capacity `0`.
    #[inline]
    pub(crate) fn take_block(&mut self) -> (RawMemory<T>, usize) {
        let len = mem::replace(&mut self.len, 0);
        (self.buf.take(), len)
    }
}

// -----------------------------------------------------------------------------
// Growth

/// Capacity after one growth step: `max(1, 2 * capacity)`.
#[inline]
fn grown_capacity<T>(capacity: usize) -> Result<usize, AllocError> {
    if capacity == 0 {
        return Ok(1);
    }
    capacity
        .checked_mul(2)
        .ok_or(AllocError::CapacityOverflow {
            capacity,
            elem_size: size_of::<T>(),
        })
}

impl<T, R: Relocate<T>> Vector<T, R> {
    /// Installs `block` as the current block and drops what the old one still owns.
    ///
    /// # Safety
    /// - `block[0..len]` must be live
    /// - The live values of the old block must have been relocated with `R`
    unsafe fn commit_block(&mut self, mut block: RawMemory<T>, len: usize) {
        self.buf.swap(&mut block);
        let old_len = mem::replace(&mut self.len, len);

        if !R::CONSUMES_SOURCE {
            // SAFETY: the copies live in the new block, the originals are
            // still alive in the old one and owned by nobody else.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(block.as_mut_ptr(), old_len));
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn relocate_into(&mut self, mut block: RawMemory<T>) {
        log::trace!(
            "vector relocating {} values from {} to {} slots",
            self.len,
            self.capacity(),
            block.capacity(),
        );

        // SAFETY: `block` is fresh and large enough, `0..len` are live.
        // If `relocate` unwinds, `block` is released and `self` is untouched.
        unsafe {
            R::relocate(self.buf.as_ptr(), block.as_mut_ptr(), self.len);
            self.commit_block(block, self.len);
        }
    }

    /// Ensures the capacity is at least `new_capacity`.
    ///
    /// Does nothing if the capacity is already large enough,
    /// otherwise allocates a block of exactly `new_capacity` slots.
    ///
    /// # Panics
    /// Panics on capacity overflow.
    ///
    /// ```
    /// use vc_vector::vector;
    ///
    /// let mut v = vector![1, 2];
    /// v.reserve(10);
    /// assert_eq!(v.capacity(), 10);
    ///
    /// v.reserve(3);
    /// assert_eq!(v.capacity(), 10);
    /// assert_eq!(v, [1, 2]);
    /// ```
    #[inline]
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(e) = self.try_reserve(new_capacity) {
            e.handle_error();
        }
    }

    /// Ensures the capacity is at least `new_capacity`.
    ///
    /// On error the vector is left unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }

        let block = RawMemory::try_with_capacity(new_capacity)?;
        self.relocate_into(block);
        Ok(())
    }

    /// Returns the block the next insertion needs, if the current one is full.
    #[inline]
    fn spare_block(&self) -> Result<Option<RawMemory<T>>, AllocError> {
        if self.len < self.capacity() {
            return Ok(None);
        }
        let capacity = grown_capacity::<T>(self.capacity())?;
        RawMemory::try_with_capacity(capacity).map(Some)
    }

    /// Builds the new value and places it at `index` of the current block.
    #[inline]
    fn place_in_place<F>(&mut self, index: usize, build: F)
    where
        F: FnOnce(&[T]) -> T,
    {
        let value = build(self.as_slice());

        // SAFETY: `len < capacity`, so shifting `index..len` by one stays in the block.
        unsafe {
            let slot = self.buf.offset_mut(index);
            if index < self.len {
                ptr::copy(slot, slot.add(1), self.len - index);
            }
            slot.write(value);
        }
        self.len += 1;
    }

    /// Builds the new value directly in `block` and relocates the neighbours around it.
    #[cold]
    #[inline(never)]
    fn place_in_block<F>(&mut self, index: usize, block: RawMemory<T>, build: F)
    where
        F: FnOnce(&[T]) -> T,
    {
        let len = self.len;

        log::trace!(
            "vector growing from {} to {} slots",
            self.capacity(),
            block.capacity(),
        );

        let mut staging = Staging::new(block);
        let value = build(self.as_slice());

        // SAFETY: `block` has more than `len` slots. The new value is in place
        // before any old slot is read, and the old block is only retired once
        // both spans have been relocated.
        unsafe {
            staging.seed(index, value);

            R::relocate(self.buf.as_ptr(), staging.slot(0), index);
            staging.grow_front(index);

            R::relocate(self.buf.offset(index), staging.slot(index + 1), len - index);
            staging.grow_back(len - index);

            self.commit_block(staging.commit(), len + 1);
        }
    }

    /// Inserts the value produced by `build` at `index`, with `block` when growing.
    #[inline]
    fn place<F>(&mut self, index: usize, block: Option<RawMemory<T>>, build: F) -> &mut T
    where
        F: FnOnce(&[T]) -> T,
    {
        match block {
            Some(block) => self.place_in_block(index, block, build),
            None => self.place_in_place(index, build),
        }

        debug_assert!(self.len <= self.capacity());
        // SAFETY: the value was just written to `index < len`.
        unsafe { self.buf.get_mut(index) }
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn insert_assert_failed(index: usize, len: usize) -> ! {
        panic!("insertion index (is {index}) should be <= len (is {len})");
    }

    /// Inserts the value returned by `build` at `index`.
    ///
    /// `build` receives the live values before any of them is moved, so the
    /// new value may be derived from an element of this very vector.
    /// If `build` panics, the vector is unchanged.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// ```
    /// use vc_vector::vector;
    ///
    /// let mut v = vector![String::from("a"), String::from("b")];
    /// v.emplace(0, |items| format!("{}{}", items[0], items[1]));
    /// assert_eq!(v, ["ab", "a", "b"]);
    /// ```
    #[track_caller]
    pub fn emplace<F>(&mut self, index: usize, build: F) -> &mut T
    where
        F: FnOnce(&[T]) -> T,
    {
        if index > self.len {
            Self::insert_assert_failed(index, self.len);
        }

        let block = self.spare_block().unwrap_or_else(|e| e.handle_error());
        self.place(index, block, build)
    }

    /// Appends the value returned by `build`, see [`emplace`](Self::emplace).
    #[inline]
    pub fn emplace_back<F>(&mut self, build: F) -> &mut T
    where
        F: FnOnce(&[T]) -> T,
    {
        self.emplace(self.len, build)
    }

    /// Inserts `value` at `index`, shifting the following values right.
    ///
    /// # Panics
    /// Panics if `index > len`.
    #[inline]
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace(index, move |_| value)
    }

    /// Appends `value`.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.emplace(self.len, move |_| value);
    }

    /// Inserts `value` at `index`, giving it back if the block cannot grow.
    ///
    /// # Panics
    /// Panics if `index > len`.
    #[track_caller]
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<&mut T, TryInsertError<T>> {
        if index > self.len {
            Self::insert_assert_failed(index, self.len);
        }

        match self.spare_block() {
            Ok(block) => Ok(self.place(index, block, move |_| value)),
            Err(source) => Err(TryInsertError::new(value, source)),
        }
    }

    /// Appends `value`, giving it back if the block cannot grow.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<&mut T, TryInsertError<T>> {
        self.try_insert(self.len, value)
    }

    /// Inserts a clone of the value at `source` into `index`.
    ///
    /// The clone is made before anything moves, so this is sound
    /// even when the insertion reallocates.
    ///
    /// # Panics
    /// Panics if `source >= len` or `index > len`.
    ///
    /// ```
    /// use vc_vector::vector;
    ///
    /// let mut v = vector![String::from("x"), String::from("y")];
    /// assert_eq!(v.capacity(), 2);
    ///
    /// v.insert_from(0, 1);
    /// assert_eq!(v, ["y", "x", "y"]);
    /// ```
    #[track_caller]
    pub fn insert_from(&mut self, index: usize, source: usize) -> &mut T
    where
        T: Clone,
    {
        assert!(
            source < self.len,
            "source index (is {source}) should be < len (is {})",
            self.len,
        );
        self.emplace(index, |items| items[source].clone())
    }

    /// Resizes to `new_len`, filling new slots with values returned by `fill`.
    ///
    /// Truncates when shrinking. When `new_len` exceeds the capacity, a block
    /// of exactly `new_len` slots is reserved first. The capacity never shrinks.
    pub fn resize_with<F>(&mut self, new_len: usize, mut fill: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        self.reserve(new_len);
        while self.len < new_len {
            // SAFETY: `len < new_len <= capacity`.
            unsafe {
                self.buf.offset_mut(self.len).write(fill());
            }
            self.len += 1;
        }
    }

    /// Resizes to `new_len`, filling new slots with `T::default()`.
    ///
    /// ```
    /// use vc_vector::vector;
    ///
    /// let mut v = vector![1, 2, 3];
    /// v.resize(5);
    /// assert_eq!(v, [1, 2, 3, 0, 0]);
    ///
    /// v.resize(1);
    /// assert_eq!(v, [1]);
    /// assert_eq!(v.capacity(), 5);
    /// ```
    #[inline]
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }
}

// -----------------------------------------------------------------------------
// Clone

impl<T: Clone, R> Clone for Vector<T, R> {
    /// Copies the live values into a block of exactly `len` slots.
    fn clone(&self) -> Self {
        let mut buf = RawMemory::with_capacity(self.len);

        // SAFETY: `buf` is fresh with `len` slots. If a clone panics,
        // the partial copies are dropped and `buf` is released.
        unsafe {
            clone_into_uninit(self.buf.as_ptr(), buf.as_mut_ptr(), self.len);
        }

        Self {
            buf,
            len: self.len,
            _policy: PhantomData,
        }
    }

    /// Copy assignment.
    ///
    /// If `source` does not fit, a full copy is built first and then swapped in,
    /// leaving `self` unchanged on failure. Otherwise the existing block is
    /// reused: the common prefix is assigned in place, then the tail is either
    /// dropped or cloned in.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            *self = source.clone();
            return;
        }

        let common = self.len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source[..common]);

        if source.len < self.len {
            self.truncate(source.len);
        } else {
            for value in &source[common..] {
                // SAFETY: `len < source.len <= capacity`.
                unsafe {
                    self.buf.offset_mut(self.len).write(value.clone());
                }
                self.len += 1;
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Deref

impl<T, R> Deref for Vector<T, R> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, R> DerefMut for Vector<T, R> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

// -----------------------------------------------------------------------------
// Tests
