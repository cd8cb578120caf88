use core::fmt;
use core::iter::FusedIterator;
use core::ptr;
use core::slice;

use vc_raw::RawMemory;

// -----------------------------------------------------------------------------
// IntoIter

/// An owning iterator over the values of a [`Vector`](crate::Vector).
///
/// Unconsumed values are dropped with the iterator, then the block is released.
///
/// ```
/// use vc_vector::vector;
///
/// let v = vector![String::from("a"), String::from("b"), String::from("c")];
/// let mut iter = v.into_iter();
///
/// assert_eq!(iter.next().as_deref(), Some("a"));
/// assert_eq!(iter.next_back().as_deref(), Some("c"));
/// assert_eq!(iter.as_slice(), ["b"]);
/// ```
pub struct IntoIter<T> {
    buf: RawMemory<T>,
    start: usize,
    end: usize,
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: `start..end` are the values not yet handed out.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.offset_mut(self.start),
                self.end - self.start,
            ));
        }
    }
}

impl<T> IntoIter<T> {
    /// # Safety
    /// - `buf[0..len]` must be live and owned by the caller
    #[inline]
    pub(crate) const unsafe fn new(buf: RawMemory<T>, len: usize) -> Self {
        Self {
            buf,
            start: 0,
            end: len,
        }
    }

    /// Returns the values not yet yielded.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `start..end` are live.
        unsafe { slice::from_raw_parts(self.buf.offset(self.start), self.end - self.start) }
    }

    /// Returns the values not yet yielded as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `start..end` are live.
        unsafe { slice::from_raw_parts_mut(self.buf.offset_mut(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: the slot is live and leaves `start..end` right away.
        let value = unsafe { self.buf.offset(self.start).read() };
        self.start += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot was live and is now outside `start..end`.
        Some(unsafe { self.buf.offset(self.end).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::{Vector, vector};
    use alloc::rc::Rc;
    use alloc::vec::Vec;

    #[test]
    fn yields_in_order() {
        let v = vector![1, 2, 3, 4];
        let iter = v.into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.collect::<Vec<_>>(), [1, 2, 3, 4]);

        let v = vector![1, 2, 3, 4];
        assert_eq!(v.into_iter().rev().collect::<Vec<_>>(), [4, 3, 2, 1]);
    }

    #[test]
    fn drops_remaining() {
        let shared = Rc::new(());
        let v: Vector<Rc<()>> = (0..5).map(|_| Rc::clone(&shared)).collect();
        assert_eq!(Rc::strong_count(&shared), 6);

        let mut iter = v.into_iter();
        let first = iter.next();
        let last = iter.next_back();
        assert_eq!(iter.as_slice().len(), 3);

        drop(iter);
        assert_eq!(Rc::strong_count(&shared), 3);
        drop((first, last));
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn borrowed_iteration() {
        let mut v = vector![1, 2, 3];
        for x in &mut v {
            *x *= 10;
        }
        let sum: i32 = (&v).into_iter().sum();
        assert_eq!(sum, 60);
    }
}
