use core::borrow::{Borrow, BorrowMut};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::ManuallyDrop;
use core::ops::{Index, IndexMut};
use core::slice::{self, SliceIndex};

use crate::relocate::Relocate;
use crate::{IntoIter, Vector};

// -----------------------------------------------------------------------------
// Default & Debug

impl<T, R> Default for Vector<T, R> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug, R> fmt::Debug for Vector<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

// -----------------------------------------------------------------------------
// Index

impl<T, R, I: SliceIndex<[T]>> Index<I> for Vector<T, R> {
    type Output = I::Output;

    #[inline]
    #[track_caller]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, R, I: SliceIndex<[T]>> IndexMut<I> for Vector<T, R> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

// -----------------------------------------------------------------------------
// Borrow

impl<T, R> AsRef<[T]> for Vector<T, R> {
    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, R> AsMut<[T]> for Vector<T, R> {
    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, R> Borrow<[T]> for Vector<T, R> {
    #[inline(always)]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, R> BorrowMut<[T]> for Vector<T, R> {
    #[inline(always)]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

// -----------------------------------------------------------------------------
// Comparison

impl<T, U, R1, R2> PartialEq<Vector<U, R2>> for Vector<T, R1>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vector<U, R2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, R> Eq for Vector<T, R> {}

impl<T, U, R> PartialEq<[U]> for Vector<T, R>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, R> PartialEq<&[U]> for Vector<T, R>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, R, const N: usize> PartialEq<[U; N]> for Vector<T, R>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, R, const N: usize> PartialEq<&[U; N]> for Vector<T, R>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U; N]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialOrd, R> PartialOrd for Vector<T, R> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, R> Ord for Vector<T, R> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, R> Hash for Vector<T, R> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

// -----------------------------------------------------------------------------
// Iteration

impl<T, R> IntoIterator for Vector<T, R> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let mut this = ManuallyDrop::new(self);
        let (buf, len) = this.take_block();
        // SAFETY: the values were moved out of `this`, which is never dropped.
        unsafe { IntoIter::new(buf, len) }
    }
}

impl<'a, T, R> IntoIterator for &'a Vector<T, R> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, R> IntoIterator for &'a mut Vector<T, R> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, R: Relocate<T>> Extend<T> for Vector<T, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(self.len().saturating_add(lower));
        iter.for_each(|value| self.push(value));
    }
}

impl<'a, T: Copy + 'a, R: Relocate<T>> Extend<&'a T> for Vector<T, R> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, R: Relocate<T>> FromIterator<T> for Vector<T, R> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Self::empty();
        vector.extend(iter);
        vector
    }
}

// -----------------------------------------------------------------------------
// Conversion

impl<T: Clone, R: Relocate<T>> From<&[T]> for Vector<T, R> {
    #[inline]
    fn from(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }
}

impl<T: Clone, R: Relocate<T>> From<&mut [T]> for Vector<T, R> {
    #[inline]
    fn from(slice: &mut [T]) -> Self {
        slice.iter().cloned().collect()
    }
}

impl<T, R: Relocate<T>, const N: usize> From<[T; N]> for Vector<T, R> {
    #[inline]
    fn from(array: [T; N]) -> Self {
        array.into_iter().collect()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::{Cloned, Vector, vector};
    use alloc::format;
    use alloc::string::String;
    use core::hash::BuildHasher;
    use std::collections::hash_map::RandomState;

    #[test]
    fn debug_as_list() {
        let v = vector![1, 2, 3];
        assert_eq!(format!("{v:?}"), "[1, 2, 3]");

        let v: Vector<String> = Vector::new();
        assert_eq!(format!("{v:?}"), "[]");
    }

    #[test]
    fn compare() {
        let a = vector![1, 2, 3];
        let b: Vector<i32, Cloned> = [1, 2, 3].into();
        assert_eq!(a, b);
        assert_eq!(a, [1, 2, 3]);
        assert_eq!(a, &[1, 2, 3][..]);
        assert!(a < vector![1, 2, 4]);
        assert!(vector![0; 4] > vector![0; 3]);

        let state = RandomState::new();
        assert_eq!(state.hash_one(&a), state.hash_one([1, 2, 3].as_slice()));
    }

    #[test]
    fn ranges() {
        let mut v = vector![0, 1, 2, 3, 4];
        assert_eq!(v[1..3], [1, 2]);
        v[3..].fill(9);
        assert_eq!(v, [0, 1, 2, 9, 9]);
    }

    #[test]
    fn extend_and_collect() {
        let mut v: Vector<u8> = (0..3).collect();
        assert_eq!(v.capacity(), 3);

        v.extend([3, 4]);
        v.extend(&[5, 6]);
        assert_eq!(v, [0, 1, 2, 3, 4, 5, 6]);

        let v = Vector::<char>::from(&['a', 'b'][..]);
        assert_eq!(v, ['a', 'b']);

        let v: Vector<String> = Vector::from([String::from("x")]);
        assert_eq!(v.len(), 1);
    }
}
