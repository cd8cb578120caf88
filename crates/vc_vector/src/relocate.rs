//! Strategies for carrying live values into a freshly allocated block.
//!
//! A [`Vector`](crate::Vector) picks its strategy through a type parameter,
//! so the choice is resolved at compile time and costs nothing at runtime.
//!
//! - [`Bitwise`] moves values. A Rust move is a byte copy that cannot fail,
//!   and it is also the only option for types that cannot be cloned.
//! - [`Cloned`] copies values and leaves the originals alive until every copy
//!   exists. A panicking [`Clone`] leaves the vector exactly as it was.

use core::mem;
use core::ptr;

// -----------------------------------------------------------------------------
// Relocate

/// Moves or copies `count` live values from one block into another.
///
/// # Safety
/// Implementors must uphold the contract documented on [`relocate`](Self::relocate),
/// and [`CONSUMES_SOURCE`](Self::CONSUMES_SOURCE) must describe what
/// `relocate` does to the source slots.
pub unsafe trait Relocate<T> {
    /// `true` if the source slots are logically uninitialized after
    /// a successful relocation.
    ///
    /// When `false`, the caller still owns the source values and drops them
    /// once the destination block has been committed.
    const CONSUMES_SOURCE: bool;

    /// Places `count` values read from `src` into `dst`.
    ///
    /// If this function unwinds, no value is left alive in `dst`
    /// and `src` is unchanged.
    ///
    /// # Safety
    /// - `src` must be valid for reads of `count` live values
    /// - `dst` must be valid for writes of `count` uninitialized slots
    /// - The two ranges must not overlap
    unsafe fn relocate(src: *const T, dst: *mut T, count: usize);
}

// -----------------------------------------------------------------------------
// Bitwise

/// Relocates by move.
///
/// The default strategy of [`Vector`](crate::Vector).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bitwise;

unsafe impl<T> Relocate<T> for Bitwise {
    const CONSUMES_SOURCE: bool = true;

    #[inline(always)]
    unsafe fn relocate(src: *const T, dst: *mut T, count: usize) {
        // SAFETY: guaranteed by the caller.
        unsafe {
            ptr::copy_nonoverlapping(src, dst, count);
        }
    }
}

// -----------------------------------------------------------------------------
// Cloned

/// Relocates by copy, giving growth the strong guarantee.
///
/// The old block keeps its values until the new block is complete,
/// so a panic in [`Clone::clone`] is reported to the caller with the
/// vector untouched.
///
/// ```
/// use vc_vector::{Cloned, Vector};
///
/// let mut names = Vector::with_policy(Cloned);
/// names.push(String::from("a"));
/// names.push(String::from("b"));
/// assert_eq!(names, ["a", "b"]);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cloned;

unsafe impl<T: Clone> Relocate<T> for Cloned {
    const CONSUMES_SOURCE: bool = false;

    #[inline]
    unsafe fn relocate(src: *const T, dst: *mut T, count: usize) {
        // SAFETY: guaranteed by the caller.
        unsafe {
            clone_into_uninit(src, dst, count);
        }
    }
}

// -----------------------------------------------------------------------------
// Clone helper

/// Drops the values cloned so far if a later `clone` unwinds.
struct PartialClone<T> {
    dst: *mut T,
    done: usize,
}

impl<T> Drop for PartialClone<T> {
    #[cold]
    fn drop(&mut self) {
        // SAFETY: exactly `done` slots were written.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.dst, self.done));
        }
    }
}

/// Clones `count` values from `src` into the uninitialized `dst`.
///
/// # Safety
/// - `src` must be valid for reads of `count` live values
/// - `dst` must be valid for writes of `count` uninitialized slots
/// - The two ranges must not overlap
pub(crate) unsafe fn clone_into_uninit<T: Clone>(src: *const T, dst: *mut T, count: usize) {
    let mut guard = PartialClone { dst, done: 0 };

    while guard.done < count {
        unsafe {
            let value = (*src.add(guard.done)).clone();
            dst.add(guard.done).write(value);
        }
        guard.done += 1;
    }

    mem::forget(guard);
}

// -----------------------------------------------------------------------------
// Tests
