//! A growable array that manages object lifetimes on top of [`vc_raw::RawMemory`].
//!
//! [`Vector<T, R>`] keeps `len` live values at the front of a raw block and
//! grows by doubling. How live values reach a new block is chosen at compile
//! time by the relocation strategy `R`:
//!
//! - [`Bitwise`] (default) moves them, which cannot fail.
//! - [`Cloned`] copies them and keeps the originals until the new block is
//!   complete, so a panicking [`Clone`] leaves the vector unchanged.
//!
//! New values are always materialized in their final slot before any
//! neighbour moves, which makes inserting a value derived from the vector
//! itself sound, see [`Vector::emplace`] and [`Vector::insert_from`].
//!
//! ```
//! use vc_vector::{Cloned, Vector, vector};
//!
//! let mut v = vector![1, 2, 3];
//! v.insert(1, 9);
//! assert_eq!(v, [1, 9, 2, 3]);
//!
//! let mut names: Vector<String, Cloned> = Vector::with_policy(Cloned);
//! names.push("vc".into());
//! names.insert_from(0, 0);
//! assert_eq!(names, ["vc", "vc"]);
//! ```
#![expect(unsafe_code, reason = "Vector places values into raw memory.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), no_std)]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod impls;
mod iter;
mod relocate;
mod staging;
mod vec;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::TryInsertError;
pub use iter::IntoIter;
pub use relocate::{Bitwise, Cloned, Relocate};
pub use vc_raw::AllocError;
pub use vec::Vector;

// -----------------------------------------------------------------------------
// Macros

/// Creates a [`Vector`] with the default relocation strategy.
///
/// ```
/// use vc_vector::vector;
///
/// let v = vector![1, 2, 3];
/// assert_eq!(v.capacity(), 3);
///
/// let v = vector!["vc"; 2];
/// assert_eq!(v, ["vc", "vc"]);
/// ```
#[macro_export]
macro_rules! vector {
    () => {
        $crate::Vector::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Vector::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::Vector<_>>::from([$($x),+])
    };
}
