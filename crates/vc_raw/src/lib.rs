//! Untyped storage blocks for typed containers.
//!
//! This crate separates "owning memory for `N` values" from "`N` values are alive".
//!
//! **RawMemory**
//!
//! [`RawMemory<T>`] owns an uninitialized block sized for exactly `capacity`
//! values of `T`. It never constructs or drops a `T`; the container that places
//! values into the block is responsible for dropping them before the block is
//! released.
//!
//! **AllocError**
//!
//! [`AllocError`] describes why a block could not be acquired. Infallible
//! constructors route it through [`AllocError::handle_error`].
#![expect(unsafe_code, reason = "Raw allocation is inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod layout;
mod raw_memory;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::AllocError;
pub use layout::{array_layout, array_layout_unchecked};
pub use raw_memory::RawMemory;
