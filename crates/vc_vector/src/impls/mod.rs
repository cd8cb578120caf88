// -----------------------------------------------------------------------------
// Modules

mod basic;

#[cfg(feature = "serde")]
mod serde;
