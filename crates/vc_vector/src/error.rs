use core::fmt;

use thiserror::Error;
use vc_raw::AllocError;

// -----------------------------------------------------------------------------
// Error

/// Returned by [`try_push`](crate::Vector::try_push) and
/// [`try_insert`](crate::Vector::try_insert) when the vector cannot grow.
///
/// The vector is unchanged and the rejected value is handed back.
#[derive(Error)]
#[error("cannot insert value: {source}")]
pub struct TryInsertError<T> {
    value: T,
    source: AllocError,
}

impl<T> TryInsertError<T> {
    #[inline]
    pub(crate) const fn new(value: T, source: AllocError) -> Self {
        Self { value, source }
    }

    /// Returns the allocation failure.
    #[inline]
    pub const fn alloc_error(&self) -> AllocError {
        self.source
    }

    /// Returns a reference to the rejected value.
    #[inline]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Takes back the rejected value.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for TryInsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryInsertError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
