use core::alloc::Layout;

use crate::AllocError;

// -----------------------------------------------------------------------------
// alloc helper

/// Creates the layout of a block holding `n` values of `T`.
///
/// Fails when the byte size overflows or exceeds `isize::MAX`.
///
/// # Examples
///
/// ```
/// use vc_raw::array_layout;
///
/// let layout = array_layout::<u32>(4).unwrap();
/// assert_eq!(layout.size(), 16);
/// assert_eq!(layout.align(), 4);
///
/// assert!(array_layout::<u64>(usize::MAX).is_err());
/// ```
#[inline]
pub const fn array_layout<T>(n: usize) -> Result<Layout, AllocError> {
    let elem_size = size_of::<T>();

    let Some(alloc_size) = elem_size.checked_mul(n) else {
        return Err(AllocError::CapacityOverflow {
            capacity: n,
            elem_size,
        });
    };

    if alloc_size > isize::MAX as usize {
        return Err(AllocError::CapacityOverflow {
            capacity: n,
            elem_size,
        });
    }

    // SAFETY: the alignment comes from `T` and the size was checked above.
    Ok(unsafe { Layout::from_size_align_unchecked(alloc_size, align_of::<T>()) })
}

/// Creates the layout of a block holding `n` values of `T` without checking.
///
/// # Safety
/// - `size_of::<T>() * n` must not overflow
/// - The resulting size must be <= `isize::MAX`
#[inline(always)]
pub const unsafe fn array_layout_unchecked<T>(n: usize) -> Layout {
    unsafe { Layout::from_size_align_unchecked(size_of::<T>() * n, align_of::<T>()) }
}
