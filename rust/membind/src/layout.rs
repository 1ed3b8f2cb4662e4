//! Type layout introspection: size, alignment, and stride.

use std::fmt;

use crate::align::align_up;
use crate::error::{Error, Result};

/// Size, alignment, and stride describing how a type's values are
/// represented in memory.
///
/// `stride` is the distance in bytes between consecutive elements stored
/// contiguously; it may exceed `size` when a foreign layout carries tail
/// padding outside the value itself. Rust's `size_of` already includes
/// tail padding, so [`TypeLayout::of`] reports `stride == size` for every
/// sized type; zero-sized types take a stride of 1 so that element
/// offsets remain distinct.
///
/// Invariants: `alignment` is a power of two, `stride >= size` and
/// `stride >= 1`, while `size` may be 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeLayout {
    size: usize,
    alignment: usize,
    stride: usize,
}

impl TypeLayout {
    /// Returns the layout of `T` as reported by the compiler.
    pub fn of<T>() -> TypeLayout {
        let size = std::mem::size_of::<T>();
        let alignment = std::mem::align_of::<T>();
        TypeLayout {
            size,
            alignment,
            stride: align_up(size, alignment).max(1),
        }
    }

    /// Creates a layout from a size and alignment, deriving the stride by
    /// rounding the size up to the alignment.
    ///
    /// # Errors
    ///
    /// `InvalidAlignment` if `alignment` is not a power of two.
    pub fn from_size_align(size: usize, alignment: usize) -> Result<TypeLayout> {
        if !alignment.is_power_of_two() {
            return Err(Error::invalid_alignment(alignment));
        }
        Ok(TypeLayout {
            size,
            alignment,
            stride: align_up(size, alignment).max(1),
        })
    }

    /// Creates a fully explicit layout.
    ///
    /// This is the escape hatch for foreign layouts whose stride is not
    /// simply the size rounded up to the alignment, e.g. a 5-byte value
    /// carried on an 8-byte stride.
    ///
    /// # Errors
    ///
    /// `InvalidAlignment` if `alignment` is not a power of two;
    /// `InvalidSize` if `stride` is smaller than `size` (or zero).
    pub fn new(size: usize, alignment: usize, stride: usize) -> Result<TypeLayout> {
        if !alignment.is_power_of_two() {
            return Err(Error::invalid_alignment(alignment));
        }
        if stride < size.max(1) {
            return Err(Error::invalid_size(stride));
        }
        Ok(TypeLayout {
            size,
            alignment,
            stride,
        })
    }

    /// Size of a single value in bytes. May be 0 for empty types.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Required alignment in bytes. Always a power of two.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Distance in bytes between consecutive elements. Always at least 1.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of bytes needed to store `count` contiguous elements.
    ///
    /// # Errors
    ///
    /// `InvalidSize` if `count * stride` overflows.
    pub fn required_bytes(&self, count: usize) -> Result<usize> {
        self.stride
            .checked_mul(count)
            .ok_or_else(|| Error::invalid_size(count))
    }
}

impl fmt::Display for TypeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size={}, alignment={}, stride={}",
            self.size, self.alignment, self.stride
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_layout_of_primitives() {
        let layout = TypeLayout::of::<u64>();
        assert_eq!(layout.size(), 8);
        assert_eq!(layout.alignment(), 8);
        assert_eq!(layout.stride(), 8);

        let layout = TypeLayout::of::<u8>();
        assert_eq!(layout.size(), 1);
        assert_eq!(layout.alignment(), 1);
        assert_eq!(layout.stride(), 1);
    }

    #[test]
    fn test_layout_of_zero_sized() {
        let layout = TypeLayout::of::<()>();
        assert_eq!(layout.size(), 0);
        assert_eq!(layout.stride(), 1);
    }

    #[test]
    fn test_layout_of_composite() {
        #[repr(C)]
        struct Pair {
            a: u32,
            b: u8,
        }
        let layout = TypeLayout::of::<Pair>();
        assert_eq!(layout.size(), 8);
        assert_eq!(layout.alignment(), 4);
        assert_eq!(layout.stride(), 8);
    }

    #[test]
    fn test_from_size_align_rounds_stride() {
        let layout = TypeLayout::from_size_align(5, 4).unwrap();
        assert_eq!(layout.size(), 5);
        assert_eq!(layout.stride(), 8);
    }

    #[test]
    fn test_from_size_align_rejects_bad_alignment() {
        let err = TypeLayout::from_size_align(16, 3).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidAlignment { alignment: 3 }
        ));
    }

    #[test]
    fn test_new_explicit_stride() {
        let layout = TypeLayout::new(5, 4, 8).unwrap();
        assert_eq!(layout.size(), 5);
        assert_eq!(layout.alignment(), 4);
        assert_eq!(layout.stride(), 8);
    }

    #[test]
    fn test_new_rejects_stride_below_size() {
        let err = TypeLayout::new(8, 4, 4).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSize { .. }));
    }

    #[test]
    fn test_required_bytes() {
        let layout = TypeLayout::of::<u64>();
        assert_eq!(layout.required_bytes(2).unwrap(), 16);
        assert_eq!(layout.required_bytes(0).unwrap(), 0);
    }

    #[test]
    fn test_required_bytes_overflow() {
        let layout = TypeLayout::of::<u64>();
        let err = layout.required_bytes(usize::MAX).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSize { .. }));
    }
}
