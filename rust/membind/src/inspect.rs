//! Read-only inspection of a value's in-memory byte representation.

use bytemuck::NoUninit;

use crate::layout::TypeLayout;

/// Returns the bytes of `value`'s in-memory representation.
///
/// The slice borrows `value` and is valid exactly as long as the value
/// is: a bounded, restartable view of `size_of::<T>()` bytes. Any value
/// that exists can be inspected; there is no failure mode. The `NoUninit`
/// bound guarantees no padding byte in the representation is
/// uninitialized.
pub fn bytes_of<T: NoUninit>(value: &T) -> &[u8] {
    bytemuck::bytes_of(value)
}

/// Returns the first `layout.size()` bytes of `value`'s representation.
///
/// A foreign layout's size may be smaller than Rust's padded
/// `size_of::<T>()` (e.g. a 5-byte value carried on an 8-byte stride);
/// this trims the representation to the layout's own size. A layout
/// larger than the representation yields the full representation.
pub fn bytes_of_sized<'a, T: NoUninit>(value: &'a T, layout: &TypeLayout) -> &'a [u8] {
    let bytes = bytemuck::bytes_of(value);
    &bytes[..layout.size().min(bytes.len())]
}

/// Renders bytes as two-digit lowercase hex, space-separated.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
