//! Digest command implementation

use anyhow::Result;
use membind::{TypeLayout, checksum, inspect};

/// A 4-byte counter followed by a 1-byte flag, padded out to an 8-byte
/// stride under its natural alignment.
#[derive(Clone, Copy, bytemuck::NoUninit)]
#[repr(C)]
struct Header {
    count: u32,
    flag: bool,
    _pad: [u8; 3],
}

/// Inspects a composite value's bytes and reports its checksum digest.
pub fn run() -> Result<()> {
    let value = Header {
        count: 25,
        flag: true,
        _pad: [0; 3],
    };
    let layout = TypeLayout::new(5, 4, 8)?;
    println!("header {{ count: {}, flag: {} }}", value.count, value.flag);
    println!("header layout: {layout}");

    let bytes = inspect::bytes_of_sized(&value, &layout);
    println!("value bytes ({}): {}", bytes.len(), inspect::hex(bytes));

    let digest = checksum::compute(bytes);
    println!("checksum digest: {digest:#010x}");
    checksum::validate_buffer(bytes, digest, Some("header"))?;
    println!("digest verified");
    Ok(())
}
