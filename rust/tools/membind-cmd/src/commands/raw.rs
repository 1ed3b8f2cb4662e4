//! Raw command implementation

use anyhow::Result;
use membind::{RawBlock, inspect};

/// Drives one allocate -> store/load -> deallocate cycle on raw bytes.
pub fn run() -> Result<()> {
    let mut block = RawBlock::allocate(16, 8)?;
    println!(
        "allocated {} bytes at alignment {}",
        block.byte_count(),
        block.alignment()
    );

    block.store(0, 0x0123_4567_89ab_cdefu64)?;
    block.store(8, 0x42u8)?;

    let word: u64 = block.load(0)?;
    let byte: u8 = block.load(8)?;
    println!("load u64 at offset 0: {word:#018x}");
    println!("load u8  at offset 8: {byte:#04x}");
    // Only the stored prefix is dumped; the tail was never written.
    println!("stored bytes: {}", inspect::hex(block.load_bytes(0, 9)?));

    block.deallocate()?;
    println!("deallocated; state = {:?}", block.state());
    Ok(())
}
