//! Punning command implementation

use anyhow::Result;
use membind::{RawBlock, TypedView};

/// Stores bytes through the raw layer, then binds the same block as
/// typed elements over the same memory.
pub fn run() -> Result<()> {
    let mut block = RawBlock::allocate(16, 8)?;
    block.store_bytes(0, &42u64.to_ne_bytes())?;
    block.store_bytes(8, &6u64.to_ne_bytes())?;
    println!("stored two u64 values through the raw layer");

    let mut view = TypedView::<u64>::bind(&mut block, 2)?;
    match view.load(0) {
        Err(err) => println!("typed load before adoption: {err}"),
        Ok(_) => unreachable!("raw stores do not mark typed slots"),
    }

    view.assume_init_all();
    println!("adopted raw contents; slot 0 = {}", view.load(0)?);
    println!("slot 1 at byte offset {} = {}", view.offset_of(1), view.load(1)?);

    view.deinitialize_all();
    drop(view);
    block.deallocate()?;
    Ok(())
}
