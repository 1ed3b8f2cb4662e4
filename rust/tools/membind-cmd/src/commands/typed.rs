//! Typed command implementation

use anyhow::Result;
use membind::{RawBlock, TypedView, inspect};

/// Drives one bind -> initialize -> store/load -> deinitialize ->
/// deallocate cycle through a typed view.
pub fn run() -> Result<()> {
    let mut block = RawBlock::allocate(16, 8)?;
    {
        let mut view = TypedView::<u64>::bind(&mut block, 2)?;
        println!(
            "bound {} elements, element layout: {}",
            view.count(),
            view.layout()
        );

        view.initialize(0, 2)?;
        view.store(0, 42)?;
        view.store(1, 6)?;
        println!("slot 0 = {}", view.load(0)?);
        println!("slot 1 = {}", view.load(1)?);
        println!("region bytes: {}", inspect::hex(view.as_bytes()?));
        println!("initialized slots: {}", view.initialized_count());

        view.deinitialize_all();
        println!("after deinitialize_all: {}", view.initialized_count());
    }
    block.deallocate()?;
    println!("deallocated; state = {:?}", block.state());
    Ok(())
}
