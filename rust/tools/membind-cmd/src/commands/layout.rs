//! Layout command implementation

use anyhow::Result;
use membind::TypeLayout;

// Present only so its layout can be queried.
#[allow(dead_code)]
#[derive(Clone, Copy)]
#[repr(C)]
struct Record {
    id: u64,
    kind: u16,
    live: bool,
}

/// Prints size, alignment, and stride for a handful of built-in and
/// composite types.
pub fn run() -> Result<()> {
    println!("{:<12} {:>6} {:>10} {:>8}", "type", "size", "alignment", "stride");
    print_row::<bool>("bool");
    print_row::<u8>("u8");
    print_row::<u16>("u16");
    print_row::<u32>("u32");
    print_row::<u64>("u64");
    print_row::<f64>("f64");
    print_row::<(u32, bool)>("(u32, bool)");
    print_row::<[u16; 3]>("[u16; 3]");
    print_row::<Record>("Record");
    print_row::<()>("()");

    // A foreign layout: a 5-byte value carried on an 8-byte stride.
    let foreign = TypeLayout::new(5, 4, 8)?;
    println!();
    println!("foreign layout (5-byte value, alignment 4): {foreign}");
    Ok(())
}

fn print_row<T>(name: &str) {
    let layout = TypeLayout::of::<T>();
    println!(
        "{:<12} {:>6} {:>10} {:>8}",
        name,
        layout.size(),
        layout.alignment(),
        layout.stride()
    );
}
