//! Minimal low-level memory toolkit: type layout introspection, aligned raw
//! allocation with an explicit lifecycle, typed views with per-slot
//! initialization tracking, byte-level value inspection, and a simple
//! checksum.
//!
//! The raw layer ([`RawBlock`]) performs bounds and lifecycle checks only;
//! it has no notion of element types or initialization. The typed layer
//! ([`TypedView`]) binds an element layout and count onto the same bytes
//! without copying them, and adds initialization tracking so that reading a
//! slot that was never stored is a detectable error rather than undefined
//! behavior.

pub mod align;
pub mod block;
pub mod checksum;
pub mod error;
pub mod inspect;
pub mod layout;
pub mod view;

pub use block::{BlockState, RawBlock};
pub use error::{Error, ErrorKind, Result};
pub use layout::TypeLayout;
pub use view::TypedView;
