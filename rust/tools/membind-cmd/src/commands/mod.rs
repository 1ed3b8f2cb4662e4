//! Command implementations for membind-cmd

pub mod digest;
pub mod layout;
pub mod punning;
pub mod raw;
pub mod typed;
