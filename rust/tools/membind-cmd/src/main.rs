use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "membind-cmd")]
#[command(about = "Command-line demonstrations of the membind memory toolkit")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print size, alignment, and stride for a set of sample types
    Layout,

    /// Drive one allocate -> store/load -> deallocate cycle on raw bytes
    Raw,

    /// Drive one bind -> initialize -> store/load -> deinitialize ->
    /// deallocate cycle through a typed view
    Typed,

    /// Store bytes through the raw layer, then bind the same block as
    /// typed elements
    Punning,

    /// Inspect a composite value's bytes and report its checksum digest
    Digest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout => commands::layout::run(),
        Commands::Raw => commands::raw::run(),
        Commands::Typed => commands::typed::run(),
        Commands::Punning => commands::punning::run(),
        Commands::Digest => commands::digest::run(),
    }
}
