//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

pub const MIN_WORLD_WIDTH: i32 = 400;
pub const MIN_WORLD_HEIGHT: i32 = 400;

#[derive(Debug, Clone, Parser)]
#[command(name = "boat_fishing", about = "Catch fish from a boat, sell them, upgrade your gear")]
pub struct Cli {
    /// Directory holding the saved counters (money.txt, fish_caught.txt, ...).
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Append logs here; filtered by RUST_LOG.  Nothing is logged without it.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Fixed RNG seed for a reproducible session.
    #[arg(long)]
    pub seed: Option<u64>,

    /// World width in world units (scaled to the terminal).
    #[arg(
        long,
        default_value_t = 800,
        value_parser = clap::value_parser!(i32).range(MIN_WORLD_WIDTH as i64..)
    )]
    pub width: i32,

    /// World height in world units; the water line sits halfway down.
    #[arg(
        long,
        default_value_t = 600,
        value_parser = clap::value_parser!(i32).range(MIN_WORLD_HEIGHT as i64..)
    )]
    pub height: i32,
}
