pub mod completions;
pub mod convert;
pub mod init;
pub mod palette;

use clap::{Parser, Subcommand};

/// pxconv - Photo to pixel-art command converter
#[derive(Parser, Debug)]
#[command(name = "pxconv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert images into pixel draw commands
    Convert(convert::ConvertArgs),

    /// Validate a palette file and list its colours
    Palette(palette::PaletteArgs),

    /// Initialize a pxconv.yaml config file
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
