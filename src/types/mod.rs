//! Core data types.

mod colour;
mod command;
mod lab;
mod palette;

pub use colour::Colour;
pub use command::{format_commands, Command};
pub use lab::Lab;
pub use palette::{derive_perceptual, Palette, PaletteEntry, MAX_PALETTE_SIZE};
