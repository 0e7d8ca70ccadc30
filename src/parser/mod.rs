//! Parsers for pxconv input files.

mod palette;

pub use palette::{load_palette, palette_to_json, parse_palette_json};
